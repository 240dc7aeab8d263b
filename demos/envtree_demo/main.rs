//! # envtree demo application
//!
//! A small CLI that loads its configuration with envtree and prints it. It
//! exists to exercise the crate by hand, not to do anything useful.
//!
//! ## Running
//!
//! ```sh
//! APP_NAME=demo cargo run --example envtree_demo
//! cargo run --example envtree_demo -- --check
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature              | How to exercise it                                                        |
//! |----------------------|---------------------------------------------------------------------------|
//! | Defaults             | `APP_NAME=demo cargo run --example envtree_demo`                          |
//! | Range check          | `APP_NAME=demo SERVER_PORT=99999 cargo run --example envtree_demo`        |
//! | Every error at once  | `SERVER_PORT=x LOG_LEVEL=loud cargo run --example envtree_demo -- --check`|
//! | JSON variable        | `APP_NAME=demo FEATURE_FLAGS='["beta"]' cargo run --example envtree_demo` |
//! | Dotenv file          | Put `APP_NAME=demo` in `.env`, then run with no variables set             |
//! | Explicit dotenv file | `cargo run --example envtree_demo -- --env-file demo.env`                 |
//! | Skip dotenv          | `cargo run --example envtree_demo -- --dotenv never`                      |

mod config;

use std::process::ExitCode;

use clap::Parser;

use envtree::{DotenvArgs, Envtree, EnvtreeError, Loaded, Mode};

use config::DemoConfig;

/// envtree demo: load and print configuration from the environment.
#[derive(Parser, Debug)]
#[command(name = "envtree-demo")]
struct Cli {
    /// Report every problem as JSON instead of failing on the first load error.
    #[arg(long)]
    check: bool,

    #[command(flatten)]
    dotenv: DotenvArgs,
}

fn run(cli: Cli) -> Result<ExitCode, EnvtreeError> {
    let mode = if cli.check { Mode::Return } else { Mode::Throw };
    let loaded: Loaded<DemoConfig> = Envtree::builder()
        .mode(mode)
        .maybe_dotenv(cli.dotenv.into_dotenv())
        .load(config::tree())?;

    if cli.check {
        println!("{}", serde_json::to_string_pretty(&loaded)?);
        return Ok(if loaded.is_valid() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    if let Loaded::Valid(config) = loaded {
        print_config(&config);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_config(config: &DemoConfig) {
    let entries = [
        ("name", config.name.clone()),
        ("environment", format!("{:?}", config.environment)),
        ("log_level", config.log_level.clone()),
        ("features", config.features.join(",")),
        ("server.host", config.server.host.clone()),
        ("server.port", config.server.port.to_string()),
        (
            "server.public_url",
            config.server.public_url.clone().unwrap_or_default(),
        ),
    ];
    let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in &entries {
        println!("{key:<width$}  {value}");
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
