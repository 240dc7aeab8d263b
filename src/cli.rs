//! Clap adapter for the dotenv pre-load.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`DotenvArgs`] can be flattened into any `#[derive(Parser)]` struct to give
//! an application `--env-file` and `--dotenv` flags; [`DotenvArgs::into_dotenv`]
//! turns them into the [`Dotenv`] value the builder takes.
//!
//! ```ignore
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     dotenv: DotenvArgs,
//! }
//!
//! let cli = Cli::parse();
//! let config: Config = Envtree::builder()
//!     .maybe_dotenv(cli.dotenv.into_dotenv())
//!     .load(tree())?
//!     .into_result()?;
//! ```

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::dotenv::{Dotenv, DotenvConfig, When};

/// When to read the dotenv file, as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DotenvWhen {
    Always,
    /// Unless the environment key is `production`.
    #[default]
    NotProduction,
    Never,
}

#[derive(Debug, Args)]
pub struct DotenvArgs {
    /// Read environment variables from this file. The file must exist.
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// When to read the dotenv file.
    #[arg(long = "dotenv", value_enum, default_value_t = DotenvWhen::NotProduction)]
    pub when: DotenvWhen,

    /// Let dotenv entries replace variables that are already set.
    #[arg(long)]
    pub dotenv_overwrite: bool,
}

impl DotenvArgs {
    /// `None` when the pre-load is disabled with `--dotenv never`.
    ///
    /// Without `--env-file` the `.env` search is used and a missing file is
    /// skipped; an explicit file is required to exist.
    pub fn into_dotenv(self) -> Option<Dotenv> {
        let when = match self.when {
            DotenvWhen::Always => When::Always,
            DotenvWhen::NotProduction => When::NotProduction,
            DotenvWhen::Never => return None,
        };
        let config = DotenvConfig {
            required: self.env_file.is_some(),
            path: self.env_file,
            overwrite: self.dotenv_overwrite,
        };
        Some(Dotenv::new(when, config))
    }
}
