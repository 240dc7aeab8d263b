//! Configuration for the envtree demo application.
//!
//! [`DemoConfig`] is the typed result; [`tree`] is the descriptor that fills
//! it. Keeping both side by side makes it easy to see which variable lands
//! where:
//!
//! | Env var          | Config key         | Rule                          |
//! |------------------|--------------------|-------------------------------|
//! | `APP_NAME`       | `name`             | required string               |
//! | `APP_ENV`        | `environment`      | `development` by default      |
//! | `SERVER_HOST`    | `server.host`      | `127.0.0.1` by default        |
//! | `SERVER_PORT`    | `server.port`      | 1..=65535, `8080` by default  |
//! | `PUBLIC_URL`     | `server.public_url`| absolute URL, optional        |
//! | `LOG_LEVEL`      | `log_level`        | one of debug/info/warn/error  |
//! | `FEATURE_FLAGS`  | `features`         | JSON array of strings         |

use serde::{Deserialize, Serialize};

use envtree::Node;
use envtree::variable::{Environment, absolute_url, environment, int, json, one_of, string};

#[derive(Serialize, Deserialize, Debug)]
pub struct DemoConfig {
    pub name: String,
    pub environment: Environment,
    pub log_level: String,
    pub features: Vec<String>,
    pub server: ServerConfig,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: i64,
    #[serde(default)]
    pub public_url: Option<String>,
}

pub fn tree() -> Node {
    Node::mapping([
        ("name", string("APP_NAME").into()),
        (
            "environment",
            environment().default(Environment::Development).into(),
        ),
        (
            "log_level",
            one_of("LOG_LEVEL", &["debug", "info", "warn", "error"])
                .default("info".to_string())
                .into(),
        ),
        (
            "features",
            json::<Vec<String>>("FEATURE_FLAGS").default(Vec::new()).into(),
        ),
        (
            "server",
            Node::mapping([
                ("host", string("SERVER_HOST").default("127.0.0.1".to_string()).into()),
                ("port", int("SERVER_PORT").within(1..=65535).default(8080).into()),
                ("public_url", absolute_url("PUBLIC_URL").optional().into()),
            ]),
        ),
    ])
}
