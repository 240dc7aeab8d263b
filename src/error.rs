use std::path::PathBuf;
use thiserror::Error;

use crate::report::Report;

#[derive(Debug, Error)]
pub enum EnvtreeError {
    #[error("Could not load environment variables: {}", .0.to_json())]
    Invalid(Report),

    #[error("Failed to load dotenv file {}: {source}", .path.display())]
    Dotenv {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("Loaded values do not match the requested type: {0}")]
    Shape(#[from] serde_json::Error),
}

impl EnvtreeError {
    /// The validation report, if this is a throw-mode validation failure.
    pub fn report(&self) -> Option<&Report> {
        match self {
            EnvtreeError::Invalid(report) => Some(report),
            _ => None,
        }
    }
}
