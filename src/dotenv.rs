//! Optional dotenv pre-load, run before any variable is read.
//!
//! A [`Dotenv`] pairs a gate ([`When`]) with file options ([`DotenvConfig`]).
//! The gate is evaluated once per load, against the same store the load
//! reads from; when it passes, the store reads the file itself
//! ([`Store::load_dotenv`]).

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::EnvtreeError;
use crate::store::Store;

/// File name searched for when no explicit path is configured.
pub const DEFAULT_FILE_NAME: &str = ".env";

/// When the dotenv file should be read.
#[derive(Clone, Default)]
pub enum When {
    Always,
    /// Skip only when the environment key is exactly `production`.
    #[default]
    NotProduction,
    Predicate(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl When {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        When::Predicate(Arc::new(f))
    }

    /// Evaluate the gate. `environment_key` is read from `store` for
    /// [`When::NotProduction`].
    pub fn should_load(&self, store: &dyn Store, environment_key: &str) -> bool {
        match self {
            When::Always => true,
            When::NotProduction => {
                store.lookup(environment_key).as_deref() != Some("production")
            }
            When::Predicate(f) => f(),
        }
    }
}

impl fmt::Debug for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            When::Always => f.write_str("Always"),
            When::NotProduction => f.write_str("NotProduction"),
            When::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl PartialEq for When {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (When::Always, When::Always) => true,
            (When::NotProduction, When::NotProduction) => true,
            (When::Predicate(a), When::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Where the dotenv file lives and how its entries are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotenvConfig {
    /// Explicit file. `None` searches for `.env` from the working directory upward.
    pub path: Option<PathBuf>,
    /// Replace keys already present in the store.
    pub overwrite: bool,
    /// Fail the load when the file does not exist.
    pub required: bool,
}

impl DotenvConfig {
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A gated dotenv pre-load, handed to [`EnvtreeBuilder::dotenv`](crate::EnvtreeBuilder::dotenv).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dotenv {
    pub when: When,
    pub config: DotenvConfig,
}

impl Dotenv {
    pub fn new(when: When, config: DotenvConfig) -> Self {
        Self { when, config }
    }

    pub fn always() -> Self {
        Self::new(When::Always, DotenvConfig::default())
    }

    pub fn not_production() -> Self {
        Self::new(When::NotProduction, DotenvConfig::default())
    }

    pub fn when(when: When) -> Self {
        Self::new(when, DotenvConfig::default())
    }

    /// Read this file instead of searching for `.env`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = self.config.path(path);
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config = self.config.overwrite(overwrite);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.config = self.config.required(required);
        self
    }
}

/// Read the configured dotenv file into `store`.
///
/// Returns whether a file was read. A missing file yields `Ok(false)` unless
/// `config.required` is set; parse and I/O errors always propagate.
pub fn preload(store: &mut dyn Store, config: &DotenvConfig) -> Result<bool, EnvtreeError> {
    let path = match &config.path {
        Some(path) => path.clone(),
        None => match find_upward(DEFAULT_FILE_NAME) {
            Some(found) => found,
            None => return missing(PathBuf::from(DEFAULT_FILE_NAME), config.required),
        },
    };

    match store.load_dotenv(&path, config.overwrite) {
        Ok(()) => {}
        Err(e) if e.not_found() => return missing(path, config.required),
        Err(source) => return Err(EnvtreeError::Dotenv { path, source }),
    }

    debug!(path = %path.display(), overwrite = config.overwrite, "Loaded dotenv file");
    Ok(true)
}

fn missing(path: PathBuf, required: bool) -> Result<bool, EnvtreeError> {
    if required {
        return Err(EnvtreeError::Dotenv {
            path,
            source: dotenvy::Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "dotenv file not found",
            )),
        });
    }
    debug!(path = %path.display(), reason = "not found", "Skipped dotenv file");
    Ok(false)
}

/// First `name` found in the working directory or one of its ancestors.
fn find_upward(name: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::store;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_env(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("test.env");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn preload_adds_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "APP_NAME=demo\n# comment\nPORT=8080\n");
        let mut s = store(&[]);
        assert!(preload(&mut s, &DotenvConfig::default().path(&path)).unwrap());
        assert_eq!(s.lookup("APP_NAME").as_deref(), Some("demo"));
        assert_eq!(s.lookup("PORT").as_deref(), Some("8080"));
    }

    #[test]
    fn preload_keeps_existing_values() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "PORT=8080\n");
        let mut s = store(&[("PORT", "3000")]);
        preload(&mut s, &DotenvConfig::default().path(&path)).unwrap();
        assert_eq!(s.lookup("PORT").as_deref(), Some("3000"));
    }

    #[test]
    fn preload_overwrite_replaces() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "PORT=8080\n");
        let mut s = store(&[("PORT", "3000")]);
        let config = DotenvConfig::default().path(&path).overwrite(true);
        preload(&mut s, &config).unwrap();
        assert_eq!(s.lookup("PORT").as_deref(), Some("8080"));
    }

    #[test]
    fn missing_file_skipped() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&[]);
        let config = DotenvConfig::default().path(dir.path().join("absent.env"));
        assert!(!preload(&mut s, &config).unwrap());
        assert!(s.is_empty());
    }

    #[test]
    fn missing_required_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&[]);
        let config = DotenvConfig::default()
            .path(dir.path().join("absent.env"))
            .required(true);
        let err = preload(&mut s, &config).unwrap_err();
        assert!(matches!(err, EnvtreeError::Dotenv { .. }));
    }

    #[test]
    fn malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "NOT A VALID LINE\n");
        let mut s = store(&[]);
        let err = preload(&mut s, &DotenvConfig::default().path(&path)).unwrap_err();
        match err {
            EnvtreeError::Dotenv { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected Dotenv error, got {other:?}"),
        }
    }

    #[test]
    fn not_production_gate() {
        let gate = When::NotProduction;
        assert!(gate.should_load(&store(&[]), "APP_ENV"));
        assert!(gate.should_load(&store(&[("APP_ENV", "test")]), "APP_ENV"));
        assert!(gate.should_load(&store(&[("APP_ENV", "prod")]), "APP_ENV"));
        assert!(!gate.should_load(&store(&[("APP_ENV", "production")]), "APP_ENV"));
    }

    #[test]
    fn not_production_uses_given_key() {
        let s = store(&[("NODE_ENV", "production")]);
        assert!(When::NotProduction.should_load(&s, "APP_ENV"));
        assert!(!When::NotProduction.should_load(&s, "NODE_ENV"));
    }

    #[test]
    fn predicate_gate() {
        assert!(When::predicate(|| true).should_load(&store(&[]), "APP_ENV"));
        assert!(!When::predicate(|| false).should_load(&store(&[]), "APP_ENV"));
    }

    #[test]
    fn predicate_equality_is_identity() {
        let a = When::predicate(|| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, When::predicate(|| true));
        assert_eq!(When::Always, When::Always);
    }

    #[test]
    fn dotenv_helpers_set_config() {
        let d = Dotenv::always().path("/tmp/x.env").required(true);
        assert_eq!(d.when, When::Always);
        assert_eq!(d.config.path.as_deref(), Some(Path::new("/tmp/x.env")));
        assert!(d.config.required);
        assert!(!d.config.overwrite);
    }
}
