use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::dotenv::{self, Dotenv};
use crate::error::EnvtreeError;
use crate::extract::extract;
use crate::report::Loaded;
use crate::store::{ProcessEnv, Store};
use crate::synthesize::synthesize;
use crate::tree::Node;
use crate::types::{Mode, UnknownKeys};
use crate::variable::ENVIRONMENT_KEY;

/// Entry point for building an envtree load.
pub struct Envtree;

impl Envtree {
    pub fn builder() -> EnvtreeBuilder {
        EnvtreeBuilder::new()
    }
}

/// Builder for one load of a descriptor tree.
///
/// Every setting has a default, so `Envtree::builder().load(tree)` reads the
/// process environment in [`Mode::Throw`] without any dotenv pre-load.
pub struct EnvtreeBuilder {
    mode: Mode,
    dotenv: Option<Dotenv>,
    store: Box<dyn Store>,
    environment_key: String,
    strict: bool,
}

impl EnvtreeBuilder {
    fn new() -> Self {
        Self {
            mode: Mode::default(),
            dotenv: None,
            store: Box::new(ProcessEnv),
            environment_key: ENVIRONMENT_KEY.to_string(),
            strict: false,
        }
    }

    /// What an invalid load returns (default: [`Mode::Throw`]).
    ///
    /// - [`Throw`](Mode::Throw): `Err(EnvtreeError::Invalid(report))`.
    /// - [`Return`](Mode::Return): `Ok(Loaded::Invalid(report))`.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Read a dotenv file into the store before extraction, if its gate passes.
    pub fn dotenv(mut self, dotenv: Dotenv) -> Self {
        self.dotenv = Some(dotenv);
        self
    }

    /// Set or clear the dotenv pre-load (useful with
    /// [`DotenvArgs::into_dotenv`](crate::DotenvArgs::into_dotenv)).
    pub fn maybe_dotenv(mut self, dotenv: Option<Dotenv>) -> Self {
        self.dotenv = dotenv;
        self
    }

    /// Read variables from `store` instead of the process environment.
    pub fn store(mut self, store: impl Store + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Key checked by [`When::NotProduction`](crate::dotenv::When::NotProduction)
    /// (default: [`ENVIRONMENT_KEY`]).
    pub fn environment_key(mut self, key: &str) -> Self {
        self.environment_key = key.to_string();
        self
    }

    /// Report object keys the tree does not declare (default: `false`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn unknown_keys(&self) -> UnknownKeys {
        if self.strict {
            UnknownKeys::Reject
        } else {
            UnknownKeys::Ignore
        }
    }

    /// Run the dotenv gate and pre-load.
    fn preload(&mut self) -> Result<(), EnvtreeError> {
        let Some(dotenv) = &self.dotenv else {
            return Ok(());
        };
        if !dotenv.when.should_load(self.store.as_ref(), &self.environment_key) {
            debug!(when = ?dotenv.when, reason = "gate closed", "Skipped dotenv file");
            return Ok(());
        }
        dotenv::preload(self.store.as_mut(), &dotenv.config)?;
        Ok(())
    }

    /// Load the tree as a JSON value.
    pub fn load_value(mut self, tree: impl Into<Node>) -> Result<Loaded<Value>, EnvtreeError> {
        let tree = tree.into();
        self.preload()?;

        debug!(variables = tree.variable_names().len(), "Loading environment variables");
        let raw = extract(&tree, self.store.as_ref());
        let validators = synthesize(&tree);

        match validators.validate_with(&raw, self.unknown_keys()) {
            Ok(value) => Ok(Loaded::Valid(value)),
            Err(report) => {
                warn!(violations = report.len(), "Environment variables failed validation");
                match self.mode {
                    Mode::Throw => Err(EnvtreeError::Invalid(report)),
                    Mode::Return => Ok(Loaded::Invalid(report)),
                }
            }
        }
    }

    /// Load the tree and deserialize the validated value into `T`.
    pub fn load<T: DeserializeOwned>(
        self,
        tree: impl Into<Node>,
    ) -> Result<Loaded<T>, EnvtreeError> {
        match self.load_value(tree)? {
            Loaded::Valid(value) => Ok(Loaded::Valid(serde_json::from_value(value)?)),
            Loaded::Invalid(report) => Ok(Loaded::Invalid(report)),
        }
    }
}

/// Load `tree` from the process environment, failing on any violation.
pub fn load<T: DeserializeOwned>(tree: impl Into<Node>) -> Result<T, EnvtreeError> {
    Envtree::builder()
        .mode(Mode::Throw)
        .load(tree)?
        .into_result()
        .map_err(EnvtreeError::Invalid)
}

/// Load `tree` from the process environment, returning violations as data.
pub fn load_safe<T: DeserializeOwned>(tree: impl Into<Node>) -> Result<Loaded<T>, EnvtreeError> {
    Envtree::builder().mode(Mode::Return).load(tree)
}
