//! Variable descriptors: a store key bound to a validator.
//!
//! A [`Variable<T>`] is an immutable value. Combinators consume it and return
//! a new descriptor with the same name and a wrapped validator, so a variable
//! declared once (even in a `static`/`LazyLock`) can be refined differently
//! in several trees.
//!
//! ```ignore
//! use envtree::variable::{int, string};
//!
//! let port = int("PORT").within(1..=65535).default(8080);
//! let icon = string("APP_ICON").optional();
//! ```

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::Raw;
use crate::validator::{Tagged, Validator};
use crate::validators;

/// Store key holding the deployment classification (`development`, `test`,
/// `production`). Also consulted by [`When::NotProduction`](crate::dotenv::When).
pub const ENVIRONMENT_KEY: &str = "APP_ENV";

pub struct Variable<T> {
    name: String,
    validator: Validator<Raw, T>,
    /// Render a `null` output as a missing key (set by `optional`).
    omit_missing: bool,
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            validator: self.validator.clone(),
            omit_missing: self.omit_missing,
        }
    }
}

impl<T> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Variable<T> {
    /// Bind `name` to `validator`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>, validator: Validator<Raw, T>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "envtree: variable name must not be empty");
        Self {
            name,
            validator,
            omit_missing: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validator(&self) -> &Validator<Raw, T> {
        &self.validator
    }

    /// Whether an absent value is left out of the loaded object.
    pub fn omits_absent(&self) -> bool {
        self.omit_missing
    }

    fn update<U, F>(self, wrap: F) -> Variable<U>
    where
        F: FnOnce(Validator<Raw, T>) -> Validator<Raw, U>,
    {
        Variable {
            name: self.name,
            validator: wrap(self.validator),
            omit_missing: self.omit_missing,
        }
    }

    /// See [`Validator::map`].
    pub fn map<U: 'static, F>(self, f: F) -> Variable<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.update(|v| v.map(f))
    }

    /// See [`Validator::filter`].
    pub fn filter<F>(self, predicate: F) -> Variable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.update(|v| v.filter(predicate))
    }

    /// See [`Validator::then`].
    pub fn then<U: 'static>(self, next: Validator<T, U>) -> Variable<U> {
        self.update(|v| v.then(next))
    }

    /// See [`Validator::and`].
    pub fn and<U: 'static, F>(self, f: F) -> Variable<U>
    where
        F: Fn(T) -> Result<U, String> + Send + Sync + 'static,
    {
        self.update(|v| v.and(f))
    }

    /// See [`Validator::with_error`]. `f` receives the raw store value.
    pub fn with_error<F>(self, f: F) -> Variable<T>
    where
        F: Fn(&Raw) -> String + Send + Sync + 'static,
    {
        self.update(|v| v.with_error(f))
    }

    /// See [`Validator::tagged`].
    pub fn tagged<Tag: 'static>(self) -> Variable<Tagged<T, Tag>> {
        self.update(|v| v.tagged())
    }

    /// Absent (missing or null) becomes `None`, loaded as `null`.
    pub fn nullable(self) -> Variable<Option<T>> {
        self.update(|v| v.nullable())
    }

    /// A missing key becomes `None` and is left out of the loaded object.
    pub fn optional(self) -> Variable<Option<T>> {
        Variable {
            name: self.name,
            validator: self.validator.optional(),
            omit_missing: true,
        }
    }

    /// Absent becomes `fallback`; a present but invalid value still fails.
    pub fn default(self, fallback: T) -> Variable<T>
    where
        T: Clone + Send + Sync,
    {
        self.update(|v| v.default(fallback))
    }
}

impl<T> Variable<T>
where
    T: PartialOrd + fmt::Display + Send + Sync + 'static,
{
    /// See [`Validator::within`].
    pub fn within(self, range: RangeInclusive<T>) -> Variable<T> {
        self.update(|v| v.within(range))
    }
}

/// Declare a variable with a custom validator.
pub fn variable<T: 'static>(name: &str, validator: Validator<Raw, T>) -> Variable<T> {
    Variable::new(name, validator)
}

pub fn string(name: &str) -> Variable<String> {
    variable(name, validators::string())
}

pub fn int(name: &str) -> Variable<i64> {
    variable(name, validators::integer())
}

pub fn number(name: &str) -> Variable<f64> {
    variable(name, validators::float())
}

pub fn boolean(name: &str) -> Variable<bool> {
    variable(name, validators::boolean())
}

/// Any `FromStr` type, e.g. `parse::<u16>("PORT")` or `parse::<IpAddr>("BIND")`.
pub fn parse<T>(name: &str) -> Variable<T>
where
    T: std::str::FromStr + 'static,
    T::Err: fmt::Display,
{
    variable(name, validators::parse())
}

/// One of a fixed set of strings: `one_of("LOG_LEVEL", &["debug", "info"])`.
pub fn one_of<S: AsRef<str>>(name: &str, accepted: &[S]) -> Variable<String> {
    variable(name, validators::one_of(accepted))
}

/// A serde enum named by its serialized variant names.
pub fn enumerated<T: DeserializeOwned + 'static>(name: &str) -> Variable<T> {
    variable(name, validators::enumerated())
}

pub fn iso_date(name: &str) -> Variable<DateTime<Utc>> {
    variable(name, validators::iso_date())
}

pub fn url(name: &str) -> Variable<String> {
    variable(name, validators::url())
}

pub fn absolute_url(name: &str) -> Variable<String> {
    variable(name, validators::absolute_url())
}

pub fn relative_url(name: &str, base: Option<&str>) -> Variable<String> {
    variable(name, validators::relative_url(base))
}

/// A JSON document. Keep these rare; whoever operates the app has to write them.
pub fn json<T: DeserializeOwned + 'static>(name: &str) -> Variable<T> {
    variable(name, validators::json())
}

pub fn json_with<T: 'static>(
    name: &str,
    validator: Validator<serde_json::Value, T>,
) -> Variable<T> {
    variable(name, validators::json_with(validator))
}

/// Deployment classification read from [`ENVIRONMENT_KEY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

/// [`ENVIRONMENT_KEY`] as an [`Environment`]; accepts the aliases `dev` and `prod`.
pub fn environment() -> Variable<Environment> {
    string(ENVIRONMENT_KEY).and(|value| match value.as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" | "prod" => Ok(Environment::Production),
        other => Err(format!(
            "Expected \"development\", \"test\" or \"production\", got {other:?}"
        )),
    })
}

pub fn is_development() -> Variable<bool> {
    string(ENVIRONMENT_KEY).map(|v| v == "development" || v == "dev")
}

pub fn is_test() -> Variable<bool> {
    string(ENVIRONMENT_KEY).map(|v| v == "test")
}

pub fn is_production() -> Variable<bool> {
    string(ENVIRONMENT_KEY).map(|v| v == "production" || v == "prod")
}
