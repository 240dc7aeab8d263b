//! Declare the configuration your program needs as one tree of literals and
//! environment variables, then load and validate all of it in one pass.
//!
//! ```ignore
//! use envtree::{Node, load};
//! use envtree::variable::{int, string};
//!
//! let config: AppConfig = load(Node::mapping([
//!     ("name", string("APP_NAME").into()),
//!     ("port", int("PORT").within(1..=65535).default(8080).into()),
//!     ("database", Node::mapping([
//!         ("host", string("DB_HOST").into()),
//!         ("pool", int("DB_POOL").optional().into()),
//!     ])),
//! ]))?;
//! ```
//!
//! That single call reads `APP_NAME`, `PORT`, `DB_HOST` and `DB_POOL`,
//! converts and checks each one, and hands back a typed struct. If anything is
//! wrong you get every problem at once, each tagged with its path in the tree:
//!
//! ```text
//! Could not load environment variables: [{"path":"database.host","message":"Expected string, got missing"},{"path":"port","message":"Expected value between 1 and 65535, got 99999"}]
//! ```
//!
//! # The descriptor tree
//!
//! A [`Node`] is one of four things:
//!
//! - a **scalar** literal (`"demo"`, `12`, `true`), loaded as itself;
//! - a **sequence** of nodes, loaded as a fixed-length array;
//! - a **mapping** of keys to nodes, loaded as an object;
//! - a **variable**: a store key bound to a validator.
//!
//! The same tree drives both halves of a load. Extraction replaces every
//! variable with its raw store value ([`extract`]); synthesis replaces every
//! node with a matching validator ([`synthesize`]). Both are written as a
//! [`Fold`](tree::Fold) over the tree, so adding a walk never means writing
//! another recursion.
//!
//! # Variables and combinators
//!
//! The [`variable`] module has one constructor per common type (`string`,
//! `int`, `number`, `boolean`, `iso_date`, `url`, `json`, ...) plus
//! [`variable()`](variable::variable) for a custom [`Validator`]. Every
//! combinator returns a new descriptor and leaves its receiver untouched, so
//! one declaration can be refined differently wherever it is used:
//!
//! | Combinator | Missing | Null | Present |
//! |------------|---------|------|---------|
//! | (none) | fails | fails | validated |
//! | `nullable()` | `null` | `null` | validated |
//! | `optional()` | key omitted | validated | validated |
//! | `default(d)` | `d` | `d` | validated |
//!
//! A present value is always validated: `default` never hides a bad value.
//! An empty string is a present value, not a missing one.
//!
//! # Modes
//!
//! [`Mode::Throw`] (the default, and what [`load`] uses) turns an invalid
//! load into [`EnvtreeError::Invalid`]. [`Mode::Return`] (used by
//! [`load_safe`]) returns [`Loaded::Invalid`] with the [`Report`] instead, so
//! the caller can print or inspect it.
//!
//! # Dotenv
//!
//! [`EnvtreeBuilder::dotenv`] reads a `.env` file into the store before any
//! variable is looked up. The [`When`] gate decides whether it runs:
//! `Always`, `NotProduction` (skip when `APP_ENV` is exactly `production`) or
//! an arbitrary predicate. Variables already in the store win unless
//! `overwrite` is set.
//!
//! # Stores
//!
//! Loads read the process environment by default. Any [`Store`] can stand in
//! for it; [`MemoryStore`] is a plain map, which keeps tests independent of
//! the real environment.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`DotenvArgs`] gives an
//! application `--env-file` and `--dotenv <always|not-production|never>`
//! flags that convert straight into a [`Dotenv`].
//!
//! # Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events (dotenv
//! loaded or skipped, load started, load failed) and installs no subscriber.

pub mod dotenv;
pub mod engine;
pub mod error;
pub mod report;
pub mod store;
pub mod tree;
pub mod types;
pub mod validator;
pub mod validators;
pub mod variable;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod extract;
mod synthesize;

#[cfg(test)]
mod fixtures;

pub use builder::{Envtree, EnvtreeBuilder, load, load_safe};
#[cfg(feature = "clap")]
pub use cli::{DotenvArgs, DotenvWhen};
pub use dotenv::{Dotenv, DotenvConfig, When};
pub use engine::ValidatorTree;
pub use error::EnvtreeError;
pub use extract::extract;
pub use report::{Loaded, Report, Violation};
pub use store::{MemoryStore, ProcessEnv, Store};
pub use synthesize::synthesize;
pub use tree::{AnyVariable, Node};
pub use types::{Literal, Mode, Raw, UnknownKeys};
pub use validator::{Tagged, Validator};
pub use variable::Variable;
