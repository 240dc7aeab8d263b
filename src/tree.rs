//! The descriptor tree and the one recursion every tree walk shares.
//!
//! A [`Node`] is a closed union of four kinds: literal scalars, ordered
//! sequences, keyed mappings and variables. Extraction and validator synthesis
//! are both expressed as a [`Fold`] over this tree, so there is exactly one
//! place that knows how to descend into it.
//!
//! ```ignore
//! use envtree::Node;
//! use envtree::variable::{int, string};
//!
//! let tree = Node::mapping([
//!     ("name", "demo".into()),
//!     ("database", Node::mapping([
//!         ("host", string("DB_HOST").into()),
//!         ("port", int("DB_PORT").default(5432).into()),
//!     ])),
//! ]);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::types::{Literal, Raw};
use crate::variable::Variable;

/// Outcome of a leaf check: `Some(value)`, or `None` when the value is absent
/// and should be left out of the loaded object.
pub type LeafCheck = Arc<dyn Fn(&Raw) -> Result<Option<serde_json::Value>, String> + Send + Sync>;

/// A [`Variable`] with its output type erased to JSON.
#[derive(Clone)]
pub struct AnyVariable {
    name: String,
    check: LeafCheck,
}

impl AnyVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The validator bound to this variable, with its output rendered as JSON.
    pub fn check(&self) -> &LeafCheck {
        &self.check
    }
}

impl fmt::Debug for AnyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyVariable")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T: Serialize + 'static> From<Variable<T>> for AnyVariable {
    fn from(variable: Variable<T>) -> Self {
        let name = variable.name().to_string();
        let omit_missing = variable.omits_absent();
        let validator = variable.validator().clone();
        let check: LeafCheck = Arc::new(move |raw: &Raw| {
            let value = validator.validate(raw)?;
            let json = serde_json::to_value(&value)
                .map_err(|e| format!("Could not represent value: {e}"))?;
            // Only a missing key is omitted; a present value that renders as
            // `null` (e.g. the JSON document `null`) is kept.
            Ok(if omit_missing && *raw == Raw::Missing && json.is_null() {
                None
            } else {
                Some(json)
            })
        });
        Self { name, check }
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Scalar(Literal),
    Sequence(Vec<Node>),
    Mapping(BTreeMap<String, Node>),
    Variable(AnyVariable),
}

impl Node {
    /// Build a mapping node. Later entries replace earlier ones with the same key.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn sequence<I: IntoIterator<Item = Node>>(items: I) -> Self {
        Node::Sequence(items.into_iter().collect())
    }

    /// Walk the tree bottom-up: children are folded before their container.
    pub fn fold<F: Fold + ?Sized>(&self, folder: &mut F) -> F::Output {
        match self {
            Node::Scalar(literal) => folder.scalar(literal),
            Node::Sequence(items) => {
                let items = items.iter().map(|item| item.fold(&mut *folder)).collect();
                folder.sequence(items)
            }
            Node::Mapping(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.fold(&mut *folder)))
                    .collect();
                folder.mapping(entries)
            }
            Node::Variable(variable) => folder.variable(variable),
        }
    }

    /// Store keys referenced anywhere in the tree, in walk order.
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = VariableNames(Vec::new());
        self.fold(&mut names);
        names.0
    }
}

/// One step of a structural walk over a [`Node`], one method per node kind.
pub trait Fold {
    type Output;

    fn scalar(&mut self, literal: &Literal) -> Self::Output;
    fn sequence(&mut self, items: Vec<Self::Output>) -> Self::Output;
    fn mapping(&mut self, entries: BTreeMap<String, Self::Output>) -> Self::Output;
    fn variable(&mut self, variable: &AnyVariable) -> Self::Output;
}

struct VariableNames(Vec<String>);

impl Fold for VariableNames {
    type Output = ();

    fn scalar(&mut self, _literal: &Literal) {}

    fn sequence(&mut self, _items: Vec<()>) {}

    fn mapping(&mut self, _entries: BTreeMap<String, ()>) {}

    fn variable(&mut self, variable: &AnyVariable) {
        self.0.push(variable.name().to_string());
    }
}

impl<T: Serialize + 'static> From<Variable<T>> for Node {
    fn from(variable: Variable<T>) -> Self {
        Node::Variable(variable.into())
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        Node::Scalar(literal)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<u16> for Node {
    fn from(value: u16) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Scalar(value.into())
    }
}

/// # Panics
///
/// Panics if `value` is NaN or infinite.
impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<BTreeMap<String, Node>> for Node {
    fn from(entries: BTreeMap<String, Node>) -> Self {
        Node::Mapping(entries)
    }
}
