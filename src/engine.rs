//! Validation engine: run a validator tree against a raw data tree.
//!
//! The walk never stops at the first failure. Every failing leaf, shape
//! mismatch and (optionally) unknown key is recorded with its path, and the
//! converted value is only produced when nothing failed.
//!
//! Paths join object keys and sequence indices with dots: `database.port`,
//! `values.0`. The root itself has the empty path.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::report::{Report, Violation};
use crate::tree::LeafCheck;
use crate::types::{Literal, Raw, UnknownKeys};

static MISSING: Raw = Raw::Missing;

/// A tree of validators with the same shape as the descriptor tree it came from.
#[derive(Clone)]
pub enum ValidatorTree {
    /// The raw value must deep-equal this literal.
    Literal(Literal),
    /// A sequence of exactly this many items, each checked by its own validator.
    Tuple(Vec<ValidatorTree>),
    /// An object; only the declared keys are checked.
    Object(BTreeMap<String, ValidatorTree>),
    Leaf(LeafCheck),
}

impl fmt::Debug for ValidatorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorTree::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            ValidatorTree::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
            ValidatorTree::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            ValidatorTree::Leaf(_) => f.write_str("Leaf(..)"),
        }
    }
}

impl ValidatorTree {
    /// Validate with unknown object keys ignored.
    pub fn validate(&self, raw: &Raw) -> Result<Value, Report> {
        self.validate_with(raw, UnknownKeys::Ignore)
    }

    pub fn validate_with(&self, raw: &Raw, unknown_keys: UnknownKeys) -> Result<Value, Report> {
        let mut walk = Walk {
            unknown_keys,
            path: Vec::new(),
            violations: Vec::new(),
        };
        match walk.check(self, raw) {
            Some(value) if walk.violations.is_empty() => Ok(value.unwrap_or(Value::Null)),
            _ => Err(Report::new(walk.violations)),
        }
    }
}

struct Walk {
    unknown_keys: UnknownKeys,
    path: Vec<String>,
    violations: Vec<Violation>,
}

impl Walk {
    fn fail(&mut self, message: String) {
        self.violations.push(Violation {
            path: self.path.join("."),
            message,
        });
    }

    /// `None` means this subtree failed (and recorded why). `Some(None)` is an
    /// absent optional value.
    fn check(&mut self, tree: &ValidatorTree, raw: &Raw) -> Option<Option<Value>> {
        match tree {
            ValidatorTree::Literal(literal) => {
                if raw.matches(literal) {
                    Some(Some(literal.to_json()))
                } else {
                    self.fail(format!("Expected literal {literal}, got {}", raw.describe()));
                    None
                }
            }
            ValidatorTree::Leaf(check) => match check(raw) {
                Ok(value) => Some(value),
                Err(message) => {
                    self.fail(message);
                    None
                }
            },
            ValidatorTree::Tuple(items) => {
                let Raw::Sequence(values) = raw else {
                    self.fail(format!("Expected array, got {}", raw.describe()));
                    return None;
                };
                let mut ok = true;
                if values.len() != items.len() {
                    self.fail(format!(
                        "Expected {} items, got {}",
                        items.len(),
                        values.len()
                    ));
                    ok = false;
                }
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.path.push(index.to_string());
                    match self.check(item, values.get(index).unwrap_or(&MISSING)) {
                        Some(value) => out.push(value.unwrap_or(Value::Null)),
                        None => ok = false,
                    }
                    self.path.pop();
                }
                ok.then_some(Some(Value::Array(out)))
            }
            ValidatorTree::Object(fields) => {
                let Raw::Mapping(entries) = raw else {
                    self.fail(format!("Expected object, got {}", raw.describe()));
                    return None;
                };
                let mut ok = true;
                let mut out = serde_json::Map::new();
                for (key, field) in fields {
                    self.path.push(key.clone());
                    match self.check(field, entries.get(key).unwrap_or(&MISSING)) {
                        Some(Some(value)) => {
                            out.insert(key.clone(), value);
                        }
                        Some(None) => {}
                        None => ok = false,
                    }
                    self.path.pop();
                }
                if self.unknown_keys == UnknownKeys::Reject {
                    for key in entries.keys().filter(|k| !fields.contains_key(*k)) {
                        self.path.push(key.clone());
                        self.fail("Unknown key".to_string());
                        self.path.pop();
                        ok = false;
                    }
                }
                ok.then_some(Some(Value::Object(out)))
            }
        }
    }
}
