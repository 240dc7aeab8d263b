//! Extraction walk: mirror a descriptor tree into a raw data tree.
//!
//! Literals and containers are copied as they are; each variable is replaced
//! by its store lookup, or [`Raw::Missing`]. Nothing is validated here and
//! nothing can fail.

use std::collections::BTreeMap;

use crate::store::Store;
use crate::tree::{AnyVariable, Fold, Node};
use crate::types::{Literal, Raw};

/// Resolve every variable in `tree` against `store`.
pub fn extract(tree: &Node, store: &dyn Store) -> Raw {
    tree.fold(&mut Extraction { store })
}

struct Extraction<'a> {
    store: &'a dyn Store,
}

impl Fold for Extraction<'_> {
    type Output = Raw;

    fn scalar(&mut self, literal: &Literal) -> Raw {
        Raw::from(literal.clone())
    }

    fn sequence(&mut self, items: Vec<Raw>) -> Raw {
        Raw::Sequence(items)
    }

    fn mapping(&mut self, entries: BTreeMap<String, Raw>) -> Raw {
        Raw::Mapping(entries)
    }

    fn variable(&mut self, variable: &AnyVariable) -> Raw {
        Raw::from(self.store.lookup(variable.name()))
    }
}
