//! Validator synthesis walk: mirror a descriptor tree into a validator tree.

use std::collections::BTreeMap;

use crate::engine::ValidatorTree;
use crate::tree::{AnyVariable, Fold, Node};
use crate::types::Literal;

/// Build the validator tree matching `tree`.
///
/// Literals must be matched exactly, sequences become fixed-arity tuples,
/// mappings become objects over their declared keys, and variables contribute
/// their own validator.
pub fn synthesize(tree: &Node) -> ValidatorTree {
    tree.fold(&mut Synthesis)
}

struct Synthesis;

impl Fold for Synthesis {
    type Output = ValidatorTree;

    fn scalar(&mut self, literal: &Literal) -> ValidatorTree {
        ValidatorTree::Literal(literal.clone())
    }

    fn sequence(&mut self, items: Vec<ValidatorTree>) -> ValidatorTree {
        ValidatorTree::Tuple(items)
    }

    fn mapping(&mut self, entries: BTreeMap<String, ValidatorTree>) -> ValidatorTree {
        ValidatorTree::Object(entries)
    }

    fn variable(&mut self, variable: &AnyVariable) -> ValidatorTree {
        ValidatorTree::Leaf(variable.check().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Raw;
    use crate::variable::{int, string};
    use serde_json::json;

    fn sample() -> Node {
        Node::mapping([
            ("name", string("APP_NAME").into()),
            ("version", 3.into()),
            ("ports", Node::sequence([int("A").into(), int("B").into()])),
        ])
    }

    #[test]
    fn shape_mirrors_descriptor_tree() {
        let ValidatorTree::Object(fields) = synthesize(&sample()) else {
            panic!("Expected object validator");
        };
        assert!(matches!(fields["name"], ValidatorTree::Leaf(_)));
        assert!(matches!(
            fields["version"],
            ValidatorTree::Literal(Literal::Integer(3))
        ));
        match &fields["ports"] {
            ValidatorTree::Tuple(items) => assert_eq!(items.len(), 2),
            other => panic!("Expected tuple validator, got {other:?}"),
        }
    }

    #[test]
    fn synthesizing_twice_behaves_identically() {
        let tree = sample();
        let first = synthesize(&tree);
        let second = synthesize(&tree);
        let raw = Raw::Mapping(BTreeMap::from([
            ("name".to_string(), Raw::from("demo")),
            ("version".to_string(), Raw::Integer(3)),
            (
                "ports".to_string(),
                Raw::Sequence(vec![Raw::from("1"), Raw::from("x")]),
            ),
        ]));
        assert_eq!(first.validate(&raw), second.validate(&raw));
    }

    #[test]
    fn leaf_uses_bound_validator() {
        let tree: Node = int("PORT").map(|n| n * 2).into();
        let validator = synthesize(&tree);
        assert_eq!(validator.validate(&Raw::from("21")), Ok(json!(42)));
    }
}
