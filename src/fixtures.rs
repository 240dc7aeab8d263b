#[cfg(test)]
pub mod test {
    use serde::{Deserialize, Serialize};

    use crate::store::MemoryStore;
    use crate::tree::Node;
    use crate::variable::{boolean, int, string};

    pub fn store(pairs: &[(&str, &str)]) -> MemoryStore {
        pairs.iter().copied().collect()
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct TestConfig {
        pub name: String,
        pub port: i64,
        pub debug: bool,
        pub database: TestDbConfig,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    pub struct TestDbConfig {
        pub host: String,
        /// Left out of the loaded object when `DB_POOL` is unset.
        #[serde(default)]
        pub pool_size: Option<i64>,
    }

    /// Descriptor tree matching [`TestConfig`].
    pub fn test_tree() -> Node {
        Node::mapping([
            ("name", "demo".into()),
            ("port", int("PORT").within(1..=65535).default(8080).into()),
            ("debug", boolean("DEBUG").default(false).into()),
            (
                "database",
                Node::mapping([
                    ("host", string("DB_HOST").into()),
                    ("pool_size", int("DB_POOL").optional().into()),
                ]),
            ),
        ])
    }

    #[test]
    fn test_tree_names_its_variables() {
        assert_eq!(
            test_tree().variable_names(),
            vec!["DB_HOST", "DB_POOL", "DEBUG", "PORT"]
        );
    }
}
