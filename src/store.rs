//! The external key-value store variables are read from.
//!
//! [`ProcessEnv`] reads `std::env`; [`MemoryStore`] holds pairs in memory so
//! tests and embedders can pass synthetic data instead of the real
//! environment.

use std::collections::BTreeMap;
use std::path::Path;

/// A synchronous key-value lookup, plus the write path used by the dotenv pre-load.
pub trait Store {
    /// The value stored under `name`, or `None` when the key is absent.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Read the dotenv file at `path` into the store. Existing keys are kept
    /// unless `overwrite` is set.
    fn load_dotenv(&mut self, path: &Path, overwrite: bool) -> Result<(), dotenvy::Error>;
}

/// The process environment.
///
/// Values that are not valid Unicode are read lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Store for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }

    fn load_dotenv(&mut self, path: &Path, overwrite: bool) -> Result<(), dotenvy::Error> {
        if overwrite {
            dotenvy::from_path_override(path)
        } else {
            dotenvy::from_path(path)
        }
    }
}

/// An in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    vars: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment, reading non-Unicode
    /// entries lossily.
    pub fn from_env() -> Self {
        std::env::vars_os()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Store for MemoryStore {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    /// Parses the whole file before inserting, so a malformed file leaves the
    /// store unchanged.
    fn load_dotenv(&mut self, path: &Path, overwrite: bool) -> Result<(), dotenvy::Error> {
        let entries = dotenvy::from_path_iter(path)?.collect::<Result<Vec<_>, _>>()?;
        for (key, value) in entries {
            if overwrite {
                self.vars.insert(key, value);
            } else {
                self.vars.entry(key).or_insert(value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store(pairs: &[(&str, &str)]) -> MemoryStore {
        pairs.iter().copied().collect()
    }

    #[test]
    fn lookup_present_key() {
        let s = store(&[("APP_NAME", "demo")]);
        assert_eq!(s.lookup("APP_NAME").as_deref(), Some("demo"));
    }

    #[test]
    fn lookup_absent_key() {
        let s = store(&[("APP_NAME", "demo")]);
        assert_eq!(s.lookup("OTHER"), None);
    }

    #[test]
    fn empty_value_is_present() {
        let s = store(&[("EMPTY", "")]);
        assert_eq!(s.lookup("EMPTY").as_deref(), Some(""));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let s = store(&[("PORT", "1")]);
        assert_eq!(s.lookup("port"), None);
    }

    fn env_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn memory_dotenv_keeps_existing_by_default() {
        let dir = TempDir::new().unwrap();
        let path = env_file(&dir, ".env", "A=new\nB=b\n");
        let mut s = store(&[("A", "old")]);
        s.load_dotenv(&path, false).unwrap();
        assert_eq!(s.lookup("A").as_deref(), Some("old"));
        assert_eq!(s.lookup("B").as_deref(), Some("b"));
    }

    #[test]
    fn memory_dotenv_overwrite_replaces() {
        let dir = TempDir::new().unwrap();
        let path = env_file(&dir, ".env", "A=new\n");
        let mut s = store(&[("A", "old")]);
        s.load_dotenv(&path, true).unwrap();
        assert_eq!(s.lookup("A").as_deref(), Some("new"));
    }

    #[test]
    fn memory_dotenv_malformed_file_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = env_file(&dir, ".env", "A=new\nNOT A VALID LINE\n");
        let mut s = store(&[("A", "old")]);
        assert!(s.load_dotenv(&path, true).is_err());
        assert_eq!(s, store(&[("A", "old")]));
    }

    #[test]
    fn process_env_dotenv_round_trip() {
        let key = format!("ENVTREE_DOTENV_TEST_{}", std::process::id());
        let dir = TempDir::new().unwrap();
        let first = env_file(&dir, "first.env", &format!("{key}=first\n"));
        let second = env_file(&dir, "second.env", &format!("{key}=second\n"));

        let mut env = ProcessEnv;
        env.load_dotenv(&first, false).unwrap();
        assert_eq!(env.lookup(&key).as_deref(), Some("first"));

        env.load_dotenv(&second, false).unwrap();
        assert_eq!(env.lookup(&key).as_deref(), Some("first"));

        env.load_dotenv(&second, true).unwrap();
        assert_eq!(env.lookup(&key).as_deref(), Some("second"));
    }

    #[test]
    fn from_env_snapshots_process_env() {
        let snapshot = MemoryStore::from_env();
        assert_eq!(snapshot.lookup("PATH"), ProcessEnv.lookup("PATH"));
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn insert_and_remove() {
        let mut s = MemoryStore::new();
        assert!(s.is_empty());
        s.insert("A", "1");
        assert_eq!(s.len(), 1);
        assert_eq!(s.remove("A").as_deref(), Some("1"));
        assert_eq!(s.lookup("A"), None);
    }

    #[test]
    fn process_env_reads_path() {
        // PATH is set in every reasonable test environment.
        let direct = std::env::var_os("PATH").map(|v| v.to_string_lossy().into_owned());
        assert_eq!(ProcessEnv.lookup("PATH"), direct);
    }
}
