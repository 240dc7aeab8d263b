//! Load outcomes: the path-tagged failure list and the `Loaded` result.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One failing leaf (or shape mismatch) and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path from the root, `""` for the root itself.
    pub path: String,
    pub message: String,
}

/// Every violation found by one load, in walk order. Never empty when
/// produced by a failed load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    violations: Vec<Violation>,
}

impl Report {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// The violations as a JSON array of `{"path", "message"}` objects.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.violations).unwrap_or_else(|_| {
            // Plain strings always serialize; keep a readable form regardless.
            self.to_string()
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if v.path.is_empty() {
                write!(f, "{}", v.message)?;
            } else {
                write!(f, "{}: {}", v.path, v.message)?;
            }
        }
        Ok(())
    }
}

impl IntoIterator for Report {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// The outcome of a load in return mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Valid(T),
    Invalid(Report),
}

impl<T> Loaded<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Loaded::Valid(_))
    }

    pub fn into_result(self) -> Result<T, Report> {
        match self {
            Loaded::Valid(value) => Ok(value),
            Loaded::Invalid(report) => Err(report),
        }
    }

    pub fn ok(self) -> Option<T> {
        self.into_result().ok()
    }

    pub fn errors(&self) -> Option<&Report> {
        match self {
            Loaded::Valid(_) => None,
            Loaded::Invalid(report) => Some(report),
        }
    }
}

/// `{"ok": true, "value": ...}` or `{"ok": false, "errors": [...]}`.
impl<T: Serialize> Serialize for Loaded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Loaded", 2)?;
        match self {
            Loaded::Valid(value) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            Loaded::Invalid(report) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("errors", report)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> Report {
        Report::new(vec![
            Violation {
                path: "db.host".into(),
                message: "Expected string, got missing".into(),
            },
            Violation {
                path: "".into(),
                message: "Expected object, got array".into(),
            },
        ])
    }

    #[test]
    fn json_lists_path_and_message() {
        let parsed: serde_json::Value = serde_json::from_str(&report().to_json()).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"path": "db.host", "message": "Expected string, got missing"},
                {"path": "", "message": "Expected object, got array"},
            ])
        );
    }

    #[test]
    fn display_one_line_per_violation() {
        assert_eq!(
            report().to_string(),
            "db.host: Expected string, got missing\nExpected object, got array"
        );
    }

    #[test]
    fn loaded_serializes_with_ok_flag() {
        let valid: Loaded<i64> = Loaded::Valid(3);
        assert_eq!(serde_json::to_value(&valid).unwrap(), json!({"ok": true, "value": 3}));

        let invalid: Loaded<i64> = Loaded::Invalid(report());
        let value = serde_json::to_value(&invalid).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["errors"][0]["path"], json!("db.host"));
    }

    #[test]
    fn loaded_accessors() {
        let invalid: Loaded<i64> = Loaded::Invalid(report());
        assert!(!invalid.is_valid());
        assert_eq!(invalid.errors().map(Report::len), Some(2));
        assert_eq!(invalid.ok(), None);
        assert_eq!(Loaded::Valid(1).into_result(), Ok(1));
    }

    #[test]
    fn report_round_trips_through_serde() {
        let back: Report = serde_json::from_str(&report().to_json()).unwrap();
        assert_eq!(back, report());
    }
}
