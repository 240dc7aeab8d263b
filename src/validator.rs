//! The validator capability: an immutable check/convert step and the
//! combinators that refine it.
//!
//! A [`Validator<I, O>`] turns a borrowed `I` into an owned `O` or a single
//! failure message. Validators are reference counted, so cloning one is cheap
//! and every combinator returns a new validator that wraps the old one; no
//! combinator ever mutates its receiver.
//!
//! Absence handling (`nullable`, `optional`, `default`) only makes sense at
//! the raw end of a pipeline and is therefore only offered on
//! `Validator<Raw, O>`.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, RangeInclusive};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::Raw;

type Check<I, O> = dyn Fn(&I) -> Result<O, String> + Send + Sync;

/// Message produced when a [`filter`](Validator::filter) predicate rejects a value.
pub const FILTER_REJECTED: &str = "Value rejected by filter";

pub struct Validator<I: ?Sized, O> {
    check: Arc<Check<I, O>>,
}

impl<I: ?Sized, O> Clone for Validator<I, O> {
    fn clone(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
        }
    }
}

impl<I: ?Sized, O> fmt::Debug for Validator<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator { .. }")
    }
}

impl<I: ?Sized + 'static, O: 'static> Validator<I, O> {
    /// Wrap a check function.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&I) -> Result<O, String> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }

    /// Run the validator on one input.
    pub fn validate(&self, input: &I) -> Result<O, String> {
        (self.check)(input)
    }

    /// Transform a successfully validated value. `f` cannot fail.
    pub fn map<P: 'static, F>(self, f: F) -> Validator<I, P>
    where
        F: Fn(O) -> P + Send + Sync + 'static,
    {
        Validator::new(move |input: &I| self.validate(input).map(&f))
    }

    /// Keep the value only if `predicate` holds.
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        Validator::new(move |input: &I| {
            let value = self.validate(input)?;
            if predicate(&value) {
                Ok(value)
            } else {
                Err(FILTER_REJECTED.to_string())
            }
        })
    }

    /// Feed the converted value into a second validator.
    pub fn then<P: 'static>(self, next: Validator<O, P>) -> Validator<I, P> {
        Validator::new(move |input: &I| {
            let value = self.validate(input)?;
            next.validate(&value)
        })
    }

    /// Refine the converted value with a step that may fail with its own message.
    pub fn and<P: 'static, F>(self, f: F) -> Validator<I, P>
    where
        F: Fn(O) -> Result<P, String> + Send + Sync + 'static,
    {
        Validator::new(move |input: &I| self.validate(input).and_then(&f))
    }

    /// Replace the failure message with one computed from the original input.
    pub fn with_error<F>(self, f: F) -> Self
    where
        F: Fn(&I) -> String + Send + Sync + 'static,
    {
        Validator::new(move |input: &I| self.validate(input).map_err(|_| f(input)))
    }

    /// Relabel the output as `Tagged<O, Tag>`. Runtime behavior is unchanged.
    pub fn tagged<Tag: 'static>(self) -> Validator<I, Tagged<O, Tag>> {
        self.map(Tagged::new)
    }
}

impl<I, O> Validator<I, O>
where
    I: ?Sized + 'static,
    O: PartialOrd + fmt::Display + Send + Sync + 'static,
{
    /// Reject values outside `range` (bounds inclusive).
    pub fn within(self, range: RangeInclusive<O>) -> Self {
        Validator::new(move |input: &I| {
            let value = self.validate(input)?;
            if range.contains(&value) {
                Ok(value)
            } else {
                Err(format!(
                    "Expected value between {} and {}, got {value}",
                    range.start(),
                    range.end()
                ))
            }
        })
    }
}

impl<O: 'static> Validator<Raw, O> {
    /// Accept `Missing` and `Null` as `None`.
    pub fn nullable(self) -> Validator<Raw, Option<O>> {
        Validator::new(move |raw: &Raw| {
            if raw.is_absent() {
                Ok(None)
            } else {
                self.validate(raw).map(Some)
            }
        })
    }

    /// Accept `Missing` as `None`. An explicit `Null` still goes through `self`.
    pub fn optional(self) -> Validator<Raw, Option<O>> {
        Validator::new(move |raw: &Raw| match raw {
            Raw::Missing => Ok(None),
            present => self.validate(present).map(Some),
        })
    }

    /// Resolve `Missing` and `Null` to `fallback`.
    ///
    /// A present value is always handed to `self`, so an invalid value is
    /// reported rather than replaced.
    pub fn default(self, fallback: O) -> Validator<Raw, O>
    where
        O: Clone + Send + Sync,
    {
        Validator::new(move |raw: &Raw| {
            if raw.is_absent() {
                Ok(fallback.clone())
            } else {
                self.validate(raw)
            }
        })
    }
}

/// A value carrying a compile-time label, e.g. `Tagged<String, UserId>`.
///
/// Serializes and deserializes exactly like the wrapped value, so a struct
/// field of type `Tagged<String, UserId>` loads from a `tagged()` variable.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Tagged<T, Tag> {
    value: T,
    #[serde(skip)]
    tag: PhantomData<fn() -> Tag>,
}

impl<T, Tag> Tagged<T, Tag> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            tag: PhantomData,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, Tag> Deref for Tagged<T, Tag> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Clone, Tag> Clone for Tagged<T, Tag> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: PartialEq, Tag> PartialEq for Tagged<T, Tag> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug, Tag> fmt::Debug for Tagged<T, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> Validator<str, usize> {
        Validator::new(|s: &str| {
            if s.is_empty() {
                Err("empty".into())
            } else {
                Ok(s.len())
            }
        })
    }

    fn text() -> Validator<Raw, String> {
        Validator::new(|raw: &Raw| {
            raw.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("Expected string, got {}", raw.describe()))
        })
    }

    #[test]
    fn map_transforms_success() {
        assert_eq!(length().map(|n| n * 2).validate("abc"), Ok(6));
    }

    #[test]
    fn map_keeps_failure() {
        assert_eq!(length().map(|n| n * 2).validate(""), Err("empty".into()));
    }

    #[test]
    fn map_composition_law() {
        let f = |n: usize| n + 1;
        let g = |n: usize| n * 10;
        let chained = length().map(f).map(g);
        let fused = length().map(move |n| g(f(n)));
        for input in ["a", "abcd", ""] {
            assert_eq!(chained.validate(input), fused.validate(input));
        }
    }

    #[test]
    fn filter_rejects_with_generic_message() {
        let v = length().filter(|n| *n > 3);
        assert_eq!(v.validate("abcd"), Ok(4));
        assert_eq!(v.validate("ab"), Err(FILTER_REJECTED.into()));
    }

    #[test]
    fn then_chains_second_stage() {
        let parity = Validator::new(|n: &usize| {
            if n % 2 == 0 {
                Ok("even")
            } else {
                Err(format!("{n} is odd"))
            }
        });
        let v = length().then(parity);
        assert_eq!(v.validate("ab"), Ok("even"));
        assert_eq!(v.validate("abc"), Err("3 is odd".into()));
        assert_eq!(v.validate(""), Err("empty".into()));
    }

    #[test]
    fn and_uses_custom_message() {
        let v = length().and(|n| {
            if n < 3 {
                Ok(n)
            } else {
                Err(format!("too long: {n}"))
            }
        });
        assert_eq!(v.validate("ab"), Ok(2));
        assert_eq!(v.validate("abcdef"), Err("too long: 6".into()));
    }

    #[test]
    fn with_error_sees_raw_input() {
        let v = length().with_error(|s| format!("bad input {s:?}"));
        assert_eq!(v.validate(""), Err("bad input \"\"".into()));
        assert_eq!(v.validate("x"), Ok(1));
    }

    #[test]
    fn within_reports_bounds() {
        let v = length().within(2..=4);
        assert_eq!(v.validate("abc"), Ok(3));
        assert_eq!(
            v.validate("abcdef"),
            Err("Expected value between 2 and 4, got 6".into())
        );
    }

    #[test]
    fn nullable_accepts_missing_and_null() {
        let v = text().nullable();
        assert_eq!(v.validate(&Raw::Missing), Ok(None));
        assert_eq!(v.validate(&Raw::Null), Ok(None));
        assert_eq!(v.validate(&Raw::from("x")), Ok(Some("x".into())));
    }

    #[test]
    fn optional_accepts_missing_only() {
        let v = text().optional();
        assert_eq!(v.validate(&Raw::Missing), Ok(None));
        assert_eq!(
            v.validate(&Raw::Null),
            Err("Expected string, got null".into())
        );
    }

    #[test]
    fn default_fills_absent_value() {
        let v = text().default("fallback".into());
        assert_eq!(v.validate(&Raw::Missing), Ok("fallback".into()));
        assert_eq!(v.validate(&Raw::from("given")), Ok("given".into()));
    }

    #[test]
    fn default_does_not_mask_invalid_value() {
        let v = text().default("fallback".into());
        assert_eq!(
            v.validate(&Raw::Integer(3)),
            Err("Expected string, got 3".into())
        );
    }

    #[test]
    fn tagged_serializes_transparently() {
        struct UserId;
        let v = text().tagged::<UserId>();
        let id = v.validate(&Raw::from("u-1")).unwrap();
        assert_eq!(&*id, "u-1");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("u-1"));
    }

    #[test]
    fn tagged_deserializes_transparently() {
        struct UserId;
        let id: Tagged<String, UserId> =
            serde_json::from_value(serde_json::json!("u-2")).unwrap();
        assert_eq!(id.into_inner(), "u-2");
    }

    #[test]
    fn clones_share_behavior() {
        let v = length();
        let w = v.clone().map(|n| n + 1);
        assert_eq!(v.validate("ab"), Ok(2));
        assert_eq!(w.validate("ab"), Ok(3));
    }
}
