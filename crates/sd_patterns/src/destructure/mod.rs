//! Destructurers for values that are not template nodes themselves.
//!
//! # Resolution Order
//!
//! 1. A `Value::Structure` node destructures itself.
//! 2. Custom destructurers, in registration order.
//! 3. The built-ins: ADT instances, tuples, lists.
//!
//! A destructurer is chosen by the *template*. It then splits both the
//! template and the matched value, and the two item lists are zipped.

use std::fmt;
use std::sync::{Arc, LazyLock};

use sd_types::{Items, MatchFailure, Value};

/// Splits values of one family into sub-items.
pub trait Destructurer: Send + Sync {
    /// Short name used in traces.
    fn name(&self) -> &'static str;

    /// Whether this destructurer is responsible for `target`.
    fn handles(&self, target: &Value) -> bool;

    /// Split `subject` as seen through `target`.
    ///
    /// `subject` is `target` itself when the template side is requested.
    /// Items are returned in push order, last child first.
    fn destructure(&self, target: &Value, subject: &Value) -> Result<Items, MatchFailure>;
}

/// ADT instances match only instances of exactly the same class.
pub struct AdtDestructurer;

impl Destructurer for AdtDestructurer {
    fn name(&self) -> &'static str {
        "adt"
    }

    fn handles(&self, target: &Value) -> bool {
        target.is_adt()
    }

    fn destructure(&self, target: &Value, subject: &Value) -> Result<Items, MatchFailure> {
        let same_class = match (target.class_of(), subject.class_of()) {
            (Some(expected), Some(found)) => subject.is_adt() && expected.id() == found.id(),
            _ => false,
        };
        if !same_class {
            return Err(MatchFailure);
        }
        Ok(reversed(subject.items().unwrap_or_default()))
    }
}

/// Tuples match tuples of the same length whose class is the target's class
/// or derives from it. ADT instances never match here.
pub struct TupleDestructurer;

impl Destructurer for TupleDestructurer {
    fn name(&self) -> &'static str {
        "tuple"
    }

    fn handles(&self, target: &Value) -> bool {
        matches!(target, Value::Tuple(_))
    }

    fn destructure(&self, target: &Value, subject: &Value) -> Result<Items, MatchFailure> {
        if subject.is_adt() {
            return Err(MatchFailure);
        }
        let (Value::Tuple(expected), Value::Tuple(found)) = (target, subject) else {
            return Err(MatchFailure);
        };
        if !found.is_instance_of(expected.class().map(Arc::as_ref))
            || found.items().len() != expected.items().len()
        {
            return Err(MatchFailure);
        }
        Ok(reversed(found.items()))
    }
}

/// Lists match lists of the same length.
pub struct ListDestructurer;

impl Destructurer for ListDestructurer {
    fn name(&self) -> &'static str {
        "list"
    }

    fn handles(&self, target: &Value) -> bool {
        matches!(target, Value::List(_))
    }

    fn destructure(&self, target: &Value, subject: &Value) -> Result<Items, MatchFailure> {
        match (target, subject) {
            (Value::List(expected), Value::List(found)) if expected.len() == found.len() => {
                Ok(reversed(found))
            }
            _ => Err(MatchFailure),
        }
    }
}

fn reversed(items: &[Value]) -> Items {
    items.iter().rev().cloned().collect()
}

/// Ordered destructurers, consulted first to last.
#[derive(Clone)]
pub struct DestructurerList {
    destructurers: Vec<Arc<dyn Destructurer>>,
}

impl DestructurerList {
    /// Only the built-in destructurers.
    pub fn builtin() -> Self {
        DestructurerList {
            destructurers: vec![
                Arc::new(AdtDestructurer),
                Arc::new(TupleDestructurer),
                Arc::new(ListDestructurer),
            ],
        }
    }

    /// Custom destructurers, tried before the built-ins.
    pub fn custom(custom: impl IntoIterator<Item = Arc<dyn Destructurer>>) -> Self {
        let mut destructurers: Vec<Arc<dyn Destructurer>> = custom.into_iter().collect();
        destructurers.extend(Self::builtin().destructurers);
        DestructurerList { destructurers }
    }

    /// The destructurer responsible for `target`, if any.
    pub fn get(&self, target: &Value) -> Option<&dyn Destructurer> {
        self.destructurers
            .iter()
            .find(|d| d.handles(target))
            .map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.destructurers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destructurers.is_empty()
    }
}

impl Default for DestructurerList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for DestructurerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.destructurers.iter().map(|d| d.name()))
            .finish()
    }
}

/// The process-wide list used by the free matching functions.
pub static DESTRUCTURERS: LazyLock<DestructurerList> = LazyLock::new(DestructurerList::builtin);

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
