//! Predicate checks.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use sd_types::{CompoundMatch, Items, MatchFailure, NodeParts, Subject, Value};
use smallvec::{smallvec, SmallVec};

/// Predicate applied to a matched value.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Succeeds when the predicate holds; binds nothing.
#[derive(Clone)]
pub struct Guard {
    predicate: Predicate,
}

impl Guard {
    pub fn new(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Accepts truthy values.
    pub fn truthy() -> Self {
        Guard::new(Value::is_truthy)
    }

    /// Accepts falsy values.
    pub fn falsy() -> Self {
        Guard::new(|value| !value.is_truthy())
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// `guard[structure]`: check, then keep matching `structure` against the
    /// same value. A discard structure leaves the bare guard.
    pub fn with_structure(self, structure: Value) -> Value {
        if matches!(structure, Value::Discard) {
            return Value::structure(self);
        }
        Value::structure(AsGuard {
            guard: self,
            structure,
        })
    }
}

/// `Guard(predicate, structure)`.
pub fn guard(
    predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    structure: Value,
) -> Value {
    Guard::new(predicate).with_structure(structure)
}

impl From<Guard> for Value {
    fn from(guard: Guard) -> Self {
        Value::structure(guard)
    }
}

impl CompoundMatch for Guard {
    fn destructure(&self, subject: Subject<'_>) -> Result<Items, MatchFailure> {
        match subject {
            Subject::Template => Ok(SmallVec::new()),
            Subject::Value(value) if self.check(value) => Ok(SmallVec::new()),
            Subject::Value(_) => Err(MatchFailure),
        }
    }

    fn kind(&self) -> &'static str {
        "Guard"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// A guard followed by a structure.
pub struct AsGuard {
    guard: Guard,
    structure: Value,
}

impl AsGuard {
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn structure(&self) -> &Value {
        &self.structure
    }
}

impl CompoundMatch for AsGuard {
    fn destructure(&self, subject: Subject<'_>) -> Result<Items, MatchFailure> {
        match subject {
            Subject::Template => Ok(smallvec![self.structure.clone()]),
            Subject::Value(value) if self.guard.check(value) => Ok(smallvec![value.clone()]),
            Subject::Value(_) => Err(MatchFailure),
        }
    }

    fn kind(&self) -> &'static str {
        "AsGuard"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn parts(&self) -> Option<NodeParts> {
        let guard = self.guard.clone();
        Some(NodeParts::new(vec![self.structure.clone()], move |values| {
            Value::structure(AsGuard {
                guard: guard.clone(),
                structure: values.into_iter().next().unwrap_or(Value::Discard),
            })
        }))
    }
}

impl fmt::Debug for AsGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AsGuard(.., {})", self.structure)
    }
}
