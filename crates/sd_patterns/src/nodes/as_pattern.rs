//! Bind a whole value while also matching its shape.

use std::any::Any;
use std::fmt;

use sd_ir::Name;
use sd_types::{CompoundMatch, Items, MatchFailure, NodeParts, Subject, Value};
use smallvec::smallvec;

use super::downcast;

/// Binds `pattern` to the matched value and matches `structure` against the
/// same value.
pub struct AsPattern {
    pattern: Name,
    structure: Value,
}

impl AsPattern {
    pub fn pattern(&self) -> Name {
        self.pattern
    }

    pub fn structure(&self) -> &Value {
        &self.structure
    }
}

/// `pattern[structure]`; a discard structure leaves the bare binder.
pub fn as_pattern(pattern: Name, structure: Value) -> Value {
    if matches!(structure, Value::Discard) {
        return Value::Pattern(pattern);
    }
    Value::structure(AsPattern { pattern, structure })
}

impl CompoundMatch for AsPattern {
    fn destructure(&self, subject: Subject<'_>) -> Result<Items, MatchFailure> {
        Ok(match subject {
            Subject::Template => smallvec![self.structure.clone(), Value::Pattern(self.pattern)],
            Subject::Value(value) => match downcast::<AsPattern>(value) {
                Some(other) => smallvec![other.structure.clone(), value.clone()],
                None => smallvec![value.clone(), value.clone()],
            },
        })
    }

    fn kind(&self) -> &'static str {
        "AsPattern"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn parts(&self) -> Option<NodeParts> {
        let pattern = self.pattern;
        Some(NodeParts::new(vec![self.structure.clone()], move |values| {
            Value::structure(AsPattern {
                pattern,
                structure: values.into_iter().next().unwrap_or(Value::Discard),
            })
        }))
    }
}

impl fmt::Debug for AsPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AsPattern({}, {})", self.pattern, self.structure)
    }
}
