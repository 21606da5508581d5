//! Template nodes.
//!
//! Leaf binders and the discard sentinel are plain [`Value`]s. Every other
//! node implements [`CompoundMatch`](sd_types::CompoundMatch) and is wrapped
//! in `Value::Structure`, so nodes nest freely inside tuples, ADT instances
//! and each other.
//!
//! Each node answers two questions through `destructure`: what sub-templates
//! it splits into (`Subject::Template`), and what sub-values a matched value
//! splits into (`Subject::Value`). Both lists have the same length and are
//! returned in push order, last child first.

mod as_pattern;
mod bind;
mod guard;
mod mapping;

use sd_ir::{check_binding_name, Name};
use sd_types::Value;

use crate::errors::PatternError;

pub use as_pattern::{as_pattern, AsPattern};
pub use bind::Bind;
pub use guard::{guard, AsGuard, Guard, Predicate};
pub use mapping::{AttrPattern, DictPattern};

/// A leaf binder, or the discard sentinel for `"_"`.
pub fn pat(name: &str) -> Result<Value, PatternError> {
    if name == "_" {
        return Ok(Value::Discard);
    }
    check_binding_name(name)?;
    Ok(Value::Pattern(Name::intern(name)))
}

/// The node of type `T` behind `value`, if that is what it holds.
pub(crate) fn downcast<T: 'static>(value: &Value) -> Option<&T> {
    value
        .as_structure()
        .and_then(|node| node.as_any().downcast_ref::<T>())
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
