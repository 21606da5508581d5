//! Pattern model and destructuring engine.
//!
//! This crate provides:
//! - Template nodes: leaf binders (`pat`), `AsPattern`, `Bind`, `Guard`,
//!   `AsGuard`, `AttrPattern`, `DictPattern`
//! - The iterative matcher (`match_value`, `try_match`, `names`)
//! - Destructurers for ADT instances, tuples, lists and custom families
//! - `MatchBindings` and the `Matchable` helper
//!
//! # Architecture
//!
//! Templates are ordinary [`Value`](sd_types::Value)s. Matching never
//! panics and never reports a mismatch as an error: a failed match is
//! simply `None`.

mod bindings;
mod destructure;
mod engine;
mod errors;
mod matchable;
mod nodes;

pub use bindings::MatchBindings;
pub use destructure::{
    AdtDestructurer, Destructurer, DestructurerList, ListDestructurer, TupleDestructurer,
    DESTRUCTURERS,
};
pub use engine::{match_value, names, try_match};
pub use errors::{DuplicateBindingError, LookupError, MatchError, PatternError};
pub use matchable::Matchable;
pub use nodes::{
    as_pattern, guard, pat, AsGuard, AsPattern, AttrPattern, Bind, DictPattern, Guard, Predicate,
};
