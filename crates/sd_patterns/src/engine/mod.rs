//! The destructuring engine.
//!
//! # Traversal
//!
//! Matching walks an explicit stack of (template, value) pairs instead of
//! recursing, so deeply nested data cannot exhaust the call stack. Nodes
//! push their children reversed; popping therefore visits them left to
//! right and bindings come out in source order.
//!
//! Each popped pair is classified in this order:
//!
//! 1. discard: dropped
//! 2. leaf binder: recorded, failing on a name already bound
//! 3. compound node: both sides destructured and zipped
//! 4. ADT, tuple, list or custom destructurer: same
//! 5. anything else: plain equality

use sd_ir::Name;
use sd_types::{Subject, Value};

use crate::bindings::MatchBindings;
use crate::destructure::{DestructurerList, DESTRUCTURERS};
use crate::errors::{DuplicateBindingError, MatchError};

impl DestructurerList {
    /// Match `template` against `value`.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn destructure(&self, template: &Value, value: &Value) -> Result<MatchBindings, MatchError> {
        let mut bindings = MatchBindings::new();
        let mut stack = vec![(template.clone(), value.clone())];

        while let Some((target, value)) = stack.pop() {
            match &target {
                Value::Discard => {}
                Value::Pattern(name) => bindings.insert(*name, value)?,
                Value::Structure(node) => {
                    let subject = if value.is_same(&target) {
                        Subject::Template
                    } else {
                        Subject::Value(&value)
                    };
                    let targets = node.destructure(Subject::Template)?;
                    let values = node.destructure(subject).inspect_err(|_| {
                        tracing::trace!(node = node.kind(), %value, "node did not match");
                    })?;
                    stack.extend(targets.into_iter().zip(values));
                }
                _ => match self.get(&target) {
                    Some(destructurer) => {
                        let targets = destructurer.destructure(&target, &target)?;
                        let values = destructurer.destructure(&target, &value).inspect_err(|_| {
                            tracing::trace!(destructurer = destructurer.name(), %value, "shape mismatch");
                        })?;
                        stack.extend(targets.into_iter().zip(values));
                    }
                    None if target == value => {}
                    None => {
                        tracing::trace!(%target, %value, "values differ");
                        return Err(MatchError::Failure);
                    }
                },
            }
        }

        Ok(bindings)
    }

    /// Every name `template` binds, in binding order.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn names(&self, template: &Value) -> Result<Vec<Name>, DuplicateBindingError> {
        let mut names: Vec<Name> = Vec::new();
        let mut stack = vec![template.clone()];

        while let Some(item) = stack.pop() {
            match &item {
                Value::Discard => {}
                Value::Pattern(name) => {
                    if names.contains(name) {
                        return Err(DuplicateBindingError { name: *name });
                    }
                    names.push(*name);
                }
                Value::Structure(node) => {
                    if let Ok(children) = node.destructure(Subject::Template) {
                        stack.extend(children);
                    }
                }
                _ => {
                    if let Some(children) = self
                        .get(&item)
                        .and_then(|d| d.destructure(&item, &item).ok())
                    {
                        stack.extend(children);
                    }
                }
            }
        }

        Ok(names)
    }
}

/// Match `template` against `value` with the built-in destructurers.
///
/// A failed match is `None`. A template binding a name twice never
/// matches; use [`try_match`] to see that error.
pub fn match_value(template: &Value, value: &Value) -> Option<MatchBindings> {
    match DESTRUCTURERS.destructure(template, value) {
        Ok(bindings) => Some(bindings),
        Err(MatchError::Failure) => None,
        Err(MatchError::DuplicateBinding(err)) => {
            tracing::debug!(name = %err.name, "template binds a name twice");
            None
        }
    }
}

/// Like [`match_value`], but a duplicate binding is an error.
///
/// The template is checked before `value` is looked at, so the error does
/// not depend on whether the match would have succeeded.
pub fn try_match(
    template: &Value,
    value: &Value,
) -> Result<Option<MatchBindings>, DuplicateBindingError> {
    DESTRUCTURERS.names(template)?;
    match DESTRUCTURERS.destructure(template, value) {
        Ok(bindings) => Ok(Some(bindings)),
        Err(MatchError::Failure) => Ok(None),
        Err(MatchError::DuplicateBinding(err)) => Err(err),
    }
}

/// Every name `template` binds, in binding order.
pub fn names(template: &Value) -> Result<Vec<Name>, DuplicateBindingError> {
    DESTRUCTURERS.names(template)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
