//! Add fixed bindings to a successful match.

use std::any::Any;
use std::fmt;

use sd_ir::{check_binding_name, Name};
use sd_types::{CompoundMatch, Items, MatchFailure, NodeParts, Subject, Value};

use crate::errors::PatternError;

/// Matches `structure`, then binds each extra name to its fixed value, in
/// the order given.
pub struct Bind {
    structure: Value,
    extras: Vec<(Name, Value)>,
}

impl Bind {
    /// Wrap `structure` with extra bindings.
    ///
    /// With no extras the structure is returned unchanged.
    pub fn new<'a>(
        structure: Value,
        extras: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Value, PatternError> {
        let mut bound = Vec::new();
        for (name, value) in extras {
            if name == "_" {
                return Err(PatternError::DiscardAsExtra);
            }
            check_binding_name(name)?;
            bound.push((Name::intern(name), value));
        }
        if bound.is_empty() {
            return Ok(structure);
        }
        Ok(Value::structure(Bind {
            structure,
            extras: bound,
        }))
    }

    pub fn structure(&self) -> &Value {
        &self.structure
    }

    pub fn extras(&self) -> &[(Name, Value)] {
        &self.extras
    }
}

impl CompoundMatch for Bind {
    fn destructure(&self, subject: Subject<'_>) -> Result<Items, MatchFailure> {
        let (mut items, last): (Items, Value) = match subject {
            Subject::Template => (
                self.extras
                    .iter()
                    .rev()
                    .map(|(name, _)| Value::Pattern(*name))
                    .collect(),
                self.structure.clone(),
            ),
            Subject::Value(value) => (
                self.extras.iter().rev().map(|(_, v)| v.clone()).collect(),
                value.clone(),
            ),
        };
        items.push(last);
        Ok(items)
    }

    fn kind(&self) -> &'static str {
        "Bind"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// The structure, then each extra value.
    fn parts(&self) -> Option<NodeParts> {
        let names: Vec<Name> = self.extras.iter().map(|(name, _)| *name).collect();
        let values = std::iter::once(self.structure.clone())
            .chain(self.extras.iter().map(|(_, value)| value.clone()))
            .collect();
        Some(NodeParts::new(values, move |values| {
            let mut values = values.into_iter();
            let structure = values.next().unwrap_or(Value::Discard);
            Value::structure(Bind {
                structure,
                extras: names.iter().copied().zip(values).collect(),
            })
        }))
    }
}

impl fmt::Debug for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bind({}", self.structure)?;
        for (name, value) in &self.extras {
            write!(f, ", {name}={value}")?;
        }
        f.write_str(")")
    }
}
