//! Templates that extract values by attribute name or dictionary key.
//!
//! Both nodes peel off their first entry per step: the template splits into
//! (remainder, first sub-template) and a value into (itself, extracted
//! value). The remainder is matched against the same value on a later step.

use std::any::Any;
use std::fmt;

use sd_ir::Name;
use sd_types::{CompoundMatch, Items, MatchFailure, NodeParts, Subject, Value};
use smallvec::{smallvec, SmallVec};

use super::downcast;

/// Matches attributes of a value, in the order given.
#[derive(Clone)]
pub struct AttrPattern {
    entries: Vec<(Name, Value)>,
}

impl AttrPattern {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
        Value::structure(AttrPattern {
            entries: entries
                .into_iter()
                .map(|(name, value)| (Name::intern(name), value))
                .collect(),
        })
    }

    pub fn entries(&self) -> &[(Name, Value)] {
        &self.entries
    }

    /// Split off the first entry of `source`, which must not be smaller than
    /// `self`.
    fn peel(&self, source: &AttrPattern) -> Result<Items, MatchFailure> {
        if source.entries.len() < self.entries.len() {
            return Err(MatchFailure);
        }
        let Some(((_, first), rest)) = source.entries.split_first() else {
            return Err(MatchFailure);
        };
        Ok(smallvec![
            Value::structure(AttrPattern {
                entries: rest.to_vec(),
            }),
            first.clone(),
        ])
    }
}

impl CompoundMatch for AttrPattern {
    fn destructure(&self, subject: Subject<'_>) -> Result<Items, MatchFailure> {
        let Some((name, _)) = self.entries.first() else {
            return Ok(SmallVec::new());
        };
        match subject {
            Subject::Template => self.peel(self),
            Subject::Value(value) => {
                if let Some(other) = downcast::<AttrPattern>(value) {
                    return self.peel(other);
                }
                let attr = value.get_attr(*name).map_err(|err| {
                    tracing::trace!(attr = %name, error = %err, "attribute extraction failed");
                    MatchFailure
                })?;
                Ok(smallvec![value.clone(), attr])
            }
        }
    }

    fn kind(&self) -> &'static str {
        "AttrPattern"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn parts(&self) -> Option<NodeParts> {
        let names: Vec<Name> = self.entries.iter().map(|(name, _)| *name).collect();
        let values = self.entries.iter().map(|(_, value)| value.clone()).collect();
        Some(NodeParts::new(values, move |values| {
            Value::structure(AttrPattern {
                entries: names.iter().copied().zip(values).collect(),
            })
        }))
    }
}

impl fmt::Debug for AttrPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AttrPattern(")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// Matches dictionary entries by key, in the order given.
///
/// An exhaustive pattern also requires the dictionary to have exactly as
/// many keys as the pattern.
#[derive(Clone)]
pub struct DictPattern {
    entries: Vec<(Value, Value)>,
    exhaustive: bool,
}

impl DictPattern {
    /// Build from entries; a repeated key keeps its first position and takes
    /// the last template.
    pub fn new(entries: impl IntoIterator<Item = (Value, Value)>, exhaustive: bool) -> Value {
        let mut unique: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            match unique.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => unique.push((key, value)),
            }
        }
        Value::structure(DictPattern {
            entries: unique,
            exhaustive,
        })
    }

    /// A pattern keyed by strings.
    pub fn from_str_keys<'a>(
        entries: impl IntoIterator<Item = (&'a str, Value)>,
        exhaustive: bool,
    ) -> Value {
        DictPattern::new(
            entries.into_iter().map(|(k, v)| (Value::string(k), v)),
            exhaustive,
        )
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn is_exhaustive(&self) -> bool {
        self.exhaustive
    }

    /// Size of `subject` for the exhaustive check; `None` if it has none.
    fn subject_len(&self, subject: Subject<'_>) -> Option<usize> {
        match subject {
            Subject::Template => Some(self.entries.len()),
            Subject::Value(value) => match downcast::<DictPattern>(value) {
                Some(other) => Some(other.entries.len()),
                None => value.as_dict().map(sd_types::DictValue::len),
            },
        }
    }

    fn peel(&self, source: &DictPattern) -> Result<Items, MatchFailure> {
        if source.entries.len() < self.entries.len() {
            return Err(MatchFailure);
        }
        let Some(((_, first), rest)) = source.entries.split_first() else {
            return Err(MatchFailure);
        };
        Ok(smallvec![
            Value::structure(DictPattern {
                entries: rest.to_vec(),
                exhaustive: false,
            }),
            first.clone(),
        ])
    }
}

impl CompoundMatch for DictPattern {
    fn destructure(&self, subject: Subject<'_>) -> Result<Items, MatchFailure> {
        if self.exhaustive && self.subject_len(subject) != Some(self.entries.len()) {
            return Err(MatchFailure);
        }
        let Some((key, _)) = self.entries.first() else {
            return Ok(SmallVec::new());
        };
        match subject {
            Subject::Template => self.peel(self),
            Subject::Value(value) => {
                if let Some(other) = downcast::<DictPattern>(value) {
                    return self.peel(other);
                }
                let found = value
                    .as_dict()
                    .and_then(|dict| dict.get(key))
                    .ok_or(MatchFailure)?;
                Ok(smallvec![value.clone(), found.clone()])
            }
        }
    }

    fn kind(&self) -> &'static str {
        "DictPattern"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Keys and templates, interleaved.
    fn parts(&self) -> Option<NodeParts> {
        let exhaustive = self.exhaustive;
        let values = self
            .entries
            .iter()
            .flat_map(|(key, value)| [key.clone(), value.clone()])
            .collect();
        Some(NodeParts::new(values, move |values| {
            let mut values = values.into_iter();
            let mut entries = Vec::new();
            while let (Some(key), Some(value)) = (values.next(), values.next()) {
                entries.push((key, value));
            }
            Value::structure(DictPattern {
                entries,
                exhaustive,
            })
        }))
    }
}

impl fmt::Debug for DictPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DictPattern({")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}, exhaustive={})", self.exhaustive)
    }
}
