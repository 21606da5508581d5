//! The result of a successful match.

use rustc_hash::FxHashMap;
use sd_ir::Name;
use sd_types::Value;

use crate::errors::DuplicateBindingError;

/// Names bound by a match, in the order they were first bound.
#[derive(Clone, Debug, Default)]
pub struct MatchBindings {
    entries: Vec<(Name, Value)>,
    index: FxHashMap<Name, usize>,
}

impl MatchBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding; a name may be bound only once.
    pub(crate) fn insert(&mut self, name: Name, value: Value) -> Result<(), DuplicateBindingError> {
        if self.index.contains_key(&name) {
            return Err(DuplicateBindingError { name });
        }
        self.index.insert(name, self.entries.len());
        self.entries.push((name, value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_name(Name::intern(name))
    }

    pub fn get_name(&self, name: Name) -> Option<&Value> {
        self.index.get(&name).map(|&slot| &self.entries[slot].1)
    }

    /// Several values at once; `None` if any name is unbound.
    pub fn get_many(&self, names: &[&str]) -> Option<Vec<&Value>> {
        names.iter().map(|name| self.get(name)).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&Name::intern(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// The bindings as a string-keyed dictionary value.
    pub fn to_dict(&self) -> Value {
        Value::str_dict(self.entries.iter().map(|(name, value)| (name.as_str(), value.clone())))
    }
}

impl PartialEq for MatchBindings {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl IntoIterator for MatchBindings {
    type Item = (Name, Value);
    type IntoIter = std::vec::IntoIter<(Name, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> FromIterator<(&'a str, Value)> for MatchBindings {
    /// Collect literal bindings; a repeated name keeps its first value.
    fn from_iter<I: IntoIterator<Item = (&'a str, Value)>>(iter: I) -> Self {
        let mut bindings = MatchBindings::new();
        for (name, value) in iter {
            let _ = bindings.insert(Name::intern(name), value);
        }
        bindings
    }
}
