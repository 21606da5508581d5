//! Insertion-ordered dictionary.

use rustc_hash::FxHashMap;

use super::Value;

/// Dictionary preserving first-insertion order of keys.
#[derive(Clone, Default)]
pub struct DictValue {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<Value, usize>,
}

impl DictValue {
    /// Build from entries; a repeated key keeps its first position and takes
    /// the last value.
    pub fn from_entries(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut dict = DictValue::default();
        for (key, value) in entries {
            if let Some(&slot) = dict.index.get(&key) {
                dict.entries[slot].1 = value;
            } else {
                dict.index.insert(key.clone(), dict.entries.len());
                dict.entries.push((key, value));
            }
        }
        dict
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl PartialEq for DictValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| theirs == value))
    }
}
