//! Declarations produced by the annotation resolver and how they merge.

use rustc_hash::FxHashMap;
use sd_ir::Name;

/// One resolved declaration.
///
/// `resolved: None` erases an entry of the same name declared by an older
/// scope.
#[derive(Clone, Debug)]
pub struct SpecEntry<T> {
    pub scope: Name,
    pub name: Name,
    pub resolved: Option<T>,
}

impl<T> SpecEntry<T> {
    pub fn declare(scope: Name, name: &str, resolved: T) -> Self {
        SpecEntry {
            scope,
            name: Name::intern(name),
            resolved: Some(resolved),
        }
    }

    pub fn erase(scope: Name, name: &str) -> Self {
        SpecEntry {
            scope,
            name: Name::intern(name),
            resolved: None,
        }
    }
}

/// Merge entries given oldest scope first.
///
/// A redeclared name keeps its original position and takes the newer value.
/// An erased name is removed; declaring it again appends it at the end.
pub fn merge_spec<T>(entries: impl IntoIterator<Item = SpecEntry<T>>) -> Vec<(Name, T)> {
    let mut slots: Vec<Option<(Name, T)>> = Vec::new();
    let mut index: FxHashMap<Name, usize> = FxHashMap::default();

    for entry in entries {
        match entry.resolved {
            Some(resolved) => {
                if let Some(&slot) = index.get(&entry.name) {
                    slots[slot] = Some((entry.name, resolved));
                } else {
                    index.insert(entry.name, slots.len());
                    slots.push(Some((entry.name, resolved)));
                }
            }
            None => {
                if let Some(slot) = index.remove(&entry.name) {
                    slots[slot] = None;
                }
            }
        }
    }

    slots.into_iter().flatten().collect()
}
