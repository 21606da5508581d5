//! Plain attribute-bag objects.

use sd_ir::Name;

use super::Value;

/// An object exposing named attributes and nothing else.
pub struct ObjectValue {
    pub(super) class: Name,
    pub(super) attrs: Vec<(Name, Value)>,
}

impl ObjectValue {
    pub fn class(&self) -> Name {
        self.class
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn attrs(&self) -> &[(Name, Value)] {
        &self.attrs
    }
}
