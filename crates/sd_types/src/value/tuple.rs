//! Tuples and user-declared tuple classes.

use std::fmt;
use std::sync::Arc;

use sd_ir::{Name, TypeId};

use super::{Heap, Value};

/// A named tuple class, optionally derived from another.
///
/// A value of a derived class is accepted wherever its ancestors are, but
/// not the other way around.
pub struct TupleClass {
    name: Name,
    id: TypeId,
    parent: Option<Arc<TupleClass>>,
}

impl TupleClass {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(TupleClass {
            name: Name::intern(name),
            id: TypeId::fresh(),
            parent: None,
        })
    }

    /// Declare a class derived from `parent`.
    pub fn derive(parent: &Arc<TupleClass>, name: &str) -> Arc<Self> {
        Arc::new(TupleClass {
            name: Name::intern(name),
            id: TypeId::fresh(),
            parent: Some(Arc::clone(parent)),
        })
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn parent(&self) -> Option<&Arc<TupleClass>> {
        self.parent.as_ref()
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &TupleClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.id == other.id {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }
}

impl fmt::Debug for TupleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TupleClass({})", self.name)
    }
}

/// A tuple value; `class` is `None` for plain tuples.
#[derive(Clone)]
pub struct TupleValue {
    pub(super) class: Option<Arc<TupleClass>>,
    pub(super) items: Heap<Vec<Value>>,
}

impl TupleValue {
    pub fn class(&self) -> Option<&Arc<TupleClass>> {
        self.class.as_ref()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Whether this tuple is an instance of `class` (`None` is the plain
    /// tuple type, which every tuple is an instance of).
    pub fn is_instance_of(&self, class: Option<&TupleClass>) -> bool {
        match class {
            None => true,
            Some(target) => self
                .class
                .as_deref()
                .is_some_and(|own| own.is_subclass_of(target)),
        }
    }
}
