//! Members attached to ADT classes.
//!
//! Fields are built in; everything else a class exposes (methods and
//! properties) is registered explicitly as a [`Member`]. Properties are data
//! members: they are the only way an attribute of an immutable instance can
//! accept assignment or deletion.

use std::fmt;
use std::sync::Arc;

use crate::errors::AttributeError;
use crate::signature::CallArgs;
use crate::value::Value;

/// A callable member, invoked with the instance prepended to the arguments.
pub trait MethodMember: Send + Sync {
    fn invoke(&self, instance: &Value, args: CallArgs) -> Result<Value, AttributeError>;
}

/// A data member with its own get/set/delete logic.
pub trait PropertyMember: Send + Sync {
    fn get(&self, instance: &Value) -> Result<Value, AttributeError>;

    fn set(&self, instance: &Value, value: Value) -> Result<(), AttributeError>;

    fn delete(&self, instance: &Value) -> Result<(), AttributeError>;
}

/// A registered class member.
#[derive(Clone)]
pub enum Member {
    Method(Arc<dyn MethodMember>),
    Property(Arc<dyn PropertyMember>),
}

impl Member {
    pub fn method(method: impl MethodMember + 'static) -> Self {
        Member::Method(Arc::new(method))
    }

    pub fn property(property: impl PropertyMember + 'static) -> Self {
        Member::Property(Arc::new(property))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Method(_) => f.write_str("Member::Method"),
            Member::Property(_) => f.write_str("Member::Property"),
        }
    }
}
