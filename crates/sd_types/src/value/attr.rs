//! Attribute access on values.
//!
//! Fields of ADT instances are read-only. The only attributes that accept
//! assignment or deletion are properties registered as class members;
//! everything else fails with `ReadOnly` when the attribute exists and with
//! `NoSuchAttribute` when it does not.

use sd_ir::Name;

use super::Value;
use crate::adt::Member;
use crate::errors::{AccessError, AttributeError};
use crate::signature::CallArgs;

impl Value {
    /// The class member `name`, for ADT instances.
    fn member(&self, name: Name) -> Option<&Member> {
        match self {
            Value::Variant(v) => v.variant().sum().member(name),
            Value::Product(p) => p.product().member(name),
            _ => None,
        }
    }

    /// Whether `name` names something built into the value's class.
    fn has_static_attr(&self, name: Name) -> bool {
        match self {
            Value::Variant(v) => v.variant().sum().has_variant(name),
            Value::Product(p) => p.product().field_index(name).is_some(),
            Value::Object(o) => o.get(name).is_some(),
            _ => false,
        }
    }

    fn no_such_attribute(&self, name: Name) -> AccessError {
        AccessError::NoSuchAttribute {
            class: self.type_name(),
            name,
        }
    }

    /// Read attribute `name`.
    pub fn get_attr(&self, name: Name) -> Result<Value, AttributeError> {
        if let Value::Product(p) = self {
            if let Some(field) = p.field(name) {
                return Ok(field.clone());
            }
        }
        match self.member(name) {
            Some(Member::Property(property)) => return property.get(self),
            Some(Member::Method(_)) => {
                return Err(AccessError::UnboundMethod {
                    class: self.type_name(),
                    name,
                }
                .into())
            }
            None => {}
        }
        match self {
            Value::Variant(v) if v.variant().sum().has_variant(name) => {
                Err(AccessError::MemberThroughVariant { name }.into())
            }
            Value::Object(o) => o
                .get(name)
                .cloned()
                .ok_or_else(|| self.no_such_attribute(name).into()),
            Value::Class(ty) => Ok(ty.attr(name)?),
            _ => Err(self.no_such_attribute(name).into()),
        }
    }

    /// Assign attribute `name`; only properties accept this.
    pub fn set_attr(&self, name: Name, value: Value) -> Result<(), AttributeError> {
        match self.member(name) {
            Some(Member::Property(property)) => property.set(self, value),
            Some(Member::Method(_)) => Err(self.read_only(name).into()),
            None if self.has_static_attr(name) => Err(self.read_only(name).into()),
            None => Err(self.no_such_attribute(name).into()),
        }
    }

    /// Delete attribute `name`; only properties accept this.
    pub fn del_attr(&self, name: Name) -> Result<(), AttributeError> {
        match self.member(name) {
            Some(Member::Property(property)) => property.delete(self),
            Some(Member::Method(_)) => Err(self.read_only(name).into()),
            None if self.has_static_attr(name) => Err(self.read_only(name).into()),
            None => Err(self.no_such_attribute(name).into()),
        }
    }

    /// Call method `name` with the instance as receiver.
    pub fn call_method(&self, name: Name, args: CallArgs) -> Result<Value, AttributeError> {
        match self.member(name) {
            Some(Member::Method(method)) => method.invoke(self, args),
            Some(Member::Property(_)) => Err(AccessError::NotCallable {
                class: self.type_name(),
                name,
            }
            .into()),
            None => Err(self.no_such_attribute(name).into()),
        }
    }

    fn read_only(&self, name: Name) -> AccessError {
        AccessError::ReadOnly {
            class: self.type_name(),
            name,
        }
    }
}
