//! Values with their type handles made weak.
//!
//! A detached value can be stored next to a type without keeping that type
//! alive. Subtrees that mention no type stay as plain values; everything on
//! the path to a type handle is unpacked so the handle can be held weakly.
//! Attaching rebuilds the value, and fails once any mentioned type is gone.

use std::sync::Arc;

use super::structure::Rebuild;
use super::Value;
use crate::adt::{TypeRef, WeakTypeRef};

/// A [`Value`] that holds its sum, product and tuple classes weakly.
#[derive(Clone)]
pub enum Detached {
    /// Mentions no type, or cannot be unpacked. Objects compare by identity
    /// and are always kept whole.
    Plain(Value),
    /// A variant, product or class-tagged tuple instance.
    Instance(WeakTypeRef, Vec<Detached>),
    Tuple(Vec<Detached>),
    List(Vec<Detached>),
    Dict(Vec<(Detached, Detached)>),
    Class(WeakTypeRef),
    Node(Rebuild, Vec<Detached>),
}

impl Detached {
    fn is_plain(&self) -> bool {
        matches!(self, Detached::Plain(_))
    }

    /// Rebuild the value, or `None` if a type it mentions was dropped.
    pub fn attach(&self) -> Option<Value> {
        let value = match self {
            Detached::Plain(value) => value.clone(),
            Detached::Instance(ty, items) => {
                let items = attach_all(items)?;
                match ty.upgrade()? {
                    TypeRef::Variant(variant) => variant.instantiate(items).ok()?,
                    TypeRef::Product(product) => product.instantiate(items),
                    TypeRef::Tuple(class) => Value::tuple_of(&class, items),
                    TypeRef::Sum(_) => return None,
                }
            }
            Detached::Tuple(items) => Value::tuple(attach_all(items)?),
            Detached::List(items) => Value::list(attach_all(items)?),
            Detached::Dict(entries) => Value::dict(
                entries
                    .iter()
                    .map(|(key, value)| Some((key.attach()?, value.attach()?)))
                    .collect::<Option<Vec<_>>>()?,
            ),
            Detached::Class(ty) => Value::Class(ty.upgrade()?),
            Detached::Node(rebuild, parts) => rebuild(attach_all(parts)?),
        };
        Some(value)
    }
}

fn attach_all(items: &[Detached]) -> Option<Vec<Value>> {
    items.iter().map(Detached::attach).collect()
}

fn detach_all(items: &[Value]) -> Vec<Detached> {
    items.iter().map(Value::detach).collect()
}

impl Value {
    /// This value with every type handle held weakly.
    pub fn detach(&self) -> Detached {
        match self {
            Value::Variant(v) => Detached::Instance(
                WeakTypeRef::Variant(Arc::downgrade(v.variant().sum()), v.variant().index()),
                detach_all(v.items()),
            ),
            Value::Product(p) => Detached::Instance(
                WeakTypeRef::Product(Arc::downgrade(p.product())),
                detach_all(p.items()),
            ),
            Value::Tuple(t) => {
                let items = detach_all(t.items());
                match t.class() {
                    Some(class) => {
                        Detached::Instance(WeakTypeRef::Tuple(Arc::downgrade(class)), items)
                    }
                    None if items.iter().all(Detached::is_plain) => Detached::Plain(self.clone()),
                    None => Detached::Tuple(items),
                }
            }
            Value::List(items) => {
                let items = detach_all(items);
                if items.iter().all(Detached::is_plain) {
                    Detached::Plain(self.clone())
                } else {
                    Detached::List(items)
                }
            }
            Value::Dict(dict) => {
                let entries: Vec<_> = dict.iter().map(|(k, v)| (k.detach(), v.detach())).collect();
                if entries.iter().all(|(k, v)| k.is_plain() && v.is_plain()) {
                    Detached::Plain(self.clone())
                } else {
                    Detached::Dict(entries)
                }
            }
            Value::Class(ty) => Detached::Class(ty.downgrade()),
            Value::Structure(node) => match node.parts() {
                Some(parts) => {
                    let values = detach_all(&parts.values);
                    if values.iter().all(Detached::is_plain) {
                        Detached::Plain(self.clone())
                    } else {
                        Detached::Node(parts.rebuild, values)
                    }
                }
                None => Detached::Plain(self.clone()),
            },
            Value::None
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_)
            | Value::Object(_)
            | Value::Pattern(_)
            | Value::Discard => Detached::Plain(self.clone()),
        }
    }
}
