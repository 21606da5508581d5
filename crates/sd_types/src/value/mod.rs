//! Runtime values for structured data.
//!
//! # Templates Are Values
//!
//! Pattern nodes live in the same universe as the data they match: a leaf
//! binder is `Value::Pattern`, the discard sentinel is `Value::Discard` and
//! every compound node is a `Value::Structure`. An ADT instance whose fields
//! hold binders is therefore a template for that ADT. This is what lets one
//! pattern be matched against another.
//!
//! # Heap Enforcement
//!
//! Shared payloads are wrapped in [`Heap`], whose constructor is private to
//! this crate. Use the factory methods:
//!
//! ```text
//! let s = Value::string("hello");
//! let t = Value::tuple(vec![Value::int(1), Value::int(2)]);
//! ```
//!
//! # Thread Safety
//!
//! All heap types use `Arc`, and values are immutable once built, so they
//! can be shared freely across threads.

mod attr;
mod compare;
mod detached;
mod dict;
mod heap;
mod object;
mod structure;
mod tuple;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;
use sd_ir::Name;

use crate::adt::{self, ProductValue, TypeRef, VariantValue};
use crate::errors::ComparisonError;

pub use compare::CompareOp;
pub(crate) use compare::compare_sequences;
pub use detached::Detached;
pub use dict::DictValue;
pub use heap::Heap;
pub use object::ObjectValue;
pub use structure::{CompoundMatch, Items, MatchFailure, NodeParts, Rebuild, Subject};
pub use tuple::{TupleClass, TupleValue};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    // Primitives
    /// The absent value.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),

    // Heap Types
    Str(Heap<String>),
    /// Tuple, optionally tagged with a user tuple class.
    Tuple(TupleValue),
    List(Heap<Vec<Value>>),
    /// Insertion-ordered dictionary.
    Dict(Heap<DictValue>),
    /// Attribute bag.
    Object(Heap<ObjectValue>),

    // Algebraic Types
    /// Instance of a sum type variant.
    Variant(VariantValue),
    /// Instance of a product type.
    Product(ProductValue),
    /// A type used as a value.
    Class(TypeRef),

    // Pattern Nodes
    /// Leaf binder.
    Pattern(Name),
    /// Matches anything, binds nothing.
    Discard,
    /// Compound template node.
    Structure(Arc<dyn CompoundMatch>),
}

/// Numeric view used for cross-kind comparisons.
#[derive(Copy, Clone)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed int/float comparison follows float semantics"
    )]
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }

    fn partial_cmp(self, other: Number) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl Value {
    // Factory Methods

    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(x: f64) -> Self {
        Value::Float(x)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(TupleValue {
            class: None,
            items: Heap::new(items),
        })
    }

    /// A tuple tagged with a user tuple class.
    pub fn tuple_of(class: &Arc<TupleClass>, items: Vec<Value>) -> Self {
        Value::Tuple(TupleValue {
            class: Some(Arc::clone(class)),
            items: Heap::new(items),
        })
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    pub fn dict(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(Heap::new(DictValue::from_entries(entries)))
    }

    /// A dictionary keyed by strings.
    pub fn str_dict<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Value::dict(entries.into_iter().map(|(k, v)| (Value::string(k), v)))
    }

    pub fn object(class: &str, attrs: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        Value::Object(Heap::new(ObjectValue {
            class: Name::intern(class),
            attrs: attrs
                .into_iter()
                .map(|(name, value)| (Name::intern(name), value))
                .collect(),
        }))
    }

    pub fn class(ty: TypeRef) -> Self {
        Value::Class(ty)
    }

    /// A leaf binder. Names are not validated here.
    #[inline]
    pub fn pattern(name: Name) -> Self {
        Value::Pattern(name)
    }

    pub fn structure(node: impl CompoundMatch) -> Self {
        Value::Structure(Arc::new(node))
    }

    // Inspection

    /// Positional items of tuple-like values.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(t) => Some(t.items()),
            Value::List(items) => Some(items),
            Value::Variant(v) => Some(v.items()),
            Value::Product(p) => Some(p.items()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&DictValue> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&Arc<dyn CompoundMatch>> {
        match self {
            Value::Structure(node) => Some(node),
            _ => None,
        }
    }

    /// Whether this is an instance of a sum or product type.
    pub fn is_adt(&self) -> bool {
        matches!(self, Value::Variant(_) | Value::Product(_))
    }

    pub(crate) fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    /// The exact class of an ADT instance or class-tagged tuple.
    pub fn class_of(&self) -> Option<TypeRef> {
        match self {
            Value::Variant(v) => Some(TypeRef::Variant(v.variant().clone())),
            Value::Product(p) => Some(TypeRef::Product(Arc::clone(p.product()))),
            Value::Tuple(t) => t.class().map(|c| TypeRef::Tuple(Arc::clone(c))),
            _ => None,
        }
    }

    /// The type that owns an ADT instance's behaviour: the sum base of a
    /// variant, or the product type itself.
    pub fn adt_owner(&self) -> Option<TypeRef> {
        match self {
            Value::Variant(v) => Some(TypeRef::Sum(Arc::clone(v.variant().sum()))),
            Value::Product(p) => Some(TypeRef::Product(Arc::clone(p.product()))),
            _ => None,
        }
    }

    /// Name of the value's type, for messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "NoneType".to_owned(),
            Value::Bool(_) => "bool".to_owned(),
            Value::Int(_) => "int".to_owned(),
            Value::Float(_) => "float".to_owned(),
            Value::Str(_) => "str".to_owned(),
            Value::Tuple(t) => t
                .class()
                .map_or_else(|| "tuple".to_owned(), |c| c.name().to_string()),
            Value::List(_) => "list".to_owned(),
            Value::Dict(_) => "dict".to_owned(),
            Value::Object(o) => o.class().to_string(),
            Value::Variant(v) => v.variant().qualname(),
            Value::Product(p) => p.product().name().to_string(),
            Value::Class(_) => "type".to_owned(),
            Value::Pattern(_) => "Pattern".to_owned(),
            Value::Discard => "Discard".to_owned(),
            Value::Structure(node) => node.kind().to_owned(),
        }
    }

    /// Truthiness: zero, empty and absent values are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Tuple(t) => !t.items().is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Dict(d) => !d.is_empty(),
            Value::Object(_)
            | Value::Variant(_)
            | Value::Product(_)
            | Value::Class(_)
            | Value::Pattern(_)
            | Value::Discard
            | Value::Structure(_) => true,
        }
    }

    /// Identity: whether both values are the very same object.
    ///
    /// Immediate values are the same when equal; heap values when they share
    /// an allocation.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) | (Value::Discard, Value::Discard) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a.ptr_eq(b),
            (Value::Tuple(a), Value::Tuple(b)) => a.items.ptr_eq(&b.items),
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Variant(a), Value::Variant(b)) => a.items_heap().ptr_eq(b.items_heap()),
            (Value::Product(a), Value::Product(b)) => a.items_heap().ptr_eq(b.items_heap()),
            (Value::Class(a), Value::Class(b)) => a.id() == b.id(),
            (Value::Pattern(a), Value::Pattern(b)) => a == b,
            (Value::Structure(a), Value::Structure(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }

    /// Hash, failing for values that refuse to be hashed.
    pub fn hash_value(&self) -> Result<u64, ComparisonError> {
        if self.is_adt() {
            return adt::hash(self);
        }
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Variant(_) | Value::Product(_), _) => adt::equals(self, other),
            (_, Value::Variant(_) | Value::Product(_)) => adt::equals(other, self),
            (Value::None, Value::None) | (Value::Discard, Value::Discard) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a.items() == b.items(),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => a.id() == b.id(),
            (Value::Pattern(a), Value::Pattern(b)) => a == b,
            (Value::Structure(a), Value::Structure(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp(b) == Some(std::cmp::Ordering::Equal),
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::None => 0u8.hash(state),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => {
                1u8.hash(state);
                match self.as_number() {
                    Some(Number::Int(n)) => n.hash(state),
                    Some(Number::Float(x)) => hash_float(x, state),
                    None => {}
                }
            }
            Value::Str(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            Value::Tuple(t) => {
                3u8.hash(state);
                t.items().hash(state);
            }
            Value::List(items) => {
                4u8.hash(state);
                items.hash(state);
            }
            Value::Dict(d) => {
                // Equal dicts may differ in order; only the size is stable.
                5u8.hash(state);
                d.len().hash(state);
            }
            Value::Object(o) => {
                6u8.hash(state);
                o.addr().hash(state);
            }
            Value::Variant(_) | Value::Product(_) => {
                7u8.hash(state);
                adt::hash_into(self, state);
            }
            Value::Class(ty) => {
                8u8.hash(state);
                ty.id().hash(state);
            }
            Value::Pattern(name) => {
                9u8.hash(state);
                name.hash(state);
            }
            Value::Discard => 10u8.hash(state),
            Value::Structure(node) => {
                11u8.hash(state);
                (Arc::as_ptr(node).cast::<()>() as usize).hash(state);
            }
        }
    }
}

/// Integral floats hash like the equal integer.
fn hash_float<H: Hasher>(x: f64, state: &mut H) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "only used when the float is integral and in range"
    )]
    let as_int = x as i64;
    #[expect(clippy::cast_precision_loss, reason = "round-trip check")]
    let integral = x.fract() == 0.0 && as_int as f64 == x;
    if integral {
        as_int.hash(state);
    } else {
        x.to_bits().hash(state);
    }
}

/// Write `items` between `open` and `close`; a lone tuple item keeps its comma.
pub(crate) fn fmt_items(
    f: &mut fmt::Formatter<'_>,
    items: &[Value],
    open: &str,
    close: &str,
    single_comma: bool,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    if single_comma && items.len() == 1 {
        f.write_str(",")?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Tuple(t) => {
                if let Some(class) = t.class() {
                    write!(f, "{}", class.name())?;
                    fmt_items(f, t.items(), "(", ")", false)
                } else {
                    fmt_items(f, t.items(), "(", ")", true)
                }
            }
            Value::List(items) => fmt_items(f, items, "[", "]", false),
            Value::Dict(d) => {
                f.write_str("{")?;
                for (i, (k, v)) in d.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Object(o) => {
                write!(f, "{}(", o.class())?;
                for (i, (name, value)) in o.attrs().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str(")")
            }
            Value::Variant(_) | Value::Product(_) => adt::repr(self, f),
            Value::Class(ty) => write!(f, "<class {}>", ty.qualname()),
            Value::Pattern(name) => write!(f, "Pattern({name})"),
            Value::Discard => f.write_str("_"),
            Value::Structure(node) => write!(f, "{node:?}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
