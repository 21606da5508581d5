//! The ADT builder and the behaviour of ADT instances.
//!
//! # Architecture
//!
//! - [`spec`]: resolved declarations and the oldest-first merge rule
//! - [`behavior`]: which derived behaviours get injected, and user overrides
//! - [`sum`]: closed sum types and their variants
//! - [`product`]: open product types
//! - [`member`]: methods and properties attached to classes
//!
//! The free functions at the bottom of this module implement equality,
//! ordering, hashing and printing for instances; `Value` forwards to them.

mod behavior;
mod member;
mod product;
mod spec;
mod sum;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use rustc_hash::FxHasher;
use sd_ir::{Name, TypeId};

use crate::errors::{AccessError, ComparisonError, ConstructionError};
use crate::flags::AdtFlags;
use crate::signature::CallArgs;
use crate::value::{compare_sequences, fmt_items, CompareOp, TupleClass, Value};

pub use behavior::{CompareFn, EqFn, HashFn, ReprFn, UserMethods};
pub use member::{Member, MethodMember, PropertyMember};
pub use product::{
    Field, FieldSpec, ProductBuilder, ProductConstructor, ProductConstructorFn, ProductType,
    ProductValue,
};
pub use spec::{merge_spec, SpecEntry};
pub use sum::{SumBuilder, SumConstructorFn, SumType, VariantRef, VariantValue};

use behavior::{Behavior, Equality, Hashing};

/// Build a sum type from resolved declarations.
pub fn build_sum(
    name: &str,
    spec: impl IntoIterator<Item = SpecEntry<usize>>,
    flags: AdtFlags,
) -> Result<Arc<SumType>, ConstructionError> {
    SumType::builder(name).spec(spec).flags(flags).build()
}

/// Build a product type from resolved declarations.
pub fn build_product(
    name: &str,
    spec: impl IntoIterator<Item = SpecEntry<FieldSpec>>,
    flags: AdtFlags,
) -> Result<Arc<ProductType>, ConstructionError> {
    ProductType::builder(name)
        .spec(spec)
        .repr(flags.contains(AdtFlags::REPR))
        .eq(flags.contains(AdtFlags::EQ))
        .order(flags.contains(AdtFlags::ORDER))
        .build()
}

/// A runtime-built type.
#[derive(Clone)]
pub enum TypeRef {
    Sum(Arc<SumType>),
    Variant(VariantRef),
    Product(Arc<ProductType>),
    Tuple(Arc<TupleClass>),
}

impl TypeRef {
    pub fn name(&self) -> Name {
        match self {
            TypeRef::Sum(sum) => sum.name(),
            TypeRef::Variant(variant) => variant.name(),
            TypeRef::Product(product) => product.name(),
            TypeRef::Tuple(class) => class.name(),
        }
    }

    /// Printed name; variants are qualified by their base.
    pub fn qualname(&self) -> String {
        match self {
            TypeRef::Variant(variant) => variant.qualname(),
            other => other.name().to_string(),
        }
    }

    pub fn id(&self) -> TypeId {
        match self {
            TypeRef::Sum(sum) => sum.id(),
            TypeRef::Variant(variant) => variant.id(),
            TypeRef::Product(product) => product.id(),
            TypeRef::Tuple(class) => class.id(),
        }
    }

    pub fn downgrade(&self) -> WeakTypeRef {
        match self {
            TypeRef::Sum(sum) => WeakTypeRef::Sum(Arc::downgrade(sum)),
            TypeRef::Variant(variant) => {
                WeakTypeRef::Variant(Arc::downgrade(variant.sum()), variant.index())
            }
            TypeRef::Product(product) => WeakTypeRef::Product(Arc::downgrade(product)),
            TypeRef::Tuple(class) => WeakTypeRef::Tuple(Arc::downgrade(class)),
        }
    }

    /// Read an attribute of the class.
    ///
    /// A sum base exposes its variants; nothing else does.
    pub fn attr(&self, name: Name) -> Result<Value, AccessError> {
        match self {
            TypeRef::Sum(sum) => sum
                .variant(name.as_str())
                .map(|variant| Value::Class(TypeRef::Variant(variant))),
            TypeRef::Variant(variant) => variant.attr(name),
            TypeRef::Product(product) => product.attr(name),
            TypeRef::Tuple(class) => Err(AccessError::NoSuchAttribute {
                class: class.name().to_string(),
                name,
            }),
        }
    }

    /// Call the class.
    pub fn construct(&self, args: CallArgs) -> Result<Value, ConstructionError> {
        match self {
            TypeRef::Sum(sum) => sum.construct(args.positional),
            TypeRef::Variant(variant) => {
                if let Some((name, _)) = args.keywords.first() {
                    return Err(ConstructionError::Signature {
                        class: variant.name(),
                        source: crate::errors::SignatureError::UnexpectedKeyword { name: *name },
                    });
                }
                variant.construct(args.positional)
            }
            TypeRef::Product(product) => product.construct(args),
            TypeRef::Tuple(class) => Ok(Value::tuple_of(class, args.positional)),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.qualname())
    }
}

/// A [`TypeRef`] that does not keep its type alive.
#[derive(Clone)]
pub enum WeakTypeRef {
    Sum(Weak<SumType>),
    Variant(Weak<SumType>, usize),
    Product(Weak<ProductType>),
    Tuple(Weak<TupleClass>),
}

impl WeakTypeRef {
    /// The type, if something else still holds it.
    pub fn upgrade(&self) -> Option<TypeRef> {
        match self {
            WeakTypeRef::Sum(sum) => sum.upgrade().map(TypeRef::Sum),
            WeakTypeRef::Variant(sum, index) => sum
                .upgrade()
                .map(|sum| TypeRef::Variant(VariantRef::at(sum, *index))),
            WeakTypeRef::Product(product) => product.upgrade().map(TypeRef::Product),
            WeakTypeRef::Tuple(class) => class.upgrade().map(TypeRef::Tuple),
        }
    }
}

impl fmt::Debug for WeakTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(ty) => write!(f, "WeakTypeRef({})", ty.qualname()),
            None => f.write_str("WeakTypeRef(<dropped>)"),
        }
    }
}

/// Borrowed view of an ADT instance.
#[derive(Copy, Clone)]
enum Instance<'a> {
    Variant(&'a VariantValue),
    Product(&'a ProductValue),
}

impl<'a> Instance<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Variant(v) => Some(Instance::Variant(v)),
            Value::Product(p) => Some(Instance::Product(p)),
            _ => None,
        }
    }

    fn behavior(self) -> &'a Behavior {
        match self {
            Instance::Variant(v) => v.variant().sum().behavior(),
            Instance::Product(p) => p.product().behavior(),
        }
    }

    fn items(self) -> &'a [Value] {
        match self {
            Instance::Variant(v) => v.items(),
            Instance::Product(p) => p.items(),
        }
    }

    fn class_id(self) -> TypeId {
        match self {
            Instance::Variant(v) => v.variant().id(),
            Instance::Product(p) => p.product().id(),
        }
    }

    fn qualname(self) -> String {
        match self {
            Instance::Variant(v) => v.variant().qualname(),
            Instance::Product(p) => p.product().name().to_string(),
        }
    }

    fn same_object(self, other: Instance<'_>) -> bool {
        match (self, other) {
            (Instance::Variant(a), Instance::Variant(b)) => a.items_heap().ptr_eq(b.items_heap()),
            (Instance::Product(a), Instance::Product(b)) => a.items_heap().ptr_eq(b.items_heap()),
            _ => false,
        }
    }

    fn identity(self) -> usize {
        match self {
            Instance::Variant(v) => v.items_heap().addr(),
            Instance::Product(p) => p.items_heap().addr(),
        }
    }
}

/// Same concrete class and element-wise equal.
fn structurally_equal(lhs: Instance<'_>, rhs: &Value) -> bool {
    Instance::of(rhs).is_some_and(|rhs| lhs.class_id() == rhs.class_id() && lhs.items() == rhs.items())
}

/// `lhs == rhs` where `lhs` is an ADT instance.
pub(crate) fn equals(lhs: &Value, rhs: &Value) -> bool {
    let Some(instance) = Instance::of(lhs) else {
        return false;
    };
    match instance.behavior().equality() {
        Equality::User(eq) => eq(lhs, rhs),
        Equality::Derived => structurally_equal(instance, rhs),
        Equality::Identity => Instance::of(rhs).is_some_and(|rhs| instance.same_object(rhs)),
    }
}

/// `lhs != rhs` where `lhs` is an ADT instance.
pub fn not_equals(lhs: &Value, rhs: &Value) -> bool {
    match Instance::of(lhs).and_then(|instance| instance.behavior().ne_fn()) {
        Some(ne) => ne(lhs, rhs),
        None => lhs != rhs,
    }
}

/// `lhs <op> rhs` where `lhs` is an ADT instance.
pub(crate) fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool, ComparisonError> {
    let Some(instance) = Instance::of(lhs) else {
        return Err(op.unsupported(lhs, rhs));
    };
    let behavior = instance.behavior();
    if let Some(user) = behavior.compare_fn(op) {
        return user(lhs, rhs);
    }
    if !behavior.derived().contains(AdtFlags::ORDER) {
        return Err(op.unsupported(lhs, rhs));
    }

    match (instance, Instance::of(rhs)) {
        (_, Some(other)) if other.class_id() == instance.class_id() => {
            compare_sequences(op, instance.items(), other.items())
        }
        (Instance::Variant(a), Some(Instance::Variant(b)))
            if a.variant().sum().id() == b.variant().sum().id() =>
        {
            Ok(op.holds(a.variant().index().cmp(&b.variant().index())))
        }
        _ => Err(op.unsupported(lhs, rhs)),
    }
}

/// Hash of an ADT instance.
pub(crate) fn hash(value: &Value) -> Result<u64, ComparisonError> {
    let Some(instance) = Instance::of(value) else {
        return Err(ComparisonError::Unhashable {
            type_name: value.type_name(),
        });
    };
    match instance.behavior().hashing() {
        Hashing::User(hash) => Ok(hash(value)),
        Hashing::Derived => {
            let mut hasher = FxHasher::default();
            instance.items().hash(&mut hasher);
            Ok(hasher.finish())
        }
        Hashing::Identity => {
            let mut hasher = FxHasher::default();
            instance.identity().hash(&mut hasher);
            Ok(hasher.finish())
        }
        Hashing::Unhashable => Err(ComparisonError::Unhashable {
            type_name: instance.qualname(),
        }),
    }
}

/// Feed an ADT instance into a hasher; unhashable instances only contribute
/// their class, which stays consistent with any equality.
pub(crate) fn hash_into<H: Hasher>(value: &Value, state: &mut H) {
    match hash(value) {
        Ok(h) => h.hash(state),
        Err(_) => {
            if let Some(instance) = Instance::of(value) {
                instance.class_id().hash(state);
            }
        }
    }
}

/// Printed form of an ADT instance.
pub(crate) fn repr(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(instance) = Instance::of(value) else {
        return Ok(());
    };
    let behavior = instance.behavior();
    if let Some(user) = behavior.repr_fn() {
        return f.write_str(&user(value));
    }
    if behavior.derived().contains(AdtFlags::REPR) {
        f.write_str(&instance.qualname())?;
        fmt_items(f, instance.items(), "(", ")", false)
    } else {
        fmt_items(f, instance.items(), "(", ")", true)
    }
}
