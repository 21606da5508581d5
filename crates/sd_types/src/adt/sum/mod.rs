//! Sum types: closed tagged unions of fixed-arity variants.
//!
//! # Architecture
//!
//! A [`SumType`] is the abstract base. It owns the variant table in
//! declaration order (after merging), the settled behaviour, an optional
//! user constructor and its members. A variant is addressed by
//! [`VariantRef`]: the shared base plus an index, so instances never form
//! reference cycles with their type.
//!
//! The base is closed. Nothing may extend it or any of its variants, and
//! variant names can only be read from the base itself.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use sd_ir::{check_binding_name, Name, TypeId};

use super::behavior::{Behavior, UserMethods};
use super::member::Member;
use super::spec::{merge_spec, SpecEntry};
use super::TypeRef;
use crate::errors::{AccessError, ConstructionError};
use crate::flags::AdtFlags;
use crate::value::{Heap, Value};

/// User constructor applied to every variant after the arity check.
///
/// It receives the variant and its arguments and usually finishes with
/// [`VariantRef::instantiate`].
pub type SumConstructorFn =
    Arc<dyn Fn(&VariantRef, Vec<Value>) -> Result<Value, ConstructionError> + Send + Sync>;

struct VariantDef {
    name: Name,
    arity: usize,
    id: TypeId,
}

/// An abstract sum type.
pub struct SumType {
    name: Name,
    id: TypeId,
    variants: Vec<VariantDef>,
    index: FxHashMap<Name, usize>,
    behavior: Behavior,
    constructor: Option<SumConstructorFn>,
    members: FxHashMap<Name, Member>,
}

impl SumType {
    pub fn builder(name: &str) -> SumBuilder {
        SumBuilder::new(name)
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Flags the type was declared with.
    pub fn flags(&self) -> AdtFlags {
        self.behavior.requested()
    }

    /// Behaviours that were injected.
    pub fn derived(&self) -> AdtFlags {
        self.behavior.derived()
    }

    pub fn user_methods(&self) -> &UserMethods {
        self.behavior.user()
    }

    pub(crate) fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Variants in declaration order.
    pub fn variants(self: &Arc<Self>) -> impl Iterator<Item = VariantRef> + '_ {
        (0..self.variants.len()).map(|index| VariantRef {
            sum: Arc::clone(self),
            index,
        })
    }

    /// Look up a variant by name.
    pub fn variant(self: &Arc<Self>, name: &str) -> Result<VariantRef, AccessError> {
        let name = Name::intern(name);
        self.index
            .get(&name)
            .map(|&index| VariantRef {
                sum: Arc::clone(self),
                index,
            })
            .ok_or_else(|| AccessError::NoSuchAttribute {
                class: self.name.to_string(),
                name,
            })
    }

    pub(crate) fn has_variant(&self, name: Name) -> bool {
        self.index.contains_key(&name)
    }

    /// The base is abstract; only its variants can be instantiated.
    pub fn construct(&self, _args: Vec<Value>) -> Result<Value, ConstructionError> {
        Err(ConstructionError::AbstractSum { name: self.name })
    }

    pub fn member(&self, name: Name) -> Option<&Member> {
        self.members.get(&name)
    }
}

impl fmt::Debug for SumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<Name> = self.variants.iter().map(|v| v.name).collect();
        f.debug_struct("SumType")
            .field("name", &self.name)
            .field("variants", &names)
            .finish_non_exhaustive()
    }
}

/// One variant of a sum type.
#[derive(Clone)]
pub struct VariantRef {
    sum: Arc<SumType>,
    index: usize,
}

impl VariantRef {
    pub(super) fn at(sum: Arc<SumType>, index: usize) -> Self {
        VariantRef { sum, index }
    }

    fn def(&self) -> &VariantDef {
        &self.sum.variants[self.index]
    }

    pub fn sum(&self) -> &Arc<SumType> {
        &self.sum
    }

    pub fn name(&self) -> Name {
        self.def().name
    }

    /// `Base.Variant`.
    pub fn qualname(&self) -> String {
        format!("{}.{}", self.sum.name, self.def().name)
    }

    pub fn arity(&self) -> usize {
        self.def().arity
    }

    /// Position in declaration order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> TypeId {
        self.def().id
    }

    fn check_arity(&self, found: usize) -> Result<(), ConstructionError> {
        if found == self.arity() {
            Ok(())
        } else {
            Err(ConstructionError::Arity {
                variant: self.qualname(),
                expected: self.arity(),
                found,
            })
        }
    }

    /// Construct an instance, going through the user constructor if any.
    pub fn construct(&self, args: Vec<Value>) -> Result<Value, ConstructionError> {
        self.check_arity(args.len())?;
        match &self.sum.constructor {
            Some(constructor) => constructor(self, args),
            None => self.instantiate(args),
        }
    }

    /// Construct an instance without the user constructor.
    pub fn instantiate(&self, items: Vec<Value>) -> Result<Value, ConstructionError> {
        self.check_arity(items.len())?;
        Ok(Value::Variant(VariantValue {
            variant: self.clone(),
            items: Heap::new(items),
        }))
    }

    /// Attribute lookup on the variant class.
    ///
    /// Sum members are only reachable through the base.
    pub fn attr(&self, name: Name) -> Result<Value, AccessError> {
        if self.sum.has_variant(name) {
            Err(AccessError::MemberThroughVariant { name })
        } else {
            Err(AccessError::NoSuchAttribute {
                class: self.qualname(),
                name,
            })
        }
    }
}

impl PartialEq for VariantRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for VariantRef {}

impl fmt::Debug for VariantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariantRef({})", self.qualname())
    }
}

/// An instance of a variant.
#[derive(Clone)]
pub struct VariantValue {
    variant: VariantRef,
    items: Heap<Vec<Value>>,
}

impl VariantValue {
    pub fn variant(&self) -> &VariantRef {
        &self.variant
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub(crate) fn items_heap(&self) -> &Heap<Vec<Value>> {
        &self.items
    }
}

/// Declarative builder for [`SumType`].
pub struct SumBuilder {
    name: Name,
    entries: Vec<SpecEntry<usize>>,
    bases: Vec<TypeRef>,
    flags: AdtFlags,
    user: UserMethods,
    constructor: Option<SumConstructorFn>,
    members: FxHashMap<Name, Member>,
}

impl SumBuilder {
    pub fn new(name: &str) -> Self {
        SumBuilder {
            name: Name::intern(name),
            entries: Vec::new(),
            bases: Vec::new(),
            flags: AdtFlags::default(),
            user: UserMethods::default(),
            constructor: None,
            members: FxHashMap::default(),
        }
    }

    /// Declare a variant holding `arity` values.
    #[must_use]
    pub fn variant(mut self, name: &str, arity: usize) -> Self {
        self.entries.push(SpecEntry::declare(self.name, name, arity));
        self
    }

    /// Remove a variant declared by an older scope.
    #[must_use]
    pub fn erase(mut self, name: &str) -> Self {
        self.entries.push(SpecEntry::erase(self.name, name));
        self
    }

    /// Append resolved declarations, oldest scope first.
    #[must_use]
    pub fn spec(mut self, entries: impl IntoIterator<Item = SpecEntry<usize>>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Declare a base class. Sums are closed, so any sum base is rejected at
    /// build time.
    #[must_use]
    pub fn extends(mut self, base: TypeRef) -> Self {
        self.bases.push(base);
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: AdtFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn methods(mut self, user: UserMethods) -> Self {
        self.user = user;
        self
    }

    #[must_use]
    pub fn constructor(
        mut self,
        constructor: impl Fn(&VariantRef, Vec<Value>) -> Result<Value, ConstructionError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    #[must_use]
    pub fn member(mut self, name: &str, member: Member) -> Self {
        self.members.insert(Name::intern(name), member);
        self
    }

    #[tracing::instrument(level = "debug", skip_all, fields(sum = %self.name))]
    pub fn build(self) -> Result<Arc<SumType>, ConstructionError> {
        self.flags.validate()?;

        if let Some(base) = self.bases.first() {
            return Err(match base {
                TypeRef::Sum(_) | TypeRef::Variant(_) => {
                    ConstructionError::ClosedType { name: base.name() }
                }
                TypeRef::Product(_) | TypeRef::Tuple(_) => ConstructionError::MixedKinds {
                    class: self.name,
                    base: base.name(),
                },
            });
        }

        let merged = merge_spec(self.entries);
        let mut variants = Vec::with_capacity(merged.len());
        let mut index = FxHashMap::default();
        for (name, arity) in merged {
            check_binding_name(name.as_str()).map_err(|source| {
                ConstructionError::InvalidName {
                    class: self.name,
                    source,
                }
            })?;
            index.insert(name, variants.len());
            variants.push(VariantDef {
                name,
                arity,
                id: TypeId::fresh(),
            });
        }

        let behavior = Behavior::resolve(self.name, self.flags, self.user)?;
        tracing::debug!(variants = variants.len(), "built sum type");

        Ok(Arc::new(SumType {
            name: self.name,
            id: TypeId::fresh(),
            variants,
            index,
            behavior,
            constructor: self.constructor,
            members: self.members,
        }))
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
