//! Product types: open records with named, ordered fields.
//!
//! # Architecture
//!
//! A [`ProductType`] holds its merged field list, a name→index layout, the
//! generated call signature (positional-or-keyword parameters with the
//! field defaults) and the settled behaviour. Subclasses point at their
//! parent, inherit its fields, flags, user methods and members, and may
//! erase inherited fields.
//!
//! Each product class is distinct: instances of a subclass never compare
//! equal to, nor order against, instances of the parent.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use sd_ir::{check_binding_name, Name, TypeId};

use super::behavior::{Behavior, UserMethods};
use super::member::Member;
use super::spec::{merge_spec, SpecEntry};
use super::TypeRef;
use crate::errors::{AccessError, ConstructionError, SignatureError};
use crate::flags::{AdtFlags, AdtOptions};
use crate::signature::{CallArgs, ParamKind, Parameter, Signature};
use crate::value::{Heap, Value};

/// User constructor for exactly one product class.
pub type ProductConstructorFn =
    Arc<dyn Fn(&ProductConstructor<'_>, CallArgs) -> Result<Value, ConstructionError> + Send + Sync>;

/// Field declaration as produced by the annotation resolver.
#[derive(Clone, Debug, Default)]
pub struct FieldSpec {
    pub default: Option<Value>,
}

/// A merged field.
#[derive(Clone, Debug)]
pub struct Field {
    name: Name,
    default: Option<Value>,
}

impl Field {
    pub fn name(&self) -> Name {
        self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A product type.
pub struct ProductType {
    name: Name,
    id: TypeId,
    parent: Option<Arc<ProductType>>,
    fields: Vec<Field>,
    layout: FxHashMap<Name, usize>,
    signature: Signature,
    behavior: Behavior,
    constructor: Option<ProductConstructorFn>,
    members: FxHashMap<Name, Member>,
}

impl ProductType {
    pub fn builder(name: &str) -> ProductBuilder {
        ProductBuilder::new(name)
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn parent(&self) -> Option<&Arc<ProductType>> {
        self.parent.as_ref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Index of a field in the instance layout.
    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.layout.get(&name).copied()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Flags after inheritance.
    pub fn flags(&self) -> AdtFlags {
        self.behavior.requested()
    }

    pub fn derived(&self) -> AdtFlags {
        self.behavior.derived()
    }

    pub fn user_methods(&self) -> &UserMethods {
        self.behavior.user()
    }

    pub(crate) fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// A member of this class or the nearest ancestor defining it.
    pub fn member(&self, name: Name) -> Option<&Member> {
        let mut current = Some(self);
        while let Some(ty) = current {
            if let Some(member) = ty.members.get(&name) {
                return Some(member);
            }
            current = ty.parent.as_deref();
        }
        None
    }

    /// Whether `self` is `other` or one of its subclasses.
    pub fn is_subclass_of(&self, other: &ProductType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.id == other.id {
                return true;
            }
            current = ty.parent.as_deref();
        }
        false
    }

    /// Construct an instance.
    ///
    /// A user constructor only applies to the class that declared it;
    /// subclasses use the generated signature.
    pub fn construct(self: &Arc<Self>, args: CallArgs) -> Result<Value, ConstructionError> {
        let constructor = ProductConstructor { product: self };
        match &self.constructor {
            Some(user) => user(&constructor, args),
            None => constructor.base(args),
        }
    }

    /// An instance holding `items` as they are, with no signature binding.
    pub(crate) fn instantiate(self: &Arc<Self>, items: Vec<Value>) -> Value {
        Value::Product(ProductValue {
            product: Arc::clone(self),
            items: Heap::new(items),
        })
    }

    /// Attribute lookup on the class itself.
    pub fn attr(&self, name: Name) -> Result<Value, AccessError> {
        Err(AccessError::NoSuchAttribute {
            class: self.name.to_string(),
            name,
        })
    }
}

impl fmt::Debug for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<Name> = self.fields.iter().map(Field::name).collect();
        f.debug_struct("ProductType")
            .field("name", &self.name)
            .field("fields", &names)
            .finish_non_exhaustive()
    }
}

/// Handle passed to a user constructor.
pub struct ProductConstructor<'a> {
    product: &'a Arc<ProductType>,
}

impl ProductConstructor<'_> {
    pub fn product(&self) -> &Arc<ProductType> {
        self.product
    }

    /// Bind `args` to the generated signature and build the instance.
    pub fn base(&self, args: CallArgs) -> Result<Value, ConstructionError> {
        let bound = self
            .product
            .signature
            .bind(args)
            .map_err(|source| ConstructionError::Signature {
                class: self.product.name,
                source,
            })?;
        Ok(Value::Product(ProductValue {
            product: Arc::clone(self.product),
            items: Heap::new(bound.into_values()),
        }))
    }
}

/// An instance of a product type.
#[derive(Clone)]
pub struct ProductValue {
    product: Arc<ProductType>,
    items: Heap<Vec<Value>>,
}

impl ProductValue {
    pub fn product(&self) -> &Arc<ProductType> {
        &self.product
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub(crate) fn items_heap(&self) -> &Heap<Vec<Value>> {
        &self.items
    }

    /// Read a field by name.
    pub fn field(&self, name: Name) -> Option<&Value> {
        self.product
            .field_index(name)
            .and_then(|index| self.items.get(index))
    }
}

/// Declarative builder for [`ProductType`].
pub struct ProductBuilder {
    name: Name,
    parent: Option<TypeRef>,
    entries: Vec<SpecEntry<FieldSpec>>,
    options: AdtOptions,
    user: UserMethods,
    constructor: Option<ProductConstructorFn>,
    members: FxHashMap<Name, Member>,
}

impl ProductBuilder {
    pub fn new(name: &str) -> Self {
        ProductBuilder {
            name: Name::intern(name),
            parent: None,
            entries: Vec::new(),
            options: AdtOptions::default(),
            user: UserMethods::default(),
            constructor: None,
            members: FxHashMap::default(),
        }
    }

    /// Extend another product.
    #[must_use]
    pub fn extends(mut self, parent: TypeRef) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declare a required field.
    #[must_use]
    pub fn field(mut self, name: &str) -> Self {
        self.entries
            .push(SpecEntry::declare(self.name, name, FieldSpec::default()));
        self
    }

    /// Declare a field with a default value.
    #[must_use]
    pub fn field_with_default(mut self, name: &str, default: Value) -> Self {
        self.entries.push(SpecEntry::declare(
            self.name,
            name,
            FieldSpec {
                default: Some(default),
            },
        ));
        self
    }

    /// Remove an inherited field.
    #[must_use]
    pub fn erase(mut self, name: &str) -> Self {
        self.entries.push(SpecEntry::erase(self.name, name));
        self
    }

    /// Append resolved declarations, oldest scope first.
    #[must_use]
    pub fn spec(mut self, entries: impl IntoIterator<Item = SpecEntry<FieldSpec>>) -> Self {
        self.entries.extend(entries);
        self
    }

    #[must_use]
    pub fn options(mut self, options: AdtOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn repr(mut self, repr: bool) -> Self {
        self.options.repr = Some(repr);
        self
    }

    #[must_use]
    pub fn eq(mut self, eq: bool) -> Self {
        self.options.eq = Some(eq);
        self
    }

    #[must_use]
    pub fn order(mut self, order: bool) -> Self {
        self.options.order = Some(order);
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
        constructor: impl Fn(&ProductConstructor<'_>, CallArgs) -> Result<Value, ConstructionError>
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

    #[tracing::instrument(level = "debug", skip_all, fields(product = %self.name))]
    pub fn build(self) -> Result<Arc<ProductType>, ConstructionError> {
        let parent = match self.parent {
            None => None,
            Some(TypeRef::Product(parent)) => Some(parent),
            Some(other @ (TypeRef::Sum(_) | TypeRef::Variant(_) | TypeRef::Tuple(_))) => {
                return Err(ConstructionError::MixedKinds {
                    class: self.name,
                    base: other.name(),
                })
            }
        };

        let inherited = parent.as_ref().map_or_else(AdtFlags::default, |p| p.flags());
        let flags = self.options.resolve(inherited);
        flags.validate()?;

        let inherited_fields = parent.iter().flat_map(|p| {
            p.fields.iter().map(|field| SpecEntry {
                scope: p.name,
                name: field.name,
                resolved: Some(FieldSpec {
                    default: field.default.clone(),
                }),
            })
        });
        let merged = merge_spec(inherited_fields.chain(self.entries));

        let mut fields = Vec::with_capacity(merged.len());
        let mut layout = FxHashMap::default();
        for (name, spec) in merged {
            check_binding_name(name.as_str()).map_err(|source| {
                ConstructionError::InvalidName {
                    class: self.name,
                    source,
                }
            })?;
            layout.insert(name, fields.len());
            fields.push(Field {
                name,
                default: spec.default,
            });
        }

        let params = fields
            .iter()
            .map(|field| Parameter {
                name: field.name,
                kind: ParamKind::PositionalOrKeyword,
                default: field.default.clone(),
            })
            .collect();
        let signature = Signature::new(params).map_err(|err| match err {
            SignatureError::DefaultOrder { name } => ConstructionError::DefaultOrder {
                class: self.name,
                field: name,
            },
            source => ConstructionError::Signature {
                class: self.name,
                source,
            },
        })?;

        let user = match &parent {
            Some(parent) => self.user.inherit(parent.user_methods()),
            None => self.user,
        };
        let behavior = Behavior::resolve(self.name, flags, user)?;
        tracing::debug!(fields = fields.len(), "built product type");

        Ok(Arc::new(ProductType {
            name: self.name,
            id: TypeId::fresh(),
            parent,
            fields,
            layout,
            signature,
            behavior,
            constructor: self.constructor,
            members: self.members,
        }))
    }
}
