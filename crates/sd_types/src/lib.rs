//! Value model and ADT builder for structured data.
//!
//! - `Value`: the runtime value universe, including pattern nodes
//! - `Signature`: call signatures and argument binding
//! - `SumType` / `ProductType`: runtime-built algebraic data types
//!
//! # Type Building
//!
//! Types are built once from resolved declarations and are immutable
//! afterwards. Derived behaviours (printing, equality, hashing, ordering)
//! are settled at build time from [`AdtFlags`] and the [`UserMethods`]
//! a class supplies.

mod adt;
mod errors;
mod flags;
mod signature;
mod value;

pub use adt::{
    build_product, build_sum, merge_spec, not_equals, CompareFn, EqFn, Field, FieldSpec, HashFn,
    Member, MethodMember, ProductBuilder, ProductConstructor, ProductConstructorFn, ProductType,
    ProductValue, PropertyMember, ReprFn, SpecEntry, SumBuilder, SumConstructorFn, SumType,
    TypeRef, UserMethods, VariantRef, VariantValue, WeakTypeRef,
};
pub use errors::{
    AccessError, AttributeError, ComparisonError, ConstructionError, SignatureError,
};
pub use flags::{AdtFlags, AdtOptions, SpecialMethods};
pub use signature::{BoundArguments, CallArgs, ParamKind, Parameter, Signature};
pub use value::{
    CompareOp, CompoundMatch, Detached, DictValue, Heap, Items, MatchFailure, NodeParts,
    ObjectValue, Rebuild, Subject, TupleClass, TupleValue, Value,
};

