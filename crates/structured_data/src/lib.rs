//! Algebraic data types, structural pattern matching and value-based
//! dispatch over a dynamic value model.
//!
//! - [`adt`]: sum and product type builders
//! - [`patterns`]: template nodes and the matcher
//! - [`dispatch`]: functions, methods and properties that pick a handler by
//!   matching their arguments
//!
//! The most common items are re-exported at the crate root.

use std::sync::Once;

pub use sd_diagnostic::ErrorCode;
pub use sd_ir::{IdentError, Name, TypeId};
pub use sd_types::{
    AccessError, AttributeError, CallArgs, ComparisonError, ConstructionError, SignatureError,
    Value,
};

/// Sum and product type builders.
pub mod adt {
    pub use sd_types::{
        build_product, build_sum, merge_spec, not_equals, AdtFlags, AdtOptions, CompareFn,
        CompareOp, EqFn, Field, FieldSpec, HashFn, Member, MethodMember, ProductBuilder,
        ProductConstructor, ProductConstructorFn, ProductType, ProductValue, PropertyMember,
        ReprFn, SpecEntry, SpecialMethods, SumBuilder, SumConstructorFn, SumType, TupleClass,
        TypeRef, UserMethods, VariantRef, VariantValue, WeakTypeRef,
    };
}

/// Template nodes, the matcher and its results.
pub mod patterns {
    pub use sd_patterns::{
        as_pattern, guard, match_value, names, pat, try_match, AsGuard, AsPattern, AttrPattern,
        Bind, DictPattern, Destructurer, DestructurerList, DuplicateBindingError, Guard,
        LookupError, MatchBindings, Matchable, PatternError, Predicate,
    };
    pub use sd_types::{CompoundMatch, Detached, Items, MatchFailure, NodeParts, Rebuild, Subject};
}

/// Value-based dispatch.
pub mod dispatch {
    pub use sd_dispatch::{
        Accessor, ClassMethod, DispatchError, Function, HandlerArgs, MatchTemplate, Matcher,
        Placeholder, Property, StaticMethod,
    };
    pub use sd_types::{ParamKind, Parameter, Signature};
}

pub use dispatch::{DispatchError, Function, Placeholder, Property};
pub use patterns::{match_value, names, pat, MatchBindings};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with
/// `RUST_LOG=sd_patterns=trace,sd_dispatch=debug` or similar.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Leaves any subscriber the host already installed in place.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
