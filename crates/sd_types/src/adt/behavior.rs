//! Derived and user-defined behaviour of ADT instances.
//!
//! # Design
//!
//! A class asks for derived behaviours through [`AdtFlags`]. A behaviour is
//! only injected when the class does not already define it by hand
//! ([`UserMethods`]). Equality decides hashing: derived equality derives the
//! hash, a hand-written equality without a hand-written hash makes the class
//! unhashable, and no equality at all falls back to identity.

use std::fmt;
use std::sync::Arc;

use sd_ir::Name;

use crate::errors::{ComparisonError, ConstructionError};
use crate::flags::{AdtFlags, SpecialMethods};
use crate::value::{CompareOp, Value};

pub type ReprFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;
pub type EqFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;
pub type HashFn = Arc<dyn Fn(&Value) -> u64 + Send + Sync>;
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Result<bool, ComparisonError> + Send + Sync>;

/// Special behaviours written by hand for a class.
#[derive(Clone, Default)]
pub struct UserMethods {
    repr: Option<ReprFn>,
    eq: Option<EqFn>,
    ne: Option<EqFn>,
    hash: Option<HashFn>,
    ordering: [Option<CompareFn>; 4],
}

impl UserMethods {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_repr(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.repr = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_eq(mut self, f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        self.eq = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_ne(mut self, f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        self.ne = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_hash(mut self, f: impl Fn(&Value) -> u64 + Send + Sync + 'static) -> Self {
        self.hash = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_compare(
        mut self,
        op: CompareOp,
        f: impl Fn(&Value, &Value) -> Result<bool, ComparisonError> + Send + Sync + 'static,
    ) -> Self {
        self.ordering[op.slot()] = Some(Arc::new(f));
        self
    }

    /// Which special behaviours are defined.
    pub fn defined(&self) -> SpecialMethods {
        let mut defined = SpecialMethods::empty();
        defined.set(SpecialMethods::REPR, self.repr.is_some());
        defined.set(SpecialMethods::EQ, self.eq.is_some());
        defined.set(SpecialMethods::NE, self.ne.is_some());
        defined.set(SpecialMethods::HASH, self.hash.is_some());
        for op in CompareOp::ALL {
            defined.set(op.special(), self.ordering[op.slot()].is_some());
        }
        defined
    }

    /// Methods of `self`, falling back to `parent` for the rest.
    pub(crate) fn inherit(&self, parent: &UserMethods) -> UserMethods {
        let pick = |own: &Option<CompareFn>, theirs: &Option<CompareFn>| own.clone().or_else(|| theirs.clone());
        UserMethods {
            repr: self.repr.clone().or_else(|| parent.repr.clone()),
            eq: self.eq.clone().or_else(|| parent.eq.clone()),
            ne: self.ne.clone().or_else(|| parent.ne.clone()),
            hash: self.hash.clone().or_else(|| parent.hash.clone()),
            ordering: std::array::from_fn(|slot| pick(&self.ordering[slot], &parent.ordering[slot])),
        }
    }
}

impl fmt::Debug for UserMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserMethods").field(&self.defined()).finish()
    }
}

/// Behaviour settled for one class at build time.
#[derive(Clone, Debug)]
pub(crate) struct Behavior {
    /// Flags the class asked for.
    requested: AdtFlags,
    /// Flags whose behaviour was actually injected.
    derived: AdtFlags,
    user: UserMethods,
}

/// How an instance answers equality.
pub(crate) enum Equality<'a> {
    User(&'a EqFn),
    Derived,
    Identity,
}

/// How an instance answers hashing.
pub(crate) enum Hashing<'a> {
    User(&'a HashFn),
    Derived,
    Identity,
    Unhashable,
}

impl Behavior {
    /// Decide what to inject, failing on impossible requests.
    ///
    /// Order of checks: flag validity, then equality, then ordering.
    pub(crate) fn resolve(
        class: Name,
        requested: AdtFlags,
        user: UserMethods,
    ) -> Result<Self, ConstructionError> {
        requested.validate()?;
        let defined = user.defined();

        let mut derived = AdtFlags::empty();
        if requested.contains(AdtFlags::REPR) && !defined.contains(SpecialMethods::REPR) {
            derived |= AdtFlags::REPR;
        }
        let eq_derived =
            requested.contains(AdtFlags::EQ) && !defined.intersects(SpecialMethods::EQUALITY);
        if eq_derived {
            derived |= AdtFlags::EQ;
        }
        if requested.contains(AdtFlags::ORDER) {
            if !eq_derived {
                return Err(ConstructionError::OrderWithUserEq { class });
            }
            if let Some(collision) = (defined & SpecialMethods::ORDERING).iter().next() {
                return Err(ConstructionError::OrderingCollision {
                    method: collision.method_name(),
                    class,
                });
            }
            derived |= AdtFlags::ORDER;
        }

        tracing::trace!(%class, ?requested, ?derived, "resolved adt behaviour");
        Ok(Behavior {
            requested,
            derived,
            user,
        })
    }

    pub(crate) fn requested(&self) -> AdtFlags {
        self.requested
    }

    pub(crate) fn derived(&self) -> AdtFlags {
        self.derived
    }

    pub(crate) fn user(&self) -> &UserMethods {
        &self.user
    }

    pub(crate) fn repr_fn(&self) -> Option<&ReprFn> {
        self.user.repr.as_ref()
    }

    pub(crate) fn equality(&self) -> Equality<'_> {
        if let Some(eq) = &self.user.eq {
            Equality::User(eq)
        } else if self.derived.contains(AdtFlags::EQ) {
            Equality::Derived
        } else {
            Equality::Identity
        }
    }

    pub(crate) fn ne_fn(&self) -> Option<&EqFn> {
        self.user.ne.as_ref()
    }

    pub(crate) fn hashing(&self) -> Hashing<'_> {
        if let Some(hash) = &self.user.hash {
            Hashing::User(hash)
        } else if self.derived.contains(AdtFlags::EQ) {
            Hashing::Derived
        } else if self.user.eq.is_some() {
            Hashing::Unhashable
        } else {
            Hashing::Identity
        }
    }

    pub(crate) fn compare_fn(&self, op: CompareOp) -> Option<&CompareFn> {
        self.user.ordering[op.slot()].as_ref()
    }
}
