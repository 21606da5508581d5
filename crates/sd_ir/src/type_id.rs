//! Opaque identities for runtime-built types.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT: AtomicU32 = AtomicU32::new(1);

/// Stable identity of a type built at runtime.
///
/// Ids are never reused within a process, so a table keyed by `TypeId`
/// never confuses a dropped type with a newer one and never keeps the
/// type itself alive.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TypeId(u32);

impl TypeId {
    /// Allocate a fresh id.
    pub fn fresh() -> Self {
        TypeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = TypeId::fresh();
        let b = TypeId::fresh();
        assert_ne!(a, b);
        assert!(a < b);
    }
}
