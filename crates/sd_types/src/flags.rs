//! Configuration flags for ADT construction.
//!
//! `AdtFlags` is what a caller asks for; the builder then decides which
//! derived behaviours it may actually inject, given the `SpecialMethods`
//! the class already defines by hand.

use bitflags::bitflags;

use crate::errors::ConstructionError;

bitflags! {
    /// Derived behaviours requested for an ADT.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct AdtFlags: u8 {
        /// Derive a printed form (`Type.Variant(a, b)` / `Type(a, b)`).
        const REPR = 1 << 0;
        /// Derive structural equality and hashing.
        const EQ = 1 << 1;
        /// Derive ordering.
        const ORDER = 1 << 2;
    }
}

impl Default for AdtFlags {
    fn default() -> Self {
        AdtFlags::REPR | AdtFlags::EQ
    }
}

impl AdtFlags {
    /// Reject flag combinations that can never be honoured.
    pub fn validate(self) -> Result<(), ConstructionError> {
        if self.contains(AdtFlags::ORDER) && !self.contains(AdtFlags::EQ) {
            return Err(ConstructionError::OrderWithoutEq);
        }
        Ok(())
    }
}

/// Per-flag settings for a product type; `None` inherits from the parent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdtOptions {
    pub repr: Option<bool>,
    pub eq: Option<bool>,
    pub order: Option<bool>,
}

impl AdtOptions {
    /// Fill unset options from `inherited`.
    pub fn resolve(self, inherited: AdtFlags) -> AdtFlags {
        let pick = |setting: Option<bool>, flag: AdtFlags| {
            if setting.unwrap_or(inherited.contains(flag)) {
                flag
            } else {
                AdtFlags::empty()
            }
        };
        pick(self.repr, AdtFlags::REPR) | pick(self.eq, AdtFlags::EQ) | pick(self.order, AdtFlags::ORDER)
    }
}

bitflags! {
    /// Special behaviours a class defines by hand.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct SpecialMethods: u8 {
        const REPR = 1 << 0;
        const EQ = 1 << 1;
        const NE = 1 << 2;
        const HASH = 1 << 3;
        const LT = 1 << 4;
        const LE = 1 << 5;
        const GT = 1 << 6;
        const GE = 1 << 7;

        const EQUALITY = Self::EQ.bits() | Self::NE.bits();
        const ORDERING = Self::LT.bits() | Self::LE.bits() | Self::GT.bits() | Self::GE.bits();
    }
}

impl SpecialMethods {
    /// Method name of a single flag, as used in error messages.
    pub fn method_name(self) -> &'static str {
        match self {
            SpecialMethods::REPR => "repr",
            SpecialMethods::EQ => "eq",
            SpecialMethods::NE => "ne",
            SpecialMethods::HASH => "hash",
            SpecialMethods::LT => "lt",
            SpecialMethods::LE => "le",
            SpecialMethods::GT => "gt",
            SpecialMethods::GE => "ge",
            _ => "<multiple>",
        }
    }
}
