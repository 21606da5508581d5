//! Shared identifiers for the structured data crates.
//!
//! Every binding name, field name and variant name is a [`Name`]: a 32-bit
//! handle into a process-wide sharded interner. Types built at runtime get an
//! opaque [`TypeId`] so side tables (dispatch caches, base lookups) can key on
//! them without holding the type alive.

mod ident;
mod interner;
mod name;
mod type_id;

pub use ident::{check_binding_name, is_identifier, is_keyword, IdentError};
pub use name::Name;
pub use type_id::TypeId;
