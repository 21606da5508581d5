//! Diagnostic codes shared by every structured data crate.
//!
//! Each typed error in the workspace maps to exactly one [`ErrorCode`], so
//! callers can branch on a stable code instead of parsing messages.

mod error_code;

pub use error_code::{ErrorCategory, ErrorCode};
