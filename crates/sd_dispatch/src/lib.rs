//! Value-based dispatch.
//!
//! Functions, methods and properties carry ordered tables of
//! (template, handler) entries. A call is normalized into one value, the
//! entries are tried in registration order, and the first template that
//! matches picks the handler. When nothing matches, the wrapped fallback
//! runs, or the call fails with [`DispatchError::Exhausted`].
//!
//! Templates may be [`Placeholder`]s, written once against an abstract
//! owner and resolved per concrete type on first use.

mod errors;
mod function;
mod property;
mod template;

pub use errors::{Accessor, DispatchError};
pub use function::{ClassMethod, Fallback, Function, Handler, HandlerArgs, StaticMethod};
pub use property::{AccessHandler, GetHandler, Property};
pub use template::{MatchTemplate, Matcher, Placeholder};
