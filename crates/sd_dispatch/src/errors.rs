//! Errors raised while registering or dispatching.

use std::fmt;

use sd_diagnostic::ErrorCode;
use sd_ir::Name;
use sd_patterns::DuplicateBindingError;
use sd_types::{AttributeError, ConstructionError, SignatureError};

/// Which accessor of a property was requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Accessor {
    Get,
    Set,
    Delete,
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Accessor::Get => "getter",
            Accessor::Set => "setter",
            Accessor::Delete => "deleter",
        })
    }
}

/// A dispatch table could not be extended or could not serve a call.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no template of '{name}' matched and there is no fallback")]
    Exhausted { name: Name },
    #[error("'{name}' does not accept placeholder templates")]
    PlaceholderNotAllowed { name: Name },
    #[error("'{name}' has placeholder templates but no owning type to resolve them")]
    AbstractWithoutOwner { name: Name },
    #[error("'{name}' is both a match binding and a keyword argument")]
    DuplicateArgument { name: Name },
    #[error("property '{name}' has no {accessor}")]
    MissingAccessor { name: Name, accessor: Accessor },
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Pattern(#[from] DuplicateBindingError),
    #[error("placeholder could not be resolved: {0}")]
    Placeholder(#[from] ConstructionError),
    #[error("{0}")]
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl DispatchError {
    /// Wrap an error reported by a handler or fallback.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        DispatchError::Handler(err.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::Exhausted { .. } => ErrorCode::E4001,
            DispatchError::PlaceholderNotAllowed { .. } => ErrorCode::E4002,
            DispatchError::AbstractWithoutOwner { .. } => ErrorCode::E4003,
            DispatchError::DuplicateArgument { .. } => ErrorCode::E4004,
            DispatchError::MissingAccessor { .. } => ErrorCode::E4005,
            DispatchError::Signature(_) => ErrorCode::E1007,
            DispatchError::Pattern(err) => err.code(),
            DispatchError::Placeholder(err) => err.code(),
            DispatchError::Handler(_) => ErrorCode::E4006,
        }
    }
}

impl From<DispatchError> for AttributeError {
    fn from(err: DispatchError) -> Self {
        AttributeError::Member {
            code: err.code(),
            source: Box::new(err),
        }
    }
}
