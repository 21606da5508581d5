//! Errors raised while building templates or reading bindings.

use sd_diagnostic::ErrorCode;
use sd_ir::{IdentError, Name};

/// A template could not be built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("invalid binder name: {0}")]
    InvalidBinder(#[from] IdentError),
    #[error("'_' cannot be used as an extra binding name")]
    DiscardAsExtra,
}

impl PatternError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PatternError::InvalidBinder(_) => ErrorCode::E2002,
            PatternError::DiscardAsExtra => ErrorCode::E2003,
        }
    }
}

/// The same name is bound twice in one template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("name '{name}' is bound more than once")]
pub struct DuplicateBindingError {
    pub name: Name,
}

impl DuplicateBindingError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::E2001
    }
}

/// Why a traversal stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Some node did not match.
    #[error("no match")]
    Failure,
    #[error(transparent)]
    DuplicateBinding(#[from] DuplicateBindingError),
}

impl From<sd_types::MatchFailure> for MatchError {
    fn from(_: sd_types::MatchFailure) -> Self {
        MatchError::Failure
    }
}

/// Reading from a [`Matchable`](crate::Matchable) that holds no bindings,
/// or asking for a name the match did not bind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("the last match failed; there are no bindings")]
    NoMatch,
    #[error("name '{name}' was not bound by the match")]
    Unbound { name: String },
}

impl LookupError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LookupError::NoMatch => ErrorCode::E2004,
            LookupError::Unbound { .. } => ErrorCode::E2005,
        }
    }
}
