//! Error types raised by the value model and the ADT builder.
//!
//! Construction errors fail fast at type-definition or instantiation time.
//! Access and comparison errors are raised at the point of the offending
//! operation. Every kind maps to one [`ErrorCode`].

use sd_diagnostic::ErrorCode;
use sd_ir::{IdentError, Name};

use crate::value::CompareOp;

/// Call arguments that do not fit a [`Signature`](crate::Signature).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("takes {expected} positional arguments but {found} were given")]
    TooManyPositional { expected: usize, found: usize },
    #[error("got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { name: Name },
    #[error("got multiple values for argument '{name}'")]
    MultipleValues { name: Name },
    #[error("missing a required argument: '{name}'")]
    MissingArgument { name: Name },
    #[error("positional-only argument '{name}' passed as keyword")]
    PositionalOnlyAsKeyword { name: Name },
    #[error("non-default parameter '{name}' follows default parameter")]
    DefaultOrder { name: Name },
    #[error("parameter '{name}' is out of order")]
    ParameterOrder { name: Name },
    #[error("duplicate parameter name '{name}'")]
    DuplicateParameter { name: Name },
}

/// Failure to build a type or to instantiate one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("eq must be true if order is true")]
    OrderWithoutEq,
    #[error("can't add ordering methods if equality methods are provided")]
    OrderWithUserEq { class: Name },
    #[error("cannot overwrite attribute {method} in class {class}")]
    OrderingCollision { method: &'static str, class: Name },
    #[error("cannot further subclass the class {name}")]
    ClosedType { name: Name },
    #[error("cannot instantiate the abstract sum type {name}")]
    AbstractSum { name: Name },
    #[error("{variant} takes {expected} values but {found} were given")]
    Arity {
        variant: String,
        expected: usize,
        found: usize,
    },
    #[error("{class}: {source}")]
    Signature {
        class: Name,
        #[source]
        source: SignatureError,
    },
    #[error("non-default field '{field}' follows a defaulted field in {class}")]
    DefaultOrder { class: Name, field: Name },
    #[error("{class} cannot extend {base}: sum and product declarations do not mix")]
    MixedKinds { class: Name, base: Name },
    #[error("invalid name in {class}: {source}")]
    InvalidName {
        class: Name,
        #[source]
        source: IdentError,
    },
    #[error("{class} rejected its arguments: {message}")]
    Rejected { class: Name, message: String },
}

impl ConstructionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConstructionError::OrderWithoutEq => ErrorCode::E1001,
            ConstructionError::OrderWithUserEq { .. } => ErrorCode::E1002,
            ConstructionError::OrderingCollision { .. } => ErrorCode::E1003,
            ConstructionError::ClosedType { .. } => ErrorCode::E1004,
            ConstructionError::AbstractSum { .. } => ErrorCode::E1005,
            ConstructionError::Arity { .. } => ErrorCode::E1006,
            ConstructionError::Signature { .. } => ErrorCode::E1007,
            ConstructionError::DefaultOrder { .. } => ErrorCode::E1008,
            ConstructionError::MixedKinds { .. } => ErrorCode::E1009,
            ConstructionError::InvalidName { .. } => ErrorCode::E1010,
            ConstructionError::Rejected { .. } => ErrorCode::E1011,
        }
    }
}

/// Attribute lookup or modification that is not allowed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("'{class}' object has no attribute '{name}'")]
    NoSuchAttribute { class: String, name: Name },
    #[error("'{class}' object attribute '{name}' is read-only")]
    ReadOnly { class: String, name: Name },
    #[error("can only access adt members through base class")]
    MemberThroughVariant { name: Name },
    #[error("'{class}' member '{name}' is not callable")]
    NotCallable { class: String, name: Name },
    #[error("'{class}' member '{name}' is a method and must be called")]
    UnboundMethod { class: String, name: Name },
}

impl AccessError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::NoSuchAttribute { .. } => ErrorCode::E3001,
            AccessError::ReadOnly { .. } => ErrorCode::E3002,
            AccessError::MemberThroughVariant { .. } => ErrorCode::E3003,
            AccessError::NotCallable { .. } => ErrorCode::E3006,
            AccessError::UnboundMethod { .. } => ErrorCode::E3007,
        }
    }
}

/// Ordering or hashing requested on values that do not support it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    #[error("'{op}' not supported between instances of '{lhs}' and '{rhs}'")]
    Unsupported {
        op: CompareOp,
        lhs: String,
        rhs: String,
    },
    #[error("unhashable type: '{type_name}'")]
    Unhashable { type_name: String },
}

impl ComparisonError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ComparisonError::Unsupported { .. } => ErrorCode::E3004,
            ComparisonError::Unhashable { .. } => ErrorCode::E3005,
        }
    }
}

/// Failure surfaced through the attribute API of a value.
///
/// Built-in lookups fail with an [`AccessError`]; members registered on a
/// class (methods, properties) report their own errors, carried here with
/// the code they were raised under.
#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("{source}")]
    Member {
        code: ErrorCode,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AttributeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AttributeError::Access(err) => err.code(),
            AttributeError::Member { code, .. } => *code,
        }
    }

    /// The access error, if this failure came from a built-in lookup.
    pub fn as_access(&self) -> Option<&AccessError> {
        match self {
            AttributeError::Access(err) => Some(err),
            AttributeError::Member { .. } => None,
        }
    }
}
