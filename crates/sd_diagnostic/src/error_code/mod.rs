use std::fmt;

/// Error codes for all structured data diagnostics.
///
/// Format: E#### where first digit indicates the layer:
/// - E1xxx: Type construction errors
/// - E2xxx: Pattern and binding errors
/// - E3xxx: Attribute access and comparison errors
/// - E4xxx: Dispatch errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Construction Errors (E1xxx)
    /// Ordering requested without equality
    E1001,
    /// Ordering requested while equality is user-defined
    E1002,
    /// Ordering would overwrite a user-defined comparison
    E1003,
    /// Closed type cannot be extended
    E1004,
    /// Abstract sum base instantiated directly
    E1005,
    /// Variant constructed with the wrong number of values
    E1006,
    /// Call arguments do not fit the signature
    E1007,
    /// Required field declared after a defaulted one
    E1008,
    /// Sum and product declarations mixed in one hierarchy
    E1009,
    /// Variant or field name is not a valid identifier
    E1010,
    /// User constructor rejected its arguments
    E1011,

    // Pattern Errors (E2xxx)
    /// Name bound more than once in a template
    E2001,
    /// Binder name is not a valid identifier
    E2002,
    /// Discard used as an extra binding name
    E2003,
    /// Bindings read after a failed match
    E2004,
    /// Name not bound by the match
    E2005,

    // Access Errors (E3xxx)
    /// Attribute does not exist
    E3001,
    /// Attribute is read-only
    E3002,
    /// Sum member read through a variant
    E3003,
    /// Comparison not supported between operands
    E3004,
    /// Value cannot be hashed
    E3005,
    /// Member cannot be called
    E3006,
    /// Method read as a plain attribute
    E3007,

    // Dispatch Errors (E4xxx)
    /// No template matched and no fallback exists
    E4001,
    /// Placeholder template registered where not allowed
    E4002,
    /// Placeholder table used without an owning type
    E4003,
    /// Binding collides with an argument name
    E4004,
    /// Property accessor missing
    E4005,
    /// Handler reported an error
    E4006,
}

/// Layer a code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCategory {
    Construction,
    Pattern,
    Access,
    Dispatch,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Construction
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            // Pattern
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            // Access
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            // Dispatch
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
        }
    }

    /// The layer this code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self.as_str().as_bytes().get(1) {
            Some(b'1') => ErrorCategory::Construction,
            Some(b'2') => ErrorCategory::Pattern,
            Some(b'3') => ErrorCategory::Access,
            _ => ErrorCategory::Dispatch,
        }
    }

    /// Check if this is a type construction error (E1xxx range).
    pub fn is_construction_error(&self) -> bool {
        self.category() == ErrorCategory::Construction
    }

    /// Check if this is a dispatch error (E4xxx range).
    pub fn is_dispatch_error(&self) -> bool {
        self.category() == ErrorCategory::Dispatch
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
