//! Identifier validation for binding names.

use std::fmt;

/// Reserved words that can never be used as binding names.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Why a string was rejected as a binding name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentError {
    /// Not a syntactically valid identifier.
    NotIdentifier(String),
    /// A reserved keyword.
    Keyword(String),
}

impl fmt::Display for IdentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentError::NotIdentifier(text) => write!(f, "{text:?} is not a valid identifier"),
            IdentError::Keyword(text) => write!(f, "{text:?} is a keyword"),
        }
    }
}

impl std::error::Error for IdentError {}

/// Whether `text` is a syntactically valid identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// Whether `text` is a reserved keyword.
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Validate `text` as a binding name.
pub fn check_binding_name(text: &str) -> Result<(), IdentError> {
    if !is_identifier(text) {
        return Err(IdentError::NotIdentifier(text.to_owned()));
    }
    if is_keyword(text) {
        return Err(IdentError::Keyword(text.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("x1"));
        assert!(is_identifier("ünïcode"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn keywords_rejected() {
        assert_eq!(
            check_binding_name("match"),
            Err(IdentError::Keyword("match".to_owned()))
        );
        assert_eq!(
            check_binding_name("3d"),
            Err(IdentError::NotIdentifier("3d".to_owned()))
        );
        assert_eq!(check_binding_name("value"), Ok(()));
    }
}
