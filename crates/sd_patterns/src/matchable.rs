//! A value that remembers its last match.

use sd_types::Value;

use crate::bindings::MatchBindings;
use crate::engine::try_match;
use crate::errors::{DuplicateBindingError, LookupError};

/// Holds a value and the bindings of the most recent match against it.
///
/// ```text
/// let mut m = Matchable::new(value);
/// if m.matches(&template)? {
///     let x = m.get("x")?;
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Matchable {
    value: Value,
    bindings: Option<MatchBindings>,
}

impl Matchable {
    pub fn new(value: Value) -> Self {
        Matchable {
            value,
            bindings: None,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Match against `template`, replacing any earlier bindings.
    ///
    /// A template that binds a name twice is an error and clears the
    /// bindings.
    pub fn matches(&mut self, template: &Value) -> Result<bool, DuplicateBindingError> {
        self.bindings = None;
        self.bindings = try_match(template, &self.value)?;
        Ok(self.bindings.is_some())
    }

    /// Whether the last match succeeded.
    pub fn is_match(&self) -> bool {
        self.bindings.is_some()
    }

    pub fn bindings(&self) -> Option<&MatchBindings> {
        self.bindings.as_ref()
    }

    /// Take the bindings of the last match, leaving none.
    pub fn take_bindings(&mut self) -> Option<MatchBindings> {
        self.bindings.take()
    }

    pub fn get(&self, name: &str) -> Result<&Value, LookupError> {
        self.bindings
            .as_ref()
            .ok_or(LookupError::NoMatch)?
            .get(name)
            .ok_or_else(|| LookupError::Unbound {
                name: name.to_owned(),
            })
    }

    pub fn get_many(&self, names: &[&str]) -> Result<Vec<&Value>, LookupError> {
        names.iter().map(|name| self.get(name)).collect()
    }
}
