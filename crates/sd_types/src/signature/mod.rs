//! Call signatures and argument binding.
//!
//! A [`Signature`] is an ordered parameter list with the usual five kinds.
//! [`Signature::bind`] maps [`CallArgs`] onto it, applying defaults, and
//! keeps variadic positional and keyword values apart from the named ones.

use rustc_hash::FxHashSet;
use sd_ir::Name;

use crate::errors::SignatureError;
use crate::value::Value;

/// How a parameter accepts arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: Name,
    pub kind: ParamKind,
    pub default: Option<Value>,
}

impl Parameter {
    pub fn new(name: &str, kind: ParamKind) -> Self {
        Parameter {
            name: Name::intern(name),
            kind,
            default: None,
        }
    }

    pub fn positional(name: &str) -> Self {
        Self::new(name, ParamKind::PositionalOrKeyword)
    }

    pub fn positional_only(name: &str) -> Self {
        Self::new(name, ParamKind::PositionalOnly)
    }

    pub fn keyword_only(name: &str) -> Self {
        Self::new(name, ParamKind::KeywordOnly)
    }

    pub fn var_positional(name: &str) -> Self {
        Self::new(name, ParamKind::VarPositional)
    }

    pub fn var_keyword(name: &str) -> Self {
        Self::new(name, ParamKind::VarKeyword)
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn is_positional(&self) -> bool {
        matches!(
            self.kind,
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
        )
    }

    fn accepts_keyword(&self) -> bool {
        matches!(
            self.kind,
            ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
        )
    }
}

/// Actual arguments of one call.
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keywords: Vec<(Name, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(values: Vec<Value>) -> Self {
        CallArgs {
            positional: values,
            keywords: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    #[must_use]
    pub fn kwarg(mut self, name: &str, value: Value) -> Self {
        self.keywords.push((Name::intern(name), value));
        self
    }

    /// Insert `value` as the first positional argument.
    #[must_use]
    pub fn prepend(mut self, value: Value) -> Self {
        self.positional.insert(0, value);
        self
    }
}

/// Arguments bound to a signature, defaults applied.
#[derive(Clone, Debug, Default)]
pub struct BoundArguments {
    /// Non-variadic parameters in declaration order.
    pub named: Vec<(Name, Value)>,
    /// Extra positional values, when the signature has a variadic positional.
    pub var_positional: Vec<Value>,
    /// Extra keyword values, when the signature has a variadic keyword.
    pub var_keyword: Vec<(Name, Value)>,
}

impl BoundArguments {
    pub fn get(&self, name: Name) -> Option<&Value> {
        self.named.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Named values in order, dropping the names.
    pub fn into_values(self) -> Vec<Value> {
        self.named.into_iter().map(|(_, v)| v).collect()
    }
}

/// An ordered parameter list.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    /// Validate and build a signature.
    ///
    /// Kinds must appear in canonical order, names must be unique, there is
    /// at most one variadic of each kind, and a positional parameter without
    /// a default may not follow one with a default.
    pub fn new(params: Vec<Parameter>) -> Result<Self, SignatureError> {
        let mut seen = FxHashSet::default();
        let mut last_kind = ParamKind::PositionalOnly;
        let mut saw_default = false;

        for param in &params {
            if !seen.insert(param.name) {
                return Err(SignatureError::DuplicateParameter { name: param.name });
            }
            let repeated_variadic = param.kind == last_kind
                && matches!(param.kind, ParamKind::VarPositional | ParamKind::VarKeyword);
            if param.kind < last_kind || repeated_variadic {
                return Err(SignatureError::ParameterOrder { name: param.name });
            }
            last_kind = param.kind;

            if param.is_positional() {
                if param.default.is_some() {
                    saw_default = true;
                } else if saw_default {
                    return Err(SignatureError::DefaultOrder { name: param.name });
                }
            }
        }

        Ok(Signature { params })
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Names of parameters that are not variadic.
    pub fn named_params(&self) -> impl Iterator<Item = Name> + '_ {
        self.params
            .iter()
            .filter(|p| !matches!(p.kind, ParamKind::VarPositional | ParamKind::VarKeyword))
            .map(|p| p.name)
    }

    fn has_kind(&self, kind: ParamKind) -> bool {
        self.params.iter().any(|p| p.kind == kind)
    }

    /// Bind `args`, applying defaults.
    pub fn bind(&self, args: CallArgs) -> Result<BoundArguments, SignatureError> {
        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        let mut bound = BoundArguments::default();

        let positional_params: Vec<usize> = self
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_positional())
            .map(|(i, _)| i)
            .collect();

        let found = args.positional.len();
        for (i, value) in args.positional.into_iter().enumerate() {
            if let Some(&slot) = positional_params.get(i) {
                slots[slot] = Some(value);
            } else if self.has_kind(ParamKind::VarPositional) {
                bound.var_positional.push(value);
            } else {
                return Err(SignatureError::TooManyPositional {
                    expected: positional_params.len(),
                    found,
                });
            }
        }

        let var_keyword = self.has_kind(ParamKind::VarKeyword);
        for (name, value) in args.keywords {
            let slot = self.params.iter().position(|p| p.name == name);
            match slot {
                Some(slot) if self.params[slot].accepts_keyword() => {
                    if slots[slot].is_some() {
                        return Err(SignatureError::MultipleValues { name });
                    }
                    slots[slot] = Some(value);
                }
                _ if var_keyword => {
                    if bound.var_keyword.iter().any(|(n, _)| *n == name) {
                        return Err(SignatureError::MultipleValues { name });
                    }
                    bound.var_keyword.push((name, value));
                }
                Some(slot) if self.params[slot].kind == ParamKind::PositionalOnly => {
                    return Err(SignatureError::PositionalOnlyAsKeyword { name });
                }
                _ => return Err(SignatureError::UnexpectedKeyword { name }),
            }
        }

        for (param, slot) in self.params.iter().zip(slots) {
            if matches!(param.kind, ParamKind::VarPositional | ParamKind::VarKeyword) {
                continue;
            }
            let value = match slot.or_else(|| param.default.clone()) {
                Some(value) => value,
                None => return Err(SignatureError::MissingArgument { name: param.name }),
            };
            bound.named.push((param.name, value));
        }

        Ok(bound)
    }
}
