//! Callables that dispatch on their named arguments.
//!
//! A call is bound to the declared [`Signature`] with defaults applied.
//! Variadic positional and keyword values are set aside; the remaining
//! named values form a string-keyed dict that every template is matched
//! against. Templates registered with `when` are exhaustive dict patterns
//! over the parameter names, so a template must mention every named
//! parameter it cares about and no others.

use std::sync::Arc;

use sd_ir::Name;
use sd_patterns::{DictPattern, MatchBindings, Matchable};
use sd_types::{
    AttributeError, BoundArguments, CallArgs, MethodMember, Signature, SignatureError, TypeRef,
    Value,
};

use crate::errors::DispatchError;
use crate::template::{MatchTemplate, Matcher};

/// What a handler receives: the match bindings, then any variadic keyword
/// values, plus the variadic positional values.
#[derive(Clone, Debug, Default)]
pub struct HandlerArgs {
    pub named: Vec<(Name, Value)>,
    pub var_positional: Vec<Value>,
}

impl HandlerArgs {
    fn new(
        bindings: MatchBindings,
        var_positional: Vec<Value>,
        var_keyword: Vec<(Name, Value)>,
    ) -> Result<Self, DispatchError> {
        let mut named: Vec<(Name, Value)> = Vec::with_capacity(bindings.len() + var_keyword.len());
        for (name, value) in bindings {
            if var_keyword.iter().any(|(kw, _)| *kw == name) {
                return Err(DispatchError::DuplicateArgument { name });
            }
            named.push((name, value));
        }
        named.extend(var_keyword);
        Ok(HandlerArgs {
            named,
            var_positional,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = Name::intern(name);
        self.named.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Like [`get`](Self::get), but a missing name is an error.
    pub fn arg(&self, name: &str) -> Result<&Value, DispatchError> {
        self.get(name).ok_or_else(|| {
            DispatchError::Signature(SignatureError::MissingArgument {
                name: Name::intern(name),
            })
        })
    }
}

pub type Handler = Arc<dyn Fn(HandlerArgs) -> Result<Value, DispatchError> + Send + Sync>;

/// Called with the original arguments when no template matches.
pub type Fallback = Arc<dyn Fn(CallArgs) -> Result<Value, DispatchError> + Send + Sync>;

fn kwargs_matcher<'a, M: Into<Matcher>>(kwargs: impl IntoIterator<Item = (&'a str, M)>) -> Matcher {
    let (keys, parts): (Vec<Name>, Vec<Matcher>) = kwargs
        .into_iter()
        .map(|(name, matcher)| (Name::intern(name), matcher.into()))
        .unzip();
    Matcher::combine(parts, move |values| {
        DictPattern::new(
            keys.iter()
                .zip(values)
                .map(|(key, value)| (Value::string(key.as_str()), value)),
            true,
        )
    })
}

/// A function whose body is chosen by matching its arguments.
///
/// ```text
/// let f = Function::new("area", Signature::new(vec![Parameter::positional("shape")])?);
/// f.when([("shape", circle_template)], |args| ...)?;
/// f.call(CallArgs::positional(vec![shape]))?;
/// ```
pub struct Function {
    name: Name,
    signature: Signature,
    fallback: Option<Fallback>,
    table: MatchTemplate<Handler>,
}

impl Function {
    pub fn new(name: &str, signature: Signature) -> Self {
        let name = Name::intern(name);
        Function {
            name,
            signature,
            fallback: None,
            table: MatchTemplate::new(name),
        }
    }

    /// The body run when nothing matches.
    #[must_use]
    pub fn with_fallback(
        mut self,
        fallback: impl Fn(CallArgs) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn table(&self) -> &MatchTemplate<Handler> {
        &self.table
    }

    /// Register `handler` for calls whose named arguments match `kwargs`.
    ///
    /// With no `kwargs` the entry matches only calls that bind no named
    /// parameter at all.
    pub fn when<'a, M: Into<Matcher>>(
        &self,
        kwargs: impl IntoIterator<Item = (&'a str, M)>,
        handler: impl Fn(HandlerArgs) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Result<(), DispatchError> {
        self.table.add(kwargs_matcher(kwargs), Arc::new(handler))
    }

    /// Call the function.
    ///
    /// When placeholders are registered, the owner used to resolve them is
    /// taken from the first positional argument.
    pub fn call(&self, args: CallArgs) -> Result<Value, DispatchError> {
        let owner = if self.table.is_abstract() {
            args.positional.first().and_then(Value::adt_owner)
        } else {
            None
        };
        self.dispatch(args, owner.as_ref())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %self.name))]
    fn dispatch(&self, args: CallArgs, owner: Option<&TypeRef>) -> Result<Value, DispatchError> {
        let BoundArguments {
            named,
            var_positional,
            var_keyword,
        } = self.signature.bind(args.clone())?;

        let mut subject = Matchable::new(Value::str_dict(
            named.iter().map(|(name, value)| (name.as_str(), value.clone())),
        ));
        match self.table.lookup(&mut subject, owner)? {
            Some(handler) => {
                let bindings = subject.take_bindings().unwrap_or_default();
                handler(HandlerArgs::new(bindings, var_positional, var_keyword)?)
            }
            None => match &self.fallback {
                Some(fallback) => fallback(args),
                None => Err(DispatchError::Exhausted { name: self.name }),
            },
        }
    }
}

impl MethodMember for Function {
    fn invoke(&self, instance: &Value, args: CallArgs) -> Result<Value, AttributeError> {
        Ok(self.call(args.prepend(instance.clone()))?)
    }
}

/// A method that receives its owning class as the first argument.
///
/// Placeholders always resolve against the class the method is called
/// through. Called on an instance, that is the instance's exact class, so a
/// variant sees its variant class rather than the sum.
pub struct ClassMethod {
    function: Function,
}

impl ClassMethod {
    /// `signature` includes the leading class parameter.
    pub fn new(name: &str, signature: Signature) -> Self {
        ClassMethod {
            function: Function::new(name, signature),
        }
    }

    /// The fallback receives the class as its first positional argument.
    #[must_use]
    pub fn with_fallback(
        mut self,
        fallback: impl Fn(CallArgs) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        self.function = self.function.with_fallback(fallback);
        self
    }

    pub fn name(&self) -> Name {
        self.function.name
    }

    pub fn when<'a, M: Into<Matcher>>(
        &self,
        kwargs: impl IntoIterator<Item = (&'a str, M)>,
        handler: impl Fn(HandlerArgs) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Result<(), DispatchError> {
        self.function.when(kwargs, handler)
    }

    pub fn call(&self, owner: &TypeRef, args: CallArgs) -> Result<Value, DispatchError> {
        self.function
            .dispatch(args.prepend(Value::class(owner.clone())), Some(owner))
    }
}

impl MethodMember for ClassMethod {
    fn invoke(&self, instance: &Value, args: CallArgs) -> Result<Value, AttributeError> {
        let owner = instance.class_of().or_else(|| match instance {
            Value::Class(ty) => Some(ty.clone()),
            _ => None,
        });
        match owner {
            Some(owner) => Ok(self.call(&owner, args)?),
            None => Ok(self.function.dispatch(args, None)?),
        }
    }
}

/// A dispatching function with no owner; placeholders are refused.
pub struct StaticMethod {
    function: Function,
}

impl StaticMethod {
    pub fn new(name: &str, signature: Signature) -> Self {
        StaticMethod {
            function: Function::new(name, signature),
        }
    }

    #[must_use]
    pub fn with_fallback(
        mut self,
        fallback: impl Fn(CallArgs) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        self.function = self.function.with_fallback(fallback);
        self
    }

    pub fn name(&self) -> Name {
        self.function.name
    }

    pub fn when<'a, M: Into<Matcher>>(
        &self,
        kwargs: impl IntoIterator<Item = (&'a str, M)>,
        handler: impl Fn(HandlerArgs) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Result<(), DispatchError> {
        let matcher = kwargs_matcher(kwargs);
        if matcher.is_placeholder() {
            return Err(DispatchError::PlaceholderNotAllowed {
                name: self.function.name,
            });
        }
        self.function.table.add(matcher, Arc::new(handler))
    }

    pub fn call(&self, args: CallArgs) -> Result<Value, DispatchError> {
        self.function.dispatch(args, None)
    }
}

impl MethodMember for StaticMethod {
    /// The instance is not passed on.
    fn invoke(&self, _instance: &Value, args: CallArgs) -> Result<Value, AttributeError> {
        Ok(self.call(args)?)
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
