//! Properties whose accessors dispatch on the instance.

use std::sync::Arc;

use sd_ir::Name;
use sd_patterns::{MatchBindings, Matchable};
use sd_types::{AttributeError, PropertyMember, Value};

use crate::errors::{Accessor, DispatchError};
use crate::template::{MatchTemplate, Matcher};

pub type GetHandler = Arc<dyn Fn(&MatchBindings) -> Result<Value, DispatchError> + Send + Sync>;
pub type AccessHandler = Arc<dyn Fn(&MatchBindings) -> Result<(), DispatchError> + Send + Sync>;

type Getter = Arc<dyn Fn(&Value) -> Result<Value, DispatchError> + Send + Sync>;
type Setter = Arc<dyn Fn(&Value, Value) -> Result<(), DispatchError> + Send + Sync>;
type Deleter = Arc<dyn Fn(&Value) -> Result<(), DispatchError> + Send + Sync>;

/// A property with three independent dispatch tables.
///
/// Each accessor consults its table first and falls back to the plain
/// getter, setter or deleter. Setter templates see the pair
/// `(instance, value)`.
#[derive(Clone)]
pub struct Property {
    name: Name,
    fget: Option<Getter>,
    fset: Option<Setter>,
    fdel: Option<Deleter>,
    get_table: MatchTemplate<GetHandler>,
    set_table: MatchTemplate<AccessHandler>,
    delete_table: MatchTemplate<AccessHandler>,
}

impl Property {
    pub fn new(name: &str) -> Self {
        let name = Name::intern(name);
        Property {
            name,
            fget: None,
            fset: None,
            fdel: None,
            get_table: MatchTemplate::new(name),
            set_table: MatchTemplate::new(name),
            delete_table: MatchTemplate::new(name),
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    /// A copy with the fallback getter replaced. Registered templates carry
    /// over.
    #[must_use]
    pub fn getter(
        &self,
        getter: impl Fn(&Value) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        Property {
            fget: Some(Arc::new(getter)),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn setter(
        &self,
        setter: impl Fn(&Value, Value) -> Result<(), DispatchError> + Send + Sync + 'static,
    ) -> Self {
        Property {
            fset: Some(Arc::new(setter)),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn deleter(
        &self,
        deleter: impl Fn(&Value) -> Result<(), DispatchError> + Send + Sync + 'static,
    ) -> Self {
        Property {
            fdel: Some(Arc::new(deleter)),
            ..self.clone()
        }
    }

    pub fn get_when(
        &self,
        instance: impl Into<Matcher>,
        handler: impl Fn(&MatchBindings) -> Result<Value, DispatchError> + Send + Sync + 'static,
    ) -> Result<(), DispatchError> {
        self.get_table.add(instance.into(), Arc::new(handler))
    }

    pub fn set_when(
        &self,
        instance: impl Into<Matcher>,
        value: impl Into<Matcher>,
        handler: impl Fn(&MatchBindings) -> Result<(), DispatchError> + Send + Sync + 'static,
    ) -> Result<(), DispatchError> {
        let pair = Matcher::combine(vec![instance.into(), value.into()], Value::tuple);
        self.set_table.add(pair, Arc::new(handler))
    }

    pub fn delete_when(
        &self,
        instance: impl Into<Matcher>,
        handler: impl Fn(&MatchBindings) -> Result<(), DispatchError> + Send + Sync + 'static,
    ) -> Result<(), DispatchError> {
        self.delete_table.add(instance.into(), Arc::new(handler))
    }

    fn missing(&self, accessor: Accessor) -> DispatchError {
        DispatchError::MissingAccessor {
            name: self.name,
            accessor,
        }
    }

    /// Find the first matching handler, along with the bindings it matched.
    fn select<H: Clone>(
        table: &MatchTemplate<H>,
        subject: Value,
        instance: &Value,
    ) -> Result<Option<(H, MatchBindings)>, DispatchError> {
        let owner = instance.adt_owner();
        let mut subject = Matchable::new(subject);
        Ok(table
            .lookup(&mut subject, owner.as_ref())?
            .map(|handler| (handler, subject.take_bindings().unwrap_or_default())))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(property = %self.name))]
    pub fn get(&self, instance: &Value) -> Result<Value, DispatchError> {
        if let Some((handler, bindings)) =
            Self::select(&self.get_table, instance.clone(), instance)?
        {
            return handler(&bindings);
        }
        match &self.fget {
            Some(getter) => getter(instance),
            None => Err(self.missing(Accessor::Get)),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(property = %self.name))]
    pub fn set(&self, instance: &Value, value: Value) -> Result<(), DispatchError> {
        let pair = Value::tuple(vec![instance.clone(), value.clone()]);
        if let Some((handler, bindings)) = Self::select(&self.set_table, pair, instance)? {
            return handler(&bindings);
        }
        match &self.fset {
            Some(setter) => setter(instance, value),
            None => Err(self.missing(Accessor::Set)),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(property = %self.name))]
    pub fn delete(&self, instance: &Value) -> Result<(), DispatchError> {
        if let Some((handler, bindings)) =
            Self::select(&self.delete_table, instance.clone(), instance)?
        {
            return handler(&bindings);
        }
        match &self.fdel {
            Some(deleter) => deleter(instance),
            None => Err(self.missing(Accessor::Delete)),
        }
    }
}

impl PropertyMember for Property {
    fn get(&self, instance: &Value) -> Result<Value, AttributeError> {
        Ok(Property::get(self, instance)?)
    }

    fn set(&self, instance: &Value, value: Value) -> Result<(), AttributeError> {
        Ok(Property::set(self, instance, value)?)
    }

    fn delete(&self, instance: &Value) -> Result<(), AttributeError> {
        Ok(Property::delete(self, instance)?)
    }
}
