//! Ordered (template, handler) tables.
//!
//! A table keeps its entries in registration order and hands out the first
//! one whose template matches. Entries may be placeholders: functions of the
//! owning type that produce the real template. A table holding any
//! placeholder is *abstract* and can only be consulted for a concrete owner.
//!
//! # Caching
//!
//! Resolved entry lists are cached per owner id. Filling is idempotent, and
//! registering a new entry appends its resolution to every cached list.
//! Placeholders run outside the table lock, so they may consult the table
//! themselves.
//!
//! Owners are often the types the table is attached to, and a resolved
//! template often mentions its owner. The cache therefore holds owners and
//! templates [detached](sd_types::Detached), with every type handle weak,
//! and rebuilds the templates on lookup. Lists whose owner was dropped are
//! pruned on the next `add`.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use sd_ir::{Name, TypeId};
use sd_patterns::Matchable;
use sd_types::{ConstructionError, Detached, TypeRef, Value, WeakTypeRef};

use crate::errors::DispatchError;

type PlaceholderFn = dyn Fn(&TypeRef) -> Result<Value, ConstructionError> + Send + Sync;

/// A template written against an owning type that is not known yet.
#[derive(Clone)]
pub struct Placeholder {
    func: Arc<PlaceholderFn>,
}

impl Placeholder {
    pub fn new(
        func: impl Fn(&TypeRef) -> Result<Value, ConstructionError> + Send + Sync + 'static,
    ) -> Self {
        Placeholder {
            func: Arc::new(func),
        }
    }

    pub fn resolve(&self, owner: &TypeRef) -> Result<Value, ConstructionError> {
        (self.func)(owner)
    }
}

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Placeholder")
    }
}

/// A registered template: concrete, or resolved per owner.
#[derive(Clone, Debug)]
pub enum Matcher {
    Template(Value),
    Placeholder(Placeholder),
}

impl Matcher {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Matcher::Placeholder(_))
    }

    /// The template to use for `owner`.
    pub fn resolve(&self, owner: &TypeRef) -> Result<Value, ConstructionError> {
        match self {
            Matcher::Template(template) => Ok(template.clone()),
            Matcher::Placeholder(placeholder) => placeholder.resolve(owner),
        }
    }

    /// Combine several matchers into one template built by `build`.
    ///
    /// The result is concrete when every part is; otherwise it is a
    /// placeholder that resolves each part before building.
    pub fn combine(
        parts: Vec<Matcher>,
        build: impl Fn(Vec<Value>) -> Value + Send + Sync + 'static,
    ) -> Matcher {
        if !parts.iter().any(Matcher::is_placeholder) {
            let values = parts
                .into_iter()
                .filter_map(|part| match part {
                    Matcher::Template(template) => Some(template),
                    Matcher::Placeholder(_) => None,
                })
                .collect();
            return Matcher::Template(build(values));
        }
        Matcher::Placeholder(Placeholder::new(move |owner| {
            let values = parts
                .iter()
                .map(|part| part.resolve(owner))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(build(values))
        }))
    }
}

impl From<Value> for Matcher {
    fn from(template: Value) -> Self {
        Matcher::Template(template)
    }
}

impl From<Placeholder> for Matcher {
    fn from(placeholder: Placeholder) -> Self {
        Matcher::Placeholder(placeholder)
    }
}

struct Resolved<H> {
    owner: Option<WeakTypeRef>,
    entries: Vec<(Detached, H)>,
}

struct TableState<H> {
    entries: Vec<(Matcher, H)>,
    is_abstract: bool,
    cache: FxHashMap<Option<TypeId>, Resolved<H>>,
}

/// The dispatch table behind a function, method or property accessor.
pub struct MatchTemplate<H> {
    name: Name,
    state: RwLock<TableState<H>>,
}

fn resolve_for(
    table: Name,
    matcher: &Matcher,
    owner: Option<&TypeRef>,
) -> Result<Value, DispatchError> {
    let template = match (matcher, owner) {
        (Matcher::Template(template), _) => template.clone(),
        (Matcher::Placeholder(placeholder), Some(owner)) => placeholder.resolve(owner)?,
        (Matcher::Placeholder(_), None) => {
            return Err(DispatchError::AbstractWithoutOwner { name: table })
        }
    };
    sd_patterns::names(&template)?;
    Ok(template)
}

/// Rebuild cached entries; one whose type was dropped cannot match any live
/// value and is left out.
fn attach<H>(entries: Vec<(Detached, H)>) -> Vec<(Value, H)> {
    entries
        .into_iter()
        .filter_map(|(template, handler)| template.attach().map(|template| (template, handler)))
        .collect()
}

fn is_dropped(owner: Option<&WeakTypeRef>) -> bool {
    owner.is_some_and(|weak| weak.upgrade().is_none())
}

impl<H: Clone> MatchTemplate<H> {
    pub fn new(name: Name) -> Self {
        MatchTemplate {
            name,
            state: RwLock::new(TableState {
                entries: Vec::new(),
                is_abstract: false,
                cache: FxHashMap::default(),
            }),
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Whether any placeholder has been registered.
    pub fn is_abstract(&self) -> bool {
        self.state.read().is_abstract
    }

    /// Register `matcher` after every existing entry.
    ///
    /// Concrete templates are checked for duplicate names immediately;
    /// placeholders are checked as they are resolved.
    pub fn add(&self, matcher: Matcher, handler: H) -> Result<(), DispatchError> {
        if let Matcher::Template(template) = &matcher {
            sd_patterns::names(template)?;
        }
        let placeholder = matcher.is_placeholder();

        let owners: Vec<(Option<TypeId>, Option<TypeRef>)> = {
            let state = self.state.read();
            state
                .cache
                .iter()
                .filter(|(key, _)| !(placeholder && key.is_none()))
                .filter_map(|(key, resolved)| match &resolved.owner {
                    Some(weak) => weak.upgrade().map(|owner| (*key, Some(owner))),
                    None => Some((*key, None)),
                })
                .collect()
        };
        let mut additions = FxHashMap::default();
        for (key, owner) in &owners {
            let template = resolve_for(self.name, &matcher, owner.as_ref())?;
            additions.insert(*key, template.detach());
        }

        let mut state = self.state.write();
        let position = state.entries.len();
        // A list filled while the additions were resolved has no addition
        // for this entry; it is dropped and refilled on the next lookup.
        state.cache.retain(|key, resolved| {
            resolved.entries.len() == position
                && additions.contains_key(key)
                && !is_dropped(resolved.owner.as_ref())
        });
        for (key, template) in additions {
            if let Some(resolved) = state.cache.get_mut(&key) {
                resolved.entries.push((template, handler.clone()));
            }
        }
        if placeholder {
            state.is_abstract = true;
        }
        state.entries.push((matcher, handler));
        Ok(())
    }

    /// The first handler whose template matches `subject`.
    ///
    /// On success `subject` holds the bindings of the winning template.
    /// `owner` is needed only when the table is abstract.
    pub fn lookup(
        &self,
        subject: &mut Matchable,
        owner: Option<&TypeRef>,
    ) -> Result<Option<H>, DispatchError> {
        for (index, (template, handler)) in self.resolved(owner)?.into_iter().enumerate() {
            if subject.matches(&template)? {
                tracing::debug!(table = %self.name, index, "dispatch matched");
                return Ok(Some(handler));
            }
        }
        tracing::trace!(table = %self.name, "no template matched");
        Ok(None)
    }

    /// The resolved entries for `owner`, filling the cache on a miss.
    ///
    /// Placeholders run with no lock held. If entries were registered in
    /// the meantime, only those are resolved on the next round.
    fn resolved(&self, owner: Option<&TypeRef>) -> Result<Vec<(Value, H)>, DispatchError> {
        let mut fresh: Vec<(Detached, H)> = Vec::new();
        let mut fresh_abstract = None;
        loop {
            let (key, owner, pending) = {
                let state = self.state.read();
                let owner = if state.is_abstract {
                    Some(owner.ok_or(DispatchError::AbstractWithoutOwner { name: self.name })?)
                } else {
                    None
                };
                let key = owner.map(TypeRef::id);
                if let Some(resolved) = state.cache.get(&key) {
                    let entries = resolved.entries.clone();
                    drop(state);
                    return Ok(attach(entries));
                }
                if fresh_abstract != Some(state.is_abstract) {
                    fresh.clear();
                    fresh_abstract = Some(state.is_abstract);
                }
                let pending = state.entries.get(fresh.len()..).unwrap_or_default().to_vec();
                (key, owner, pending)
            };

            for (matcher, handler) in pending {
                let template = resolve_for(self.name, &matcher, owner)?;
                fresh.push((template.detach(), handler));
            }

            let mut state = self.state.write();
            if let Some(resolved) = state.cache.get(&key) {
                let entries = resolved.entries.clone();
                drop(state);
                return Ok(attach(entries));
            }
            if fresh_abstract == Some(state.is_abstract) && fresh.len() == state.entries.len() {
                tracing::debug!(
                    table = %self.name,
                    owner = ?owner,
                    entries = fresh.len(),
                    "filled placeholder cache"
                );
                state.cache.insert(
                    key,
                    Resolved {
                        owner: owner.map(TypeRef::downgrade),
                        entries: fresh.clone(),
                    },
                );
                drop(state);
                return Ok(attach(fresh));
            }
        }
    }
}

impl<H: Clone> Clone for MatchTemplate<H> {
    /// Copy the registered entries; the copy starts with an empty cache.
    fn clone(&self) -> Self {
        let state = self.state.read();
        MatchTemplate {
            name: self.name,
            state: RwLock::new(TableState {
                entries: state.entries.clone(),
                is_abstract: state.is_abstract,
                cache: FxHashMap::default(),
            }),
        }
    }
}

impl<H> fmt::Debug for MatchTemplate<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("MatchTemplate")
            .field("name", &self.name)
            .field("entries", &state.entries.len())
            .field("abstract", &state.is_abstract)
            .finish_non_exhaustive()
    }
}
