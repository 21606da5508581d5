//! The compound-match capability.
//!
//! A compound template node knows how to break itself, and any value matched
//! against it, into parallel lists of sub-items. The matcher zips the two
//! lists into new (template, value) pairs.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::Value;

/// One destructuring step did not match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchFailure;

/// Sub-items produced by one destructuring step, in push order.
///
/// The matcher pushes them onto a stack, so the last item is visited first.
/// Nodes therefore emit their children reversed.
pub type Items = SmallVec<[Value; 4]>;

/// Which side of a (template, value) pair is being destructured.
#[derive(Copy, Clone, Debug)]
pub enum Subject<'a> {
    /// The node itself, in template position, or a value that is the very
    /// same node.
    Template,
    /// Any other value.
    Value(&'a Value),
}

/// A template node that matches by splitting into sub-pairs.
pub trait CompoundMatch: fmt::Debug + Send + Sync + Any {
    /// Split `subject` into sub-items, or fail.
    fn destructure(&self, subject: Subject<'_>) -> Result<Items, MatchFailure>;

    /// Short kind name used in messages.
    fn kind(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// The values held by this node.
    ///
    /// Nodes that return `None` are kept whole by [`Value::detach`], along
    /// with any type handles inside them.
    fn parts(&self) -> Option<NodeParts> {
        None
    }
}

/// Rebuilds a node from its values, in the order [`NodeParts::values`]
/// lists them.
pub type Rebuild = Arc<dyn Fn(Vec<Value>) -> Value + Send + Sync>;

/// The values a node holds, and how to put the node back together.
pub struct NodeParts {
    pub values: Vec<Value>,
    pub rebuild: Rebuild,
}

impl NodeParts {
    pub fn new(
        values: Vec<Value>,
        rebuild: impl Fn(Vec<Value>) -> Value + Send + Sync + 'static,
    ) -> Self {
        NodeParts {
            values,
            rebuild: Arc::new(rebuild),
        }
    }
}
