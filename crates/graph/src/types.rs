use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Unique key for a function or method within one build.
///
/// Methods render as `ClassName.methodName`, free functions as the bare
/// name. If two declarations collapse to the same key, the later one wins;
/// the builder logs the collision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallableId(String);

impl CallableId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn qualified(class: &str, method: &str) -> Self {
        Self(format!("{class}.{method}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Enclosing class name, if this identifier is qualified.
    pub fn class_name(&self) -> Option<&str> {
        self.0.split_once('.').map(|(class, _)| class)
    }

    /// Final name segment: the method name for a qualified identifier, the
    /// whole name otherwise.
    pub fn final_segment(&self) -> &str {
        self.0.rsplit_once('.').map_or(&self.0, |(_, name)| name)
    }

    pub fn is_method(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for CallableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallableId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One entry in a callee list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalleeRef {
    /// Edge to a node present in the graph.
    Resolved { target: CallableId },

    /// Qualified call on a receiver whose type is not tracked; the method
    /// name is deliberately not retained.
    OpaqueReceiver { receiver: String },

    /// Bare or qualified name that never resolved to a node.
    Unresolved { name: String },
}

impl CalleeRef {
    /// The name this reference sorts and prints under.
    pub fn rendered(&self) -> &str {
        match self {
            CalleeRef::Resolved { target } => target.as_str(),
            CalleeRef::OpaqueReceiver { receiver } => receiver,
            CalleeRef::Unresolved { name } => name,
        }
    }

    pub fn resolved(&self) -> Option<&CallableId> {
        match self {
            CalleeRef::Resolved { target } => Some(target),
            _ => None,
        }
    }

    /// Tie-break between variants sharing a rendered name.
    pub(crate) fn variant_rank(&self) -> u8 {
        match self {
            CalleeRef::Resolved { .. } => 0,
            CalleeRef::OpaqueReceiver { .. } => 1,
            CalleeRef::Unresolved { .. } => 2,
        }
    }
}

impl fmt::Display for CalleeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalleeRef::Resolved { target } => write!(f, "{target}"),
            CalleeRef::OpaqueReceiver { receiver } => write!(f, "{receiver}.?"),
            CalleeRef::Unresolved { name } => write!(f, "{name}?"),
        }
    }
}

/// Adjacency mapping from callable identifier to its callee references.
///
/// Iteration order is the identifier order, and finalized callee lists are
/// sorted, so two builds over identical source serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraph {
    adjacency: BTreeMap<CallableId, Vec<CalleeRef>>,
    classes: BTreeSet<CallableId>,
}

impl CallGraph {
    pub fn contains(&self, id: &CallableId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.adjacency.contains_key(&CallableId::from(name))
    }

    pub fn is_class(&self, id: &CallableId) -> bool {
        self.classes.contains(id)
    }

    /// Callee list for a node; unknown identifiers read as empty.
    pub fn callees(&self, id: &CallableId) -> &[CalleeRef] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = &CallableId> {
        self.adjacency.keys()
    }

    pub fn classes(&self) -> impl Iterator<Item = &CallableId> {
        self.classes.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CallableId, &[CalleeRef])> {
        self.adjacency.iter().map(|(id, refs)| (id, refs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Register a callable, resetting its callee list. Returns true when a
    /// previous declaration is being overwritten.
    pub(crate) fn register_callable(&mut self, id: CallableId) -> bool {
        self.adjacency.insert(id, Vec::new()).is_some()
    }

    /// Register a class node; keeps an existing callee list intact.
    pub(crate) fn register_class(&mut self, id: CallableId) {
        self.adjacency.entry(id.clone()).or_default();
        self.classes.insert(id);
    }

    pub(crate) fn push_callee(&mut self, id: &CallableId, callee: CalleeRef) {
        if let Some(list) = self.adjacency.get_mut(id) {
            list.push(callee);
        }
    }

    pub(crate) fn remove_node(&mut self, id: &CallableId) {
        self.adjacency.remove(id);
        self.classes.remove(id);
    }

    pub(crate) fn node_ids(&self) -> Vec<CallableId> {
        self.adjacency.keys().cloned().collect()
    }

    pub(crate) fn lists_mut(&mut self) -> impl Iterator<Item = (&CallableId, &mut Vec<CalleeRef>)> {
        self.adjacency.iter_mut()
    }
}
