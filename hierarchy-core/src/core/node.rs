//! A single element of a hierarchy and the identifiers that address it.

use crate::{HierarchyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Stable identity of one hierarchy (document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyId(Uuid);

impl HierarchyId {
    pub(crate) fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HierarchyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle of a node: the owning document plus a serial unique within it.
///
/// Handles are never reused, so a handle held across a delete simply stops
/// resolving instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    document: HierarchyId,
    serial: u64,
}

impl NodeId {
    pub(crate) fn new(document: HierarchyId, serial: u64) -> Self {
        Self { document, serial }
    }

    /// The document this handle was issued by.
    #[must_use]
    pub fn document(&self) -> HierarchyId {
        self.document
    }

    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}@{}", self.serial, self.document)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
}

/// One element of the forest.
///
/// `parent` and `children` are only ever changed by the tree actions on
/// [`Hierarchy`](crate::Hierarchy), which keep them symmetric. Name and
/// fields are free for callers to edit through
/// [`Hierarchy::node_mut`](crate::Hierarchy::node_mut).
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    pub name: String,
    node_type: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    owner: Option<HierarchyId>,
    created_at: i64,
    modified_at: i64,
}

impl Node {
    /// Builds an unowned node. Only the type registry and the duplicate
    /// action construct nodes; both hand them to a hierarchy immediately.
    pub(crate) fn new(
        id: NodeId,
        name: String,
        node_type: String,
        fields: BTreeMap<String, FieldValue>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id,
            name,
            node_type,
            fields,
            parent: None,
            children: Vec::new(),
            owner: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Binds this node to its owning hierarchy.
    ///
    /// Ownership is immutable once set: a second call logs a warning and
    /// leaves the node untouched.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::AlreadyInitialized`] if an owner is already set.
    pub fn init_owner(&mut self, owner: HierarchyId) -> Result<()> {
        if let Some(current) = self.owner {
            log::warn!(
                "node {} is already owned by {current}; ignoring re-initialization with {owner}",
                self.id
            );
            return Err(HierarchyError::AlreadyInitialized);
        }
        self.owner = Some(owner);
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> Option<HierarchyId> {
        self.owner
    }

    /// The registered node type this node was instantiated from.
    #[must_use]
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children; index 0 is the first (top) child.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the child at `index`, or `None` when out of range.
    #[must_use]
    pub fn child_at(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    /// Returns the position of `child` among this node's children.
    #[must_use]
    pub fn child_index(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Sets a payload field and bumps `modified_at`.
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
        self.touch();
    }

    #[must_use]
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    #[must_use]
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    pub(crate) fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().timestamp();
    }

    /// Copies the payload fields into a fresh, unowned node with no links.
    pub(crate) fn structural_copy(&self, id: NodeId, name: String) -> Node {
        Node::new(id, name, self.node_type.clone(), self.fields.clone())
    }
}
