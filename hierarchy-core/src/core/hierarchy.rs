//! The document: a forest of nodes, its root order, and parent validation.

use crate::{
    ActionKind, HierarchyConfig, HierarchyError, HierarchyId, MutationObserver, Node, NodeId,
    NodeTypeRegistry, NoopObserver, ObjectRef, Result,
};
use std::collections::{HashMap, HashSet};

/// Domain-specific rule consulted by every parent assignment.
///
/// Runs after the structural checks pass, including for detaching
/// (`new_parent == None`). Returning `false` rejects the edit.
pub trait ParentValidator {
    fn allows(&self, hierarchy: &Hierarchy, node: &Node, new_parent: Option<&Node>) -> bool;
}

/// Validator that accepts everything the structural checks accept.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl ParentValidator for AllowAll {
    fn allows(&self, _hierarchy: &Hierarchy, _node: &Node, _new_parent: Option<&Node>) -> bool {
        true
    }
}

impl<F> ParentValidator for F
where
    F: Fn(&Hierarchy, &Node, Option<&Node>) -> bool,
{
    fn allows(&self, hierarchy: &Hierarchy, node: &Node, new_parent: Option<&Node>) -> bool {
        self(hierarchy, node, new_parent)
    }
}

/// Payload of the tree-refresh notification.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRefresh {
    /// The action that changed the tree, or `None` for a manual refresh.
    pub action: Option<ActionKind>,
    /// Nodes created, moved or removed by the action.
    pub affected: Vec<NodeId>,
}

type RefreshListener = Box<dyn FnMut(&TreeRefresh)>;

/// A document owning a forest of [`Node`]s.
///
/// `nodes` is the flat list of every node the document owns; the order of
/// its parentless entries is the root order. Sibling order lives in each
/// node's `children`. All structural edits go through the tree actions,
/// which keep both orders and the parent links consistent.
pub struct Hierarchy {
    id: HierarchyId,
    name: String,
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) arena: HashMap<NodeId, Node>,
    pub(crate) registry: NodeTypeRegistry,
    pub(crate) config: HierarchyConfig,
    pub(crate) observer: Box<dyn MutationObserver>,
    validator: Box<dyn ParentValidator>,
    listeners: Vec<RefreshListener>,
    next_serial: u64,
    /// Next counter to try per base name; names freed later are not reused.
    name_counters: HashMap<String, usize>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new("Untitled", NodeTypeRegistry::default())
    }
}

impl Hierarchy {
    /// Creates an empty document that instantiates nodes from `registry`.
    pub fn new(name: impl Into<String>, registry: NodeTypeRegistry) -> Self {
        Self::with_config(name, registry, HierarchyConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        registry: NodeTypeRegistry,
        config: HierarchyConfig,
    ) -> Self {
        Self {
            id: HierarchyId::new_random(),
            name: name.into(),
            nodes: Vec::new(),
            arena: HashMap::new(),
            registry,
            config,
            observer: Box::new(NoopObserver),
            validator: Box::new(AllowAll),
            listeners: Vec::new(),
            next_serial: 1,
            name_counters: HashMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> HierarchyId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NodeTypeRegistry {
        &mut self.registry
    }

    /// Installs the custom parent rule, replacing the previous one.
    pub fn set_validator(&mut self, validator: impl ParentValidator + 'static) {
        self.validator = Box::new(validator);
    }

    /// Installs the host integration observer, replacing the previous one.
    pub fn set_observer(&mut self, observer: impl MutationObserver + 'static) {
        self.observer = Box::new(observer);
    }

    /// Registers a listener fired after every structural mutation.
    pub fn on_tree_refresh_required(&mut self, listener: impl FnMut(&TreeRefresh) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Asks listeners to rebuild without any mutation, e.g. after a host undo.
    pub fn update_tree(&mut self) {
        self.notify(TreeRefresh {
            action: None,
            affected: Vec::new(),
        });
    }

    // ── queries ──────────────────────────────────────────────────

    /// Every owned node, in document order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(&id)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(&id)
    }

    /// Mutable access for editing a node's name and fields.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(&id)
    }

    /// # Errors
    ///
    /// Returns [`HierarchyError::NodeNotFound`] if `id` is not owned by this document.
    pub fn get_node(&self, id: NodeId) -> Result<&Node> {
        self.arena.get(&id).ok_or(HierarchyError::NodeNotFound(id))
    }

    /// Parentless nodes, in root order.
    pub fn root_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .copied()
            .filter(|id| self.arena.get(id).is_some_and(Node::is_root))
            .collect()
    }

    /// Parentless nodes of `node_type`, in root order.
    pub fn root_nodes_of_type(&self, node_type: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .copied()
            .filter(|id| {
                self.arena
                    .get(id)
                    .is_some_and(|n| n.is_root() && n.node_type() == node_type)
            })
            .collect()
    }

    /// Direct children of `id` whose type is `node_type`, in sibling order.
    pub fn children_of_type(&self, id: NodeId, node_type: &str) -> Vec<NodeId> {
        let Some(node) = self.arena.get(&id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .copied()
            .filter(|c| self.arena.get(c).is_some_and(|n| n.node_type() == node_type))
            .collect()
    }

    /// Position of `id` among its siblings, or within root order for roots.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let node = self.arena.get(&id)?;
        match node.parent {
            Some(parent) => self.arena.get(&parent)?.child_index(id),
            None => self.root_nodes().iter().position(|r| *r == id),
        }
    }

    /// The topmost ancestor of `id` (itself when it is a root).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.arena.get(&id)?;
        let mut steps = 0;
        while let Some(parent) = current.parent {
            current = self.arena.get(&parent)?;
            steps += 1;
            if steps > self.arena.len() {
                return None;
            }
        }
        Some(current.id())
    }

    /// All descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.arena.get(&id) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.arena.get(&current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    // ── validation ───────────────────────────────────────────────

    /// Whether `parent` appears on `node`'s ancestor chain.
    ///
    /// False when either is absent; a node is never its own ancestor.
    #[must_use]
    pub fn node_is_child_of_parent(&self, node: NodeId, parent: NodeId) -> bool {
        let Some(mut current) = self.arena.get(&node).and_then(|n| n.parent) else {
            return false;
        };
        if !self.arena.contains_key(&parent) {
            return false;
        }
        // Bounded walk: a well-formed forest never needs more steps than nodes.
        for _ in 0..=self.arena.len() {
            if current == parent {
                return true;
            }
            match self.arena.get(&current).and_then(|n| n.parent) {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }

    /// Returns true if `node` may be parented to `new_parent` (`None` = detach).
    #[must_use]
    pub fn validate_parent_action(&self, node: NodeId, new_parent: Option<NodeId>) -> bool {
        self.check_parent_action(node, new_parent).is_ok()
    }

    /// Like [`validate_parent_action`](Self::validate_parent_action), but
    /// reports why the edit is refused. Has no side effects.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::NodeNotFound`] if `node` (or a same-document
    ///   `new_parent`) is not in this document.
    /// - [`HierarchyError::CrossDocument`] if `new_parent` belongs to another document.
    /// - [`HierarchyError::InvalidParent`] for self-parenting, cycles, type
    ///   rules and the custom validator.
    pub fn check_parent_action(&self, node: NodeId, new_parent: Option<NodeId>) -> Result<()> {
        let child = self.get_node(node)?;
        self.check_placement(child, new_parent)
    }

    /// The checks of [`check_parent_action`](Self::check_parent_action) for a
    /// node that may not be stored yet, such as a fresh copy.
    pub(crate) fn check_placement(&self, child: &Node, new_parent: Option<NodeId>) -> Result<()> {
        let node = child.id();
        let parent = match new_parent {
            None => None,
            Some(parent_id) => {
                if parent_id == node {
                    return Err(HierarchyError::InvalidParent(
                        "A node cannot be its own parent".to_string(),
                    ));
                }
                if parent_id.document() != self.id {
                    return Err(HierarchyError::CrossDocument {
                        node,
                        parent: parent_id,
                    });
                }
                let parent = self.get_node(parent_id)?;
                if parent.owner() != child.owner() {
                    return Err(HierarchyError::CrossDocument {
                        node,
                        parent: parent_id,
                    });
                }
                if self.node_is_child_of_parent(parent_id, node) {
                    return Err(HierarchyError::InvalidParent(
                        "Move would create a cycle".to_string(),
                    ));
                }
                if !self
                    .registry
                    .is_assignable(parent.node_type(), child.node_type())
                {
                    return Err(HierarchyError::InvalidParent(format!(
                        "Node type '{}' is not allowed under '{}'",
                        child.node_type(),
                        parent.node_type()
                    )));
                }
                Some(parent)
            }
        };

        if !self.validator.allows(self, child, parent) {
            return Err(HierarchyError::InvalidParent(format!(
                "'{}' was rejected by the document's parent rules",
                child.name
            )));
        }
        Ok(())
    }

    /// Lists every broken invariant; empty for a consistent document.
    pub fn integrity_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.nodes.len() != self.arena.len() {
            problems.push(format!(
                "node list has {} entries but {} nodes are stored",
                self.nodes.len(),
                self.arena.len()
            ));
        }
        let mut seen = HashSet::new();
        for id in &self.nodes {
            if !seen.insert(*id) {
                problems.push(format!("{id} appears twice in the node list"));
            }
            let Some(node) = self.arena.get(id) else {
                problems.push(format!("{id} is listed but not stored"));
                continue;
            };
            if node.owner() != Some(self.id) {
                problems.push(format!("{id} is not owned by this document"));
            }
            if let Some(parent) = node.parent {
                let count = self
                    .arena
                    .get(&parent)
                    .map_or(0, |p| p.children.iter().filter(|c| **c == *id).count());
                if count != 1 {
                    problems.push(format!("{id} appears {count} times in its parent's children"));
                }
                if self.node_is_child_of_parent(parent, *id) || parent == *id {
                    problems.push(format!("{id} is its own ancestor"));
                }
            }
            for child in &node.children {
                if self.arena.get(child).and_then(|c| c.parent) != Some(*id) {
                    problems.push(format!("{child} is listed under {id} but points elsewhere"));
                }
            }
        }
        problems
    }

    // ── crate-internal plumbing for the actions ──────────────────

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::new(self.id, self.next_serial);
        self.next_serial += 1;
        id
    }

    /// `base` if no node carries it yet, otherwise `base-2`, `base-3`, ...
    pub(crate) fn unique_name(&mut self, base: &str) -> String {
        let taken: HashSet<&str> = self.arena.values().map(|n| n.name.as_str()).collect();
        if !taken.contains(base) {
            return base.to_string();
        }
        let mut counter = self.name_counters.get(base).copied().unwrap_or(2);
        let name = loop {
            let candidate = format!("{base}{}{counter}", self.config.name_separator);
            if !taken.contains(candidate.as_str()) {
                break candidate;
            }
            counter += 1;
        };
        self.name_counters.insert(base.to_string(), counter + 1);
        name
    }

    /// Filters `objects` down to the ones the observer tracks.
    fn persisted(&self, objects: &[ObjectRef]) -> Vec<ObjectRef> {
        let mut seen = HashSet::with_capacity(objects.len());
        objects
            .iter()
            .copied()
            .filter(|object| seen.insert(*object) && self.observer.is_persisted(*object))
            .collect()
    }

    /// Snapshot hook: call before mutating `objects`.
    pub(crate) fn begin_mutation(&mut self, action: ActionKind, objects: &[ObjectRef]) {
        let tracked = self.persisted(objects);
        self.observer.before_mutate(action, &tracked);
    }

    /// Dirty hook plus refresh notification: call after mutating `objects`.
    pub(crate) fn finish_mutation(
        &mut self,
        action: ActionKind,
        objects: &[ObjectRef],
        affected: Vec<NodeId>,
    ) {
        let tracked = self.persisted(objects);
        self.observer.after_mutate(action, &tracked);
        log::debug!("{action} applied to {} node(s) in '{}'", affected.len(), self.name);
        self.notify(TreeRefresh {
            action: Some(action),
            affected,
        });
    }

    fn notify(&mut self, refresh: TreeRefresh) {
        for listener in &mut self.listeners {
            listener(&refresh);
        }
    }
}
