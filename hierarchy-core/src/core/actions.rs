//! Tree actions: the only entry points that change a hierarchy's structure.
//!
//! Every action validates before touching state, so a rejected request
//! leaves the document exactly as it was. Accepted actions are bracketed by
//! the installed [`MutationObserver`](crate::MutationObserver) and finish by
//! firing the tree-refresh notification.
//!
//! Three representations are kept in sync: the document's flat node list
//! (ownership and root order), each node's `parent` link, and each node's
//! `children` list (sibling order).

use crate::{ActionKind, DeleteResult, Hierarchy, HierarchyError, NodeId, ObjectRef, Result};
use std::collections::HashSet;

impl Hierarchy {
    /// Creates a node of `node_type`, optionally attached under `parent`.
    ///
    /// The node is always appended to the document as a root first. Parent
    /// assignment is best-effort: if it is refused the node stays a root, a
    /// warning is logged, and the new ID is still returned. Callers that need
    /// the parent must check [`Node::parent`](crate::Node::parent).
    ///
    /// Every created node gets a name unique within the document: the type
    /// name, then `<type>-2`, `<type>-3`, ...
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownNodeType`] if `node_type` is not registered.
    pub fn create_node(&mut self, node_type: &str, parent: Option<NodeId>) -> Result<NodeId> {
        if !self.registry.contains(node_type) {
            log::error!("type '{node_type}' is not a registered node type");
            return Err(HierarchyError::UnknownNodeType(node_type.to_string()));
        }

        let id = self.allocate_id();
        let mut node = self.registry.instantiate(node_type, id)?;
        node.name = self.unique_name(&node.name);
        node.init_owner(self.id())?;

        let parent = parent.and_then(|parent_id| match self.check_placement(&node, Some(parent_id)) {
            Ok(()) => Some(parent_id),
            Err(e) => {
                log::warn!("{id} created as a root, parent {parent_id} refused: {e}");
                None
            }
        });

        let mut objects = vec![ObjectRef::Hierarchy(self.id())];
        if let Some(parent_id) = parent {
            objects.push(ObjectRef::Node(parent_id));
        }
        self.begin_mutation(ActionKind::CreateNode, &objects);

        self.arena.insert(id, node);
        self.nodes.push(id);
        if let Some(parent_id) = parent {
            self.attach(id, parent_id);
        }

        self.finish_mutation(ActionKind::CreateNode, &objects, vec![id]);
        Ok(id)
    }

    /// Moves `node` under `new_parent`, optionally at sibling position `index`.
    ///
    /// The node is detached from its current parent, appended to
    /// `new_parent`'s children, then moved to `index` if one is given and in
    /// range (an out-of-range index leaves it last).
    ///
    /// # Errors
    ///
    /// Returns the reason from [`check_parent_action`](Self::check_parent_action)
    /// when the move is refused; the document is left unchanged.
    pub fn set_parent(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        index: Option<usize>,
    ) -> Result<()> {
        self.check_parent_action(node, Some(new_parent))?;

        let old_parent = self.get_node(node)?.parent;
        let mut objects = vec![ObjectRef::Node(node)];
        if let Some(old) = old_parent {
            objects.push(ObjectRef::Node(old));
        }
        objects.push(ObjectRef::Node(new_parent));
        self.begin_mutation(ActionKind::SetParent, &objects);

        self.detach(node);
        self.attach(node, new_parent);
        if let Some(index) = index {
            self.reposition(node, index);
        }

        self.finish_mutation(ActionKind::SetParent, &objects, vec![node]);
        Ok(())
    }

    /// Moves `node` to `new_index` among its current siblings.
    ///
    /// Returns `Ok(false)` without changing anything when the node is a
    /// root, the index is out of range, or the node is already there.
    /// Roots are reordered with [`reorder_root`](Self::reorder_root) instead.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::NodeNotFound`] if `node` is not in this document.
    pub fn set_index(&mut self, node: NodeId, new_index: usize) -> Result<bool> {
        let Some(parent) = self.get_node(node)?.parent else {
            log::debug!("set_index ignored for root {node}");
            return Ok(false);
        };
        let siblings = &self.get_node(parent)?.children;
        let Some(current) = siblings.iter().position(|c| *c == node) else {
            return Ok(false);
        };
        if new_index >= siblings.len() || new_index == current {
            return Ok(false);
        }

        let objects = [ObjectRef::Node(parent)];
        self.begin_mutation(ActionKind::SetIndex, &objects);
        self.reposition(node, new_index);
        self.finish_mutation(ActionKind::SetIndex, &objects, vec![node]);
        Ok(true)
    }

    /// Detaches `node` from its parent, making it a root.
    ///
    /// The node keeps its slot in the document's node list, so its place in
    /// root order is wherever it already sat there. Returns `Ok(false)` when
    /// the node is already a root.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::NodeNotFound`] for unknown nodes, or
    /// [`HierarchyError::InvalidParent`] if the custom validator refuses to
    /// let the node become a root.
    pub fn release_parent(&mut self, node: NodeId) -> Result<bool> {
        let Some(parent) = self.get_node(node)?.parent else {
            return Ok(false);
        };
        self.check_parent_action(node, None)?;

        let objects = [ObjectRef::Node(node), ObjectRef::Node(parent)];
        self.begin_mutation(ActionKind::ReleaseParent, &objects);
        self.detach(node);
        self.finish_mutation(ActionKind::ReleaseParent, &objects, vec![node]);
        Ok(true)
    }

    /// Makes `node` a root placed directly after `preceding` in the node
    /// list, or first when `preceding` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::NodeNotFound`] if either node is unknown,
    /// [`HierarchyError::CrossDocument`] if `preceding` belongs to another
    /// document, or [`HierarchyError::InvalidParent`] if `preceding` is
    /// `node` itself or the custom validator refuses to detach it.
    pub fn reorder_root(&mut self, node: NodeId, preceding: Option<NodeId>) -> Result<()> {
        if let Some(anchor) = preceding {
            if anchor == node {
                return Err(HierarchyError::InvalidParent(
                    "A node cannot be placed after itself".to_string(),
                ));
            }
            if anchor.document() != self.id() {
                return Err(HierarchyError::CrossDocument { node, parent: anchor });
            }
            self.get_node(anchor)?;
        }
        self.check_parent_action(node, None)?;

        let old_parent = self.get_node(node)?.parent;
        let mut objects = vec![ObjectRef::Hierarchy(self.id()), ObjectRef::Node(node)];
        if let Some(old) = old_parent {
            objects.push(ObjectRef::Node(old));
        }
        self.begin_mutation(ActionKind::ReorderRoot, &objects);

        self.detach(node);
        self.nodes.retain(|n| *n != node);
        let position = preceding
            .and_then(|anchor| self.nodes.iter().position(|n| *n == anchor))
            .map_or(0, |i| i + 1);
        self.nodes.insert(position, node);

        self.finish_mutation(ActionKind::ReorderRoot, &objects, vec![node]);
        Ok(())
    }

    /// Deletes `node` and its entire subtree.
    ///
    /// This cannot be undone by the core; the observer's `before_mutate`
    /// receives every object that is about to be destroyed so a host can
    /// snapshot them. Deleting a node that is not in the document is a
    /// no-op that reports zero deletions.
    ///
    /// # Errors
    ///
    /// Currently infallible for well-formed documents; the `Result` mirrors
    /// the other actions.
    pub fn delete_node(&mut self, node: NodeId) -> Result<DeleteResult> {
        if !self.contains(node) {
            if node.document() != self.id() {
                log::warn!("delete_node called with {node} from another document");
            }
            return Ok(DeleteResult {
                deleted_count: 0,
                affected_ids: Vec::new(),
            });
        }

        let mut objects = vec![ObjectRef::Hierarchy(self.id())];
        if let Some(parent) = self.get_node(node)?.parent {
            objects.push(ObjectRef::Node(parent));
        }
        objects.push(ObjectRef::Node(node));
        objects.extend(self.descendants(node).into_iter().map(ObjectRef::Node));
        self.begin_mutation(ActionKind::DeleteNode, &objects);

        let affected_ids = self.delete_subtree(node);

        self.finish_mutation(ActionKind::DeleteNode, &objects, affected_ids.clone());
        Ok(DeleteResult {
            deleted_count: affected_ids.len(),
            affected_ids,
        })
    }

    /// Duplicates `node` and its subtree under the same parent.
    ///
    /// The copy of `node` is named with the configured copy suffix (made
    /// unique) and appended to the original parent's children; a copied
    /// root is placed right after its source in root order. Descendant
    /// copies keep their source names. Payload fields are cloned, and
    /// no node is shared with the source subtree.
    ///
    /// The top copy goes through the same parent checks as any other
    /// placement. If they refuse it, nothing is created.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::NodeNotFound`] if `node` is not in this
    /// document, or the reason from
    /// [`check_parent_action`](Self::check_parent_action) when the copy may
    /// not sit where its source does.
    pub fn duplicate_node(&mut self, node: NodeId) -> Result<NodeId> {
        let Some(source) = self.node(node) else {
            log::error!("cannot duplicate {node}: not part of '{}'", self.name());
            return Err(HierarchyError::NodeNotFound(node));
        };
        let parent = source.parent;
        let base = format!("{}{}", source.name, self.config.copy_suffix);
        let name = self.unique_name(&base);

        let id = self.allocate_id();
        let mut copy = self.get_node(node)?.structural_copy(id, name);
        copy.init_owner(self.id())?;
        if let Err(e) = self.check_placement(&copy, parent) {
            log::warn!("duplicate of {node} refused: {e}");
            return Err(e);
        }

        let mut objects = vec![ObjectRef::Hierarchy(self.id())];
        if let Some(parent_id) = parent {
            objects.push(ObjectRef::Node(parent_id));
        }
        self.begin_mutation(ActionKind::DuplicateNode, &objects);

        self.arena.insert(id, copy);
        match parent {
            Some(parent_id) => {
                self.nodes.push(id);
                self.attach(id, parent_id);
            }
            None => {
                let position = self
                    .nodes
                    .iter()
                    .position(|n| *n == node)
                    .map_or(self.nodes.len(), |i| i + 1);
                self.nodes.insert(position, id);
            }
        }
        let mut created = vec![id];
        self.duplicate_children(node, id, &mut created)?;

        self.finish_mutation(ActionKind::DuplicateNode, &objects, created);
        Ok(id)
    }

    /// Moves a multi-selection in the given order, the way a tree widget
    /// drops several dragged rows.
    ///
    /// With `Some(parent)` each node that passes validation is placed at
    /// `first_index`, `first_index + 1`, ... under it; with `None` each
    /// valid node is released to the root. Nodes that fail validation are
    /// skipped and do not consume an index. Returns the nodes that moved.
    pub fn move_many(
        &mut self,
        selection: &[NodeId],
        new_parent: Option<NodeId>,
        first_index: usize,
    ) -> Vec<NodeId> {
        let mut moved = Vec::new();
        for &node in selection {
            if !self.validate_parent_action(node, new_parent) {
                continue;
            }
            let applied = match new_parent {
                Some(parent) => self
                    .set_parent(node, parent, Some(first_index + moved.len()))
                    .is_ok(),
                None => self.release_parent(node).is_ok(),
            };
            if applied {
                moved.push(node);
            }
        }
        moved
    }

    // ── components ───────────────────────────────────────────────

    /// Appends `node` to `parent`'s children. Caller has validated and detached.
    fn attach(&mut self, node: NodeId, parent: NodeId) {
        if let Some(p) = self.arena.get_mut(&parent) {
            p.children.push(node);
            p.touch();
        }
        if let Some(n) = self.arena.get_mut(&node) {
            n.parent = Some(parent);
            n.touch();
        }
    }

    /// Clears `node`'s parent link on both sides; no-op for roots.
    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.arena.get_mut(&node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(n) = self.arena.get_mut(&node) {
            n.touch();
        }
        if let Some(p) = self.arena.get_mut(&parent) {
            p.children.retain(|c| *c != node);
            p.touch();
        }
    }

    /// Remove-then-insert within the current parent's children.
    fn reposition(&mut self, node: NodeId, new_index: usize) {
        let Some(parent) = self.arena.get(&node).and_then(|n| n.parent) else {
            return;
        };
        let Some(p) = self.arena.get_mut(&parent) else {
            return;
        };
        let Some(current) = p.children.iter().position(|c| *c == node) else {
            return;
        };
        if new_index >= p.children.len() || new_index == current {
            return;
        }
        p.children.remove(current);
        p.children.insert(new_index, node);
        p.touch();
    }

    /// Detaches `node`, then drops it with its descendants. Returns the
    /// removed ids, every node after all of its descendants.
    fn delete_subtree(&mut self, node: NodeId) -> Vec<NodeId> {
        self.detach(node);
        let mut doomed = self.descendants(node);
        doomed.reverse();
        doomed.push(node);

        for id in &doomed {
            self.arena.remove(id);
        }
        let gone: HashSet<NodeId> = doomed.iter().copied().collect();
        self.nodes.retain(|n| !gone.contains(n));
        doomed
    }

    /// Copies the children of `source` under `copy`, depth first, so the
    /// new nodes land in the node list in pre-order.
    fn duplicate_children(
        &mut self,
        source: NodeId,
        copy: NodeId,
        created: &mut Vec<NodeId>,
    ) -> Result<()> {
        let mut stack: Vec<(NodeId, NodeId)> = self
            .get_node(source)?
            .children
            .iter()
            .rev()
            .map(|child| (*child, copy))
            .collect();

        while let Some((original, parent)) = stack.pop() {
            let id = self.allocate_id();
            let source_node = self.get_node(original)?;
            let mut node = source_node.structural_copy(id, source_node.name.clone());
            stack.extend(source_node.children.iter().rev().map(|child| (*child, id)));
            node.init_owner(self.id())?;

            self.arena.insert(id, node);
            self.nodes.push(id);
            created.push(id);
            self.attach(id, parent);
        }
        Ok(())
    }
}
