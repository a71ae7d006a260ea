//! Host integration around structural mutations.
//!
//! An editor host typically needs to snapshot objects for its undo stack
//! before a change and mark them dirty afterwards, but only for objects that
//! are actually persisted. The [`MutationObserver`] trait carries those three
//! concerns; every tree action brackets its mutation with it.
//!
//! Outside an editor, [`NoopObserver`] is installed and nothing is recorded.

use crate::{HierarchyId, NodeId};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The structural action being applied.
///
/// Serialized as a PascalCase string (`"SetParent"`, `"ReorderRoot"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ActionKind {
    CreateNode,
    DeleteNode,
    SetParent,
    SetIndex,
    ReleaseParent,
    ReorderRoot,
    DuplicateNode,
}

impl ActionKind {
    /// Label suitable for an undo menu entry.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateNode => "Create Node",
            Self::DeleteNode => "Delete Node",
            Self::SetParent => "Set Parent",
            Self::SetIndex => "Set Index",
            Self::ReleaseParent => "Release Parent",
            Self::ReorderRoot => "Reorder Root",
            Self::DuplicateNode => "Duplicate Node",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An object whose state a mutation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum ObjectRef {
    /// The document itself (its flat node list changes).
    Hierarchy(HierarchyId),
    /// A single node (its parent or children links change).
    Node(NodeId),
}

/// Hooks the core calls around every structural change.
pub trait MutationObserver {
    /// Called before the mutation with the persisted objects it will touch.
    fn before_mutate(&mut self, action: ActionKind, objects: &[ObjectRef]);

    /// Called after the mutation with the persisted objects it touched.
    fn after_mutate(&mut self, action: ActionKind, objects: &[ObjectRef]);

    /// Whether `object` lives in persisted storage and must be tracked.
    fn is_persisted(&self, object: ObjectRef) -> bool;
}

/// Observer for hosts without undo or persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MutationObserver for NoopObserver {
    fn before_mutate(&mut self, _action: ActionKind, _objects: &[ObjectRef]) {}

    fn after_mutate(&mut self, _action: ActionKind, _objects: &[ObjectRef]) {}

    fn is_persisted(&self, _object: ObjectRef) -> bool {
        false
    }
}

/// Lets a host keep a handle to the observer it installed.
impl<T: MutationObserver> MutationObserver for Rc<RefCell<T>> {
    fn before_mutate(&mut self, action: ActionKind, objects: &[ObjectRef]) {
        self.borrow_mut().before_mutate(action, objects);
    }

    fn after_mutate(&mut self, action: ActionKind, objects: &[ObjectRef]) {
        self.borrow_mut().after_mutate(action, objects);
    }

    fn is_persisted(&self, object: ObjectRef) -> bool {
        self.borrow().is_persisted(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_serializes_pascal_case() {
        let json = serde_json::to_string(&ActionKind::ReorderRoot).unwrap();
        assert_eq!(json, r#""ReorderRoot""#);
        assert_eq!(ActionKind::SetParent.to_string(), "Set Parent");
    }

    #[test]
    fn test_noop_observer_persists_nothing() {
        let observer = NoopObserver;
        let doc = HierarchyId::new_random();
        assert!(!observer.is_persisted(ObjectRef::Hierarchy(doc)));
    }
}
