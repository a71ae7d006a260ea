//! In-memory operation journal and purge strategies.

use crate::{ActionKind, HierarchyConfig, MutationObserver, ObjectRef, Operation};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// Controls which old operations are dropped from the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeStrategy {
    /// Retain only the most recent `keep_last` operations.
    LocalOnly { keep_last: usize },
    /// Keep everything for the lifetime of the log.
    Unbounded,
}

/// Lightweight view of a journal entry for display in a history panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub operation_id: String,
    pub timestamp: i64,
    pub operation_type: String,
    pub action: ActionKind,
    pub object_count: usize,
}

/// A [`MutationObserver`] that journals every undo snapshot and dirty mark.
///
/// By default every object counts as persisted. Use
/// [`OperationLog::with_persisted`] to restrict tracking to a known set of
/// objects, the way an editor only records undo for objects saved in an asset.
#[derive(Debug)]
pub struct OperationLog {
    strategy: PurgeStrategy,
    operations: Vec<Operation>,
    persisted: Option<HashSet<ObjectRef>>,
}

impl OperationLog {
    /// Creates a new `OperationLog` with the given purge strategy.
    pub fn new(strategy: PurgeStrategy) -> Self {
        Self {
            strategy,
            operations: Vec::new(),
            persisted: None,
        }
    }

    /// Creates a log bounded by `config.journal_keep_last`.
    pub fn from_config(config: &HierarchyConfig) -> Self {
        Self::new(PurgeStrategy::LocalOnly {
            keep_last: config.journal_keep_last,
        })
    }

    /// Restricts tracking to `objects`; everything else is treated as transient.
    #[must_use]
    pub fn with_persisted(mut self, objects: impl IntoIterator<Item = ObjectRef>) -> Self {
        self.persisted = Some(objects.into_iter().collect());
        self
    }

    /// Starts tracking `object` when the log was restricted with [`with_persisted`](Self::with_persisted).
    pub fn persist(&mut self, object: ObjectRef) {
        if let Some(set) = self.persisted.as_mut() {
            set.insert(object);
        }
    }

    /// Appends `op` and drops stale entries according to the purge strategy.
    pub fn log(&mut self, op: Operation) {
        self.operations.push(op);
        self.purge_if_needed();
    }

    /// Deletes old operations according to the purge strategy.
    pub fn purge_if_needed(&mut self) {
        if let PurgeStrategy::LocalOnly { keep_last } = self.strategy {
            if self.operations.len() > keep_last {
                let excess = self.operations.len() - keep_last;
                self.operations.drain(..excess);
            }
        }
    }

    /// All retained operations, oldest first.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Summaries of retained operations, newest first, optionally filtered by action.
    pub fn list_operations(&self, action: Option<ActionKind>) -> Vec<OperationSummary> {
        self.operations
            .iter()
            .rev()
            .filter(|op| action.map_or(true, |a| op.action() == a))
            .map(|op| OperationSummary {
                operation_id: op.operation_id().to_string(),
                timestamp: op.timestamp(),
                operation_type: op.type_name().to_string(),
                action: op.action(),
                object_count: op.objects().len(),
            })
            .collect()
    }

    /// Removes every retained operation and returns how many were dropped.
    pub fn purge_all_operations(&mut self) -> usize {
        let count = self.operations.len();
        self.operations.clear();
        count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new(PurgeStrategy::LocalOnly { keep_last: 1000 })
    }
}

impl MutationObserver for OperationLog {
    fn before_mutate(&mut self, action: ActionKind, objects: &[ObjectRef]) {
        if objects.is_empty() {
            return;
        }
        self.log(Operation::RecordUndo {
            operation_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            action,
            objects: objects.to_vec(),
        });
    }

    fn after_mutate(&mut self, action: ActionKind, objects: &[ObjectRef]) {
        if objects.is_empty() {
            return;
        }
        self.log(Operation::MarkDirty {
            operation_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            action,
            objects: objects.to_vec(),
        });
    }

    fn is_persisted(&self, object: ObjectRef) -> bool {
        self.persisted
            .as_ref()
            .map_or(true, |set| set.contains(&object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hierarchy, NodeType, NodeTypeRegistry};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry() -> NodeTypeRegistry {
        let mut registry = NodeTypeRegistry::new();
        registry.register(NodeType::new("Folder"));
        registry
    }

    #[test]
    fn test_log_and_purge() {
        let mut log = OperationLog::new(PurgeStrategy::LocalOnly { keep_last: 5 });
        let doc = Hierarchy::default();

        for i in 0..10 {
            log.log(Operation::MarkDirty {
                operation_id: format!("op-{i}"),
                timestamp: 1000 + i,
                action: ActionKind::SetIndex,
                objects: vec![ObjectRef::Hierarchy(doc.id())],
            });
        }

        assert_eq!(log.len(), 5);
        assert_eq!(log.operations()[0].operation_id(), "op-5");
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut log = OperationLog::new(PurgeStrategy::Unbounded);
        let doc = Hierarchy::default();
        for _ in 0..20 {
            log.after_mutate(ActionKind::CreateNode, &[ObjectRef::Hierarchy(doc.id())]);
        }
        assert_eq!(log.len(), 20);
        assert_eq!(log.purge_all_operations(), 20);
        assert!(log.is_empty());
    }

    #[test]
    fn test_from_config_uses_keep_last() {
        let config = HierarchyConfig {
            journal_keep_last: 2,
            ..HierarchyConfig::default()
        };
        let mut log = OperationLog::from_config(&config);
        let doc = Hierarchy::default();
        for _ in 0..4 {
            log.before_mutate(ActionKind::ReorderRoot, &[ObjectRef::Hierarchy(doc.id())]);
        }
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_empty_object_list_is_not_journaled() {
        let mut log = OperationLog::default();
        log.before_mutate(ActionKind::SetParent, &[]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_journal_brackets_actions() {
        let log = Rc::new(RefCell::new(OperationLog::default()));
        let mut doc = Hierarchy::new("Doc", registry());
        doc.set_observer(log.clone());

        let a = doc.create_node("Folder", None).unwrap();
        let b = doc.create_node("Folder", None).unwrap();
        doc.set_parent(b, a, None).unwrap();

        let summaries = log.borrow().list_operations(Some(ActionKind::SetParent));
        let types: Vec<&str> = summaries.iter().map(|s| s.operation_type.as_str()).collect();
        assert_eq!(types, vec!["MarkDirty", "RecordUndo"]);
        assert_eq!(summaries[1].object_count, 2);
    }

    #[test]
    fn test_restricted_log_ignores_transient_objects() {
        let mut doc = Hierarchy::new("Doc", registry());
        let persisted = ObjectRef::Hierarchy(doc.id());
        let log = Rc::new(RefCell::new(
            OperationLog::new(PurgeStrategy::Unbounded).with_persisted([persisted]),
        ));
        doc.set_observer(log.clone());

        let a = doc.create_node("Folder", None).unwrap();
        let b = doc.create_node("Folder", None).unwrap();
        let before = log.borrow().len();
        doc.set_parent(b, a, None).unwrap();
        assert_eq!(log.borrow().len(), before, "nodes are not persisted");

        log.borrow_mut().persist(ObjectRef::Node(a));
        doc.release_parent(b).unwrap();
        let ops = log.borrow().list_operations(Some(ActionKind::ReleaseParent));
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].object_count, 1);
    }
}
