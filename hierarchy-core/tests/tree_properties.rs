//! Randomized action sequences must never break the document's invariants.

use hierarchy_core::{Hierarchy, NodeId, NodeType, NodeTypeRegistry};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Create { parent: Option<usize> },
    SetParent { node: usize, parent: usize, index: Option<usize> },
    SetIndex { node: usize, index: usize },
    Release { node: usize },
    ReorderRoot { node: usize, preceding: Option<usize> },
    Delete { node: usize },
    Duplicate { node: usize },
}

fn step() -> impl Strategy<Value = Step> {
    let slot = 0usize..32;
    prop_oneof![
        3 => proptest::option::of(slot.clone()).prop_map(|parent| Step::Create { parent }),
        4 => (slot.clone(), slot.clone(), proptest::option::of(0usize..6))
            .prop_map(|(node, parent, index)| Step::SetParent { node, parent, index }),
        2 => (slot.clone(), 0usize..6).prop_map(|(node, index)| Step::SetIndex { node, index }),
        2 => slot.clone().prop_map(|node| Step::Release { node }),
        2 => (slot.clone(), proptest::option::of(slot.clone()))
            .prop_map(|(node, preceding)| Step::ReorderRoot { node, preceding }),
        1 => slot.clone().prop_map(|node| Step::Delete { node }),
        1 => slot.prop_map(|node| Step::Duplicate { node }),
    ]
}

fn registry() -> NodeTypeRegistry {
    let mut registry = NodeTypeRegistry::new();
    registry.register(NodeType::new("Item").with_field("label", "text"));
    registry
}

/// Picks from every handle ever issued, deleted ones included.
fn pick(ids: &[NodeId], slot: usize) -> Option<NodeId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[slot % ids.len()])
    }
}

fn apply(doc: &mut Hierarchy, ids: &mut Vec<NodeId>, step: &Step) {
    match *step {
        Step::Create { parent } => {
            let parent = parent.and_then(|p| pick(ids, p));
            if let Ok(id) = doc.create_node("Item", parent) {
                ids.push(id);
            }
        }
        Step::SetParent { node, parent, index } => {
            if let (Some(n), Some(p)) = (pick(ids, node), pick(ids, parent)) {
                let _ = doc.set_parent(n, p, index);
            }
        }
        Step::SetIndex { node, index } => {
            if let Some(n) = pick(ids, node) {
                let _ = doc.set_index(n, index);
            }
        }
        Step::Release { node } => {
            if let Some(n) = pick(ids, node) {
                let _ = doc.release_parent(n);
            }
        }
        Step::ReorderRoot { node, preceding } => {
            if let Some(n) = pick(ids, node) {
                let _ = doc.reorder_root(n, preceding.and_then(|p| pick(ids, p)));
            }
        }
        Step::Delete { node } => {
            if let Some(n) = pick(ids, node) {
                let _ = doc.delete_node(n);
            }
        }
        Step::Duplicate { node } => {
            if let Some(n) = pick(ids, node) {
                if let Ok(copy) = doc.duplicate_node(n) {
                    ids.push(copy);
                    ids.extend(doc.descendants(copy));
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_every_action(steps in proptest::collection::vec(step(), 1..60)) {
        let mut doc = Hierarchy::new("Doc", registry());
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(doc.create_node("Item", None).unwrap());
        }

        for step in &steps {
            apply(&mut doc, &mut ids, step);

            let problems = doc.integrity_problems();
            prop_assert!(problems.is_empty(), "after {:?}: {:?}", step, problems);

            for &id in doc.nodes() {
                prop_assert!(!doc.node_is_child_of_parent(id, id));
                prop_assert!(doc.root_of(id).is_some(), "{} has no reachable root", id);
                let node = doc.node(id).unwrap();
                prop_assert_eq!(node.owner(), Some(doc.id()));
                if let Some(parent) = node.parent() {
                    let siblings = doc.node(parent).unwrap().children();
                    prop_assert_eq!(siblings.iter().filter(|c| **c == id).count(), 1);
                }
            }
        }
    }

    #[test]
    fn release_twice_is_a_noop(depth in 1usize..6) {
        let mut doc = Hierarchy::new("Doc", registry());
        let mut parent = doc.create_node("Item", None).unwrap();
        for _ in 0..depth {
            parent = doc.create_node("Item", Some(parent)).unwrap();
        }

        prop_assert!(doc.release_parent(parent).unwrap());
        let before = doc.snapshot();
        prop_assert!(!doc.release_parent(parent).unwrap());
        prop_assert_eq!(before, doc.snapshot());
    }
}
