//! Serializable views of a hierarchy and an ASCII outline renderer.
//!
//! Snapshots are what a host hands to its undo stack or debug tooling; the
//! document's own persistence format stays with the host.

use crate::{FieldValue, Hierarchy, HierarchyId, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node's state, links included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub node_type: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id(),
            name: node.name.clone(),
            node_type: node.node_type().to_string(),
            parent: node.parent(),
            children: node.children().to_vec(),
            fields: node.fields.clone(),
        }
    }
}

/// Whole-document state, nodes listed in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySnapshot {
    pub id: HierarchyId,
    pub name: String,
    pub nodes: Vec<NodeSnapshot>,
}

impl HierarchySnapshot {
    /// Parentless nodes in root order.
    pub fn roots(&self) -> impl Iterator<Item = &NodeSnapshot> {
        self.nodes.iter().filter(|n| n.parent.is_none())
    }
}

impl Hierarchy {
    /// Captures the current state of a single node.
    #[must_use]
    pub fn snapshot_node(&self, id: NodeId) -> Option<NodeSnapshot> {
        self.node(id).map(NodeSnapshot::from)
    }

    /// Captures the current state of every node.
    #[must_use]
    pub fn snapshot(&self) -> HierarchySnapshot {
        HierarchySnapshot {
            id: self.id(),
            name: self.name().to_string(),
            nodes: self
                .nodes()
                .iter()
                .filter_map(|id| self.snapshot_node(*id))
                .collect(),
        }
    }

    /// Renders the forest as an ASCII tree of node names.
    ///
    /// ```text
    /// Project
    /// ├── Design
    /// │   └── Review
    /// └── Build
    /// Archive
    /// ```
    #[must_use]
    pub fn render_outline(&self) -> String {
        let mut output = String::new();
        // (node, prefix of its own line, whether it is the last sibling; None for roots)
        let mut stack: Vec<(NodeId, String, Option<bool>)> = self
            .root_nodes()
            .into_iter()
            .rev()
            .map(|root| (root, String::new(), None))
            .collect();

        while let Some((id, prefix, is_last)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };

            let child_prefix = match is_last {
                None => {
                    output.push_str(&node.name);
                    String::new()
                }
                Some(is_last) => {
                    output.push_str(&prefix);
                    output.push_str(if is_last { "└── " } else { "├── " });
                    output.push_str(&node.name);
                    format!("{prefix}{}", if is_last { "    " } else { "│   " })
                }
            };
            output.push('\n');

            let count = node.children().len();
            for (i, child) in node.children().iter().enumerate().rev() {
                stack.push((*child, child_prefix.clone(), Some(i + 1 == count)));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeType, NodeTypeRegistry};

    fn project() -> Hierarchy {
        let mut registry = NodeTypeRegistry::new();
        registry.register(NodeType::new("Item").with_field("weight", "number"));
        let mut doc = Hierarchy::new("Plan", registry);
        let project = doc.create_node("Item", None).unwrap();
        let design = doc.create_node("Item", Some(project)).unwrap();
        doc.create_node("Item", Some(design)).unwrap();
        doc.create_node("Item", Some(project)).unwrap();
        doc.create_node("Item", None).unwrap();
        for (id, name) in doc
            .nodes()
            .to_vec()
            .into_iter()
            .zip(["Project", "Design", "Review", "Build", "Archive"])
        {
            doc.node_mut(id).unwrap().name = name.to_string();
        }
        doc
    }

    #[test]
    fn test_render_outline() {
        let doc = project();
        assert_eq!(
            doc.render_outline(),
            "Project\n├── Design\n│   └── Review\n└── Build\nArchive\n"
        );
    }

    #[test]
    fn test_snapshot_lists_roots_in_order() {
        let doc = project();
        let snapshot = doc.snapshot();
        assert_eq!(snapshot.nodes.len(), 5);
        let roots: Vec<&str> = snapshot.roots().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, vec!["Project", "Archive"]);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let doc = project();
        let first = doc.nodes()[0];
        let json = serde_json::to_string(&doc.snapshot_node(first).unwrap()).unwrap();
        assert!(json.contains("\"nodeType\":\"Item\""));
        let back: NodeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.children.len(), 2);
    }

    #[test]
    fn test_duplicate_preserves_outline_shape() {
        let mut doc = project();
        let project_id = doc.root_nodes()[0];
        let copy = doc.duplicate_node(project_id).unwrap();
        doc.node_mut(copy).unwrap().name = "Project".to_string();
        let archive = doc.root_nodes()[2];
        doc.reorder_root(copy, Some(archive)).unwrap();
        assert_eq!(
            doc.render_outline(),
            "Project\n├── Design\n│   └── Review\n└── Build\nArchive\n\
             Project\n├── Design\n│   └── Review\n└── Build\n"
        );
    }
}
