//! Optional display capabilities a tree widget may query.
//!
//! The core never calls these; they exist so a UI layer has one place to
//! ask how a node wants to be drawn. Every method has a neutral default.

use crate::{FieldValue, Node};

pub trait NodeStyle {
    /// Primary label. `None` means "use the node name".
    fn title(&self) -> Option<String> {
        None
    }

    fn subtitle(&self) -> Option<String> {
        None
    }

    /// 0.0 (invisible) to 1.0 (opaque).
    fn opacity(&self) -> f32 {
        1.0
    }

    fn alternate_background(&self) -> bool {
        false
    }

    /// Icon key or image path shown next to the label.
    fn icon(&self) -> Option<String> {
        None
    }

    /// Text drawn on the edge connecting the node to its parent.
    fn edge_text(&self) -> Option<String> {
        None
    }
}

fn text_field(node: &Node, name: &str) -> Option<String> {
    match node.field(name) {
        Some(FieldValue::Text(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Reads conventional payload fields: `title`, `subtitle`, `icon`,
/// `disabled`, `alternate` and `edgeText`.
impl NodeStyle for Node {
    fn title(&self) -> Option<String> {
        text_field(self, "title").or_else(|| Some(self.name.clone()))
    }

    fn subtitle(&self) -> Option<String> {
        text_field(self, "subtitle")
    }

    fn opacity(&self) -> f32 {
        match self.field("disabled") {
            Some(FieldValue::Boolean(true)) => 0.5,
            _ => 1.0,
        }
    }

    fn alternate_background(&self) -> bool {
        matches!(self.field("alternate"), Some(FieldValue::Boolean(true)))
    }

    fn icon(&self) -> Option<String> {
        text_field(self, "icon")
    }

    fn edge_text(&self) -> Option<String> {
        text_field(self, "edgeText")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hierarchy, NodeType, NodeTypeRegistry};

    #[test]
    fn test_style_reads_conventional_fields() {
        let mut registry = NodeTypeRegistry::new();
        registry.register(
            NodeType::new("Card")
                .with_field("title", "text")
                .with_field("subtitle", "text")
                .with_field("icon", "text")
                .with_field("disabled", "boolean"),
        );
        let mut doc = Hierarchy::new("Board", registry);
        let id = doc.create_node("Card", None).unwrap();

        let node = doc.node(id).unwrap();
        assert_eq!(node.title().as_deref(), Some("Card"));
        assert_eq!(node.subtitle(), None);
        assert_eq!(node.opacity(), 1.0);
        assert_eq!(node.icon(), None);

        let node = doc.node_mut(id).unwrap();
        node.set_field("title", FieldValue::Text("Backlog".to_string()));
        node.set_field("disabled", FieldValue::Boolean(true));
        node.set_field("icon", FieldValue::Text("flag".to_string()));
        assert_eq!(node.title().as_deref(), Some("Backlog"));
        assert_eq!(node.opacity(), 0.5);
        assert_eq!(node.icon().as_deref(), Some("flag"));
        assert!(!node.alternate_background());
        assert_eq!(node.edge_text(), None);
    }
}
