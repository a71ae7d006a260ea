//! Registrable node variants: the factory and the "is assignable" rules.
//!
//! A hierarchy only ever instantiates nodes through a [`NodeTypeRegistry`].
//! Each [`NodeType`] declares its payload fields and, optionally, which
//! types it may sit under and which types it accepts as children.

use crate::{FieldValue, HierarchyError, Node, NodeId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Describes a single typed payload field of a node type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    /// One of `text`, `number`, `boolean`. Unknown kinds default to text.
    pub field_type: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// A registered node variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Node types that are allowed as parents of this type.
    /// Empty means no restriction.
    #[serde(default)]
    pub allowed_parent_types: Vec<String>,
    /// Node types this type accepts as direct children.
    /// Empty means no restriction.
    #[serde(default)]
    pub allowed_children_types: Vec<String>,
}

impl NodeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            allowed_parent_types: Vec::new(),
            allowed_children_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: &str, field_type: &str) -> Self {
        self.fields.push(FieldDefinition::new(name, field_type));
        self
    }

    #[must_use]
    pub fn with_parent_types(mut self, types: &[&str]) -> Self {
        self.allowed_parent_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_children_types(mut self, types: &[&str]) -> Self {
        self.allowed_children_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Returns a map of field names to their zero-value defaults.
    pub fn default_fields(&self) -> BTreeMap<String, FieldValue> {
        self.fields
            .iter()
            .map(|def| {
                let value = match def.field_type.as_str() {
                    "number" => FieldValue::Number(0.0),
                    "boolean" => FieldValue::Boolean(false),
                    _ => FieldValue::Text(String::new()),
                };
                (def.name.clone(), value)
            })
            .collect()
    }
}

/// The set of node variants a hierarchy may contain.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    types: HashMap<String, NodeType>,
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node_type`, replacing any earlier definition of the same name.
    pub fn register(&mut self, node_type: NodeType) {
        if self.types.contains_key(&node_type.name) {
            log::debug!("replacing node type definition '{}'", node_type.name);
        }
        self.types.insert(node_type.name.clone(), node_type);
    }

    /// Whether `name` is a member of the node variant family.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownNodeType`] if `name` is not registered.
    pub fn get(&self, name: &str) -> Result<&NodeType> {
        self.types
            .get(name)
            .ok_or_else(|| HierarchyError::UnknownNodeType(name.to_string()))
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    /// Constructs a default, unowned instance of `name` with handle `id`.
    ///
    /// The instance is named after its type; the hierarchy renames it to a
    /// unique name before inserting it.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownNodeType`] if `name` is not registered.
    pub fn instantiate(&self, name: &str, id: NodeId) -> Result<Node> {
        let node_type = self.get(name)?;
        Ok(Node::new(
            id,
            node_type.name.clone(),
            node_type.name.clone(),
            node_type.default_fields(),
        ))
    }

    /// Whether a `child_type` node may be placed directly under a
    /// `parent_type` node. Unregistered types are never assignable.
    #[must_use]
    pub fn is_assignable(&self, parent_type: &str, child_type: &str) -> bool {
        let (Some(parent), Some(child)) = (self.types.get(parent_type), self.types.get(child_type))
        else {
            return false;
        };
        let parent_accepts = parent.allowed_children_types.is_empty()
            || parent.allowed_children_types.iter().any(|t| t == child_type);
        let child_accepts = child.allowed_parent_types.is_empty()
            || child.allowed_parent_types.iter().any(|t| t == parent_type);
        parent_accepts && child_accepts
    }

    /// Registered types that may be created as children of `parent_type`, sorted.
    pub fn assignable_children(&self, parent_type: &str) -> Vec<String> {
        self.type_names()
            .into_iter()
            .filter(|child| self.is_assignable(parent_type, child))
            .collect()
    }
}
