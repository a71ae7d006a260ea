//! Error types for the hierarchy core library.

use crate::NodeId;
use thiserror::Error;

/// All errors that can occur within the hierarchy core library.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// A node ID was requested that is not part of the hierarchy.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The two nodes of a structural edit belong to different documents.
    #[error("Cannot parent {node} under {parent}: nodes belong to different documents")]
    CrossDocument {
        /// The node being moved.
        node: NodeId,
        /// The requested parent.
        parent: NodeId,
    },

    /// A parent assignment would be self-parenting, cyclic, or is refused
    /// by a type rule or a custom validator.
    #[error("Invalid parent: {0}")]
    InvalidParent(String),

    /// A node type was requested that has not been registered.
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// A node's owner was already set; ownership is assigned exactly once.
    #[error("Node is already owned by a hierarchy")]
    AlreadyInitialized,

    /// A configuration file was readable but its content was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`HierarchyError`].
pub type Result<T> = std::result::Result<T, HierarchyError>;

impl HierarchyError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NodeNotFound(_) => "Node no longer exists".to_string(),
            Self::CrossDocument { .. } => "Nodes can only be moved within their own document".to_string(),
            Self::InvalidParent(msg) => msg.clone(),
            Self::UnknownNodeType(name) => format!("Unknown node type: {name}"),
            Self::AlreadyInitialized => "Node already belongs to a document".to_string(),
            Self::InvalidConfig(msg) => format!("Settings error: {msg}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parent_user_message_is_reason() {
        let e = HierarchyError::InvalidParent("Move would create a cycle".to_string());
        assert_eq!(e.user_message(), "Move would create a cycle");
        assert!(e.to_string().contains("cycle"));
    }

    #[test]
    fn test_unknown_node_type_names_the_type() {
        let e = HierarchyError::UnknownNodeType("Folder".to_string());
        assert!(e.user_message().contains("Folder"));
    }
}
