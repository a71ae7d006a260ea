//! Result type for node removal.
//!
//! [`DeleteResult`] is returned by
//! [`Hierarchy::delete_node`](super::hierarchy::Hierarchy::delete_node).
//! Fields serialize in camelCase (`deletedCount`, `affectedIds`) so a
//! front-end can consume the result directly.
//!
//! ## Examples
//!
//! ```rust
//! use hierarchy_core::DeleteResult;
//!
//! let result = DeleteResult {
//!     deleted_count: 0,
//!     affected_ids: vec![],
//! };
//! let json = serde_json::to_string(&result).unwrap();
//! assert!(json.contains("deletedCount"));
//! assert!(json.contains("affectedIds"));
//! ```

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// The outcome of a delete action.
///
/// Lists every node removed from the document: the target and all of its
/// descendants, leaves first. A delete of a node that was already gone
/// reports zero removals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// The total number of nodes that were removed.
    pub deleted_count: usize,

    /// IDs of all removed nodes, children before their parents.
    pub affected_ids: Vec<NodeId>,
}
