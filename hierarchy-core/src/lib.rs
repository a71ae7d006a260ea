//! Core library for reparentable tree documents.
//!
//! The primary entry point is [`Hierarchy`], a document owning a forest of
//! typed [`Node`]s. Nodes are created from a [`NodeTypeRegistry`] and every
//! structural edit (create, delete, set parent, set index, release parent,
//! reorder root, duplicate) goes through `Hierarchy` methods, which validate
//! the request before touching any state.
//!
//! Host editors plug in through three seams: a [`ParentValidator`] for
//! domain rules, a [`MutationObserver`] for undo snapshots and dirty
//! tracking, and refresh listeners registered with
//! [`Hierarchy::on_tree_refresh_required`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    config::{load_config, save_config, HierarchyConfig},
    delete::DeleteResult,
    error::{HierarchyError, Result},
    hierarchy::{AllowAll, Hierarchy, ParentValidator, TreeRefresh},
    node::{FieldValue, HierarchyId, Node, NodeId},
    node_type::{FieldDefinition, NodeType, NodeTypeRegistry},
    observer::{ActionKind, MutationObserver, NoopObserver, ObjectRef},
    operation::Operation,
    operation_log::{OperationLog, OperationSummary, PurgeStrategy},
    snapshot::{HierarchySnapshot, NodeSnapshot},
    style::NodeStyle,
};
