//! Internal domain modules for the hierarchy core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod actions;
pub mod config;
pub mod delete;
pub mod error;
pub mod hierarchy;
pub mod node;
pub mod node_type;
pub mod observer;
pub mod operation;
pub mod operation_log;
pub mod snapshot;
pub mod style;

#[doc(inline)]
pub use config::{load_config, save_config, HierarchyConfig};
#[doc(inline)]
pub use delete::DeleteResult;
#[doc(inline)]
pub use error::{HierarchyError, Result};
#[doc(inline)]
pub use hierarchy::{AllowAll, Hierarchy, ParentValidator, TreeRefresh};
#[doc(inline)]
pub use node::{FieldValue, HierarchyId, Node, NodeId};
#[doc(inline)]
pub use node_type::{FieldDefinition, NodeType, NodeTypeRegistry};
#[doc(inline)]
pub use observer::{ActionKind, MutationObserver, NoopObserver, ObjectRef};
#[doc(inline)]
pub use operation::Operation;
#[doc(inline)]
pub use operation_log::{OperationLog, OperationSummary, PurgeStrategy};
#[doc(inline)]
pub use snapshot::{HierarchySnapshot, NodeSnapshot};
#[doc(inline)]
pub use style::NodeStyle;
