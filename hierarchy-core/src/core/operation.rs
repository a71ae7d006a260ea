//! Journal entry types recorded by the [`OperationLog`](crate::OperationLog).

use crate::{ActionKind, ObjectRef};
use serde::{Deserialize, Serialize};

/// A single host-integration event emitted around a tree action.
///
/// Every variant carries a stable `operation_id` and a wall-clock
/// `timestamp`, so a host can correlate the journal with its own undo stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operation {
    /// Objects were snapshotted before an action mutated them.
    RecordUndo {
        /// Stable UUID for this operation.
        operation_id: String,
        /// Unix timestamp (seconds) when the operation was recorded.
        timestamp: i64,
        /// The action about to run.
        action: ActionKind,
        /// Persisted objects the action is about to touch.
        objects: Vec<ObjectRef>,
    },
    /// Objects were changed by an action and need saving.
    MarkDirty {
        /// Stable UUID for this operation.
        operation_id: String,
        /// Unix timestamp (seconds) when the operation was recorded.
        timestamp: i64,
        /// The action that ran.
        action: ActionKind,
        /// Persisted objects the action touched.
        objects: Vec<ObjectRef>,
    },
}

impl Operation {
    /// Returns the stable identifier for this operation.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        match self {
            Self::RecordUndo { operation_id, .. } | Self::MarkDirty { operation_id, .. } => {
                operation_id
            }
        }
    }

    /// Returns the wall-clock Unix timestamp (seconds) when this operation was recorded.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        match self {
            Self::RecordUndo { timestamp, .. } | Self::MarkDirty { timestamp, .. } => *timestamp,
        }
    }

    #[must_use]
    pub fn action(&self) -> ActionKind {
        match self {
            Self::RecordUndo { action, .. } | Self::MarkDirty { action, .. } => *action,
        }
    }

    #[must_use]
    pub fn objects(&self) -> &[ObjectRef] {
        match self {
            Self::RecordUndo { objects, .. } | Self::MarkDirty { objects, .. } => objects,
        }
    }

    /// Name of the variant, as written in the serialized `type` tag.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RecordUndo { .. } => "RecordUndo",
            Self::MarkDirty { .. } => "MarkDirty",
        }
    }
}
