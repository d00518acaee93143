//! Review workflow error types.

use std::fmt;

use thiserror::Error;

use tenet_core::enums::{FeedbackStatus, OperationKind, ParentKind, ReviewAction, TargetKind};
use tenet_core::errors::CoreError;
use tenet_db::error::DatabaseError;

/// An action that tries to move a feedback item: one of the four review
/// actions, or the merge command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Review(ReviewAction),
    Merge,
}

impl From<ReviewAction> for WorkflowAction {
    fn from(action: ReviewAction) -> Self {
        Self::Review(action)
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Review(action) => action.fmt(f),
            Self::Merge => f.write_str("merge"),
        }
    }
}

/// Errors from submitting, reviewing, or merging feedback.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The payload does not decode into the command shape for its
    /// (target kind, operation) pair.
    #[error(transparent)]
    Codec(#[from] CoreError),

    /// An `add` names a parent entity that does not exist or is deleted.
    #[error("No active {parent} '{parent_id}' to attach this {target} to")]
    ParentNotFound {
        target: TargetKind,
        parent: ParentKind,
        parent_id: String,
    },

    /// A `modify` or `delete` addresses an entity that does not exist or
    /// is deleted.
    #[error("No active {target} with id '{target_id}'")]
    TargetNotFound {
        target: TargetKind,
        target_id: String,
    },

    /// A `modify` payload embeds an id different from the feedback item's
    /// `target_id`.
    #[error("Target id mismatch: feedback addresses '{expected}' but payload names '{found}'")]
    TargetIdMismatch { expected: String, found: String },

    /// `modify` and `delete` submissions must carry a `target_id`.
    #[error("Operation '{0}' requires a target_id")]
    MissingTargetId(OperationKind),

    /// `add` submissions must not carry a `target_id`.
    #[error("Operation 'add' must not carry a target_id")]
    UnexpectedTargetId,

    /// A review or merge action has no edge from the item's current status.
    /// Covers wrong tiers, terminal states, and merging anything that is not
    /// `human_approved`.
    #[error("Cannot apply '{action}' to feedback in status '{current}'")]
    IllegalTransition {
        current: FeedbackStatus,
        action: WorkflowAction,
    },

    /// Rejections must carry non-empty review notes.
    #[error("Action '{0}' requires non-empty review notes")]
    MissingReviewNotes(ReviewAction),

    /// Underlying persistence error.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
