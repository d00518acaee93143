//! The review workflow orchestrator.
//!
//! `submit` gates entry to the feedback queue, `process` drives the two-tier
//! state machine, and `merge` applies a human-approved item to the knowledge
//! base. Merge owns the transaction: the entity mutation and the status
//! transition to `merged` commit together or not at all.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tenet_core::audit_detail::MergedDetail;
use tenet_core::entities::FeedbackItem;
use tenet_core::enums::{
    AuditAction, EntityType, FeedbackStatus, OperationKind, ReviewAction, RiskLevel, TargetKind,
};
use tenet_db::error::DatabaseError;
use tenet_db::service::TenetService;

use crate::error::{ReviewError, WorkflowAction};
use crate::registry::TargetRegistry;

/// A raw proposal, before any feedback row exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub target_kind: TargetKind,
    pub operation: OperationKind,
    /// Entity addressed by a modify/delete. Must be absent for adds.
    #[serde(default)]
    pub target_id: Option<String>,
    pub risk_level: RiskLevel,
    pub payload: serde_json::Value,
}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub feedback_id: String,
    /// Id of the entity created, modified, or soft-deleted.
    pub entity_id: String,
}

/// Orchestrates submission, review, and merge over one `TenetService`.
pub struct ReviewWorkflow {
    svc: TenetService,
    registry: TargetRegistry,
}

impl ReviewWorkflow {
    #[must_use]
    pub fn new(svc: TenetService) -> Self {
        Self {
            svc,
            registry: TargetRegistry::with_defaults(),
        }
    }

    /// Direct access to the underlying service, e.g. for seeding or queries.
    #[must_use]
    pub const fn service(&self) -> &TenetService {
        &self.svc
    }

    /// Validate a proposal and enqueue it as a `pending` feedback item.
    ///
    /// Nothing is persisted when validation fails; a rejected submission
    /// leaves no trace in the feedback queue.
    ///
    /// # Errors
    ///
    /// `MissingTargetId` / `UnexpectedTargetId` when `target_id` does not
    /// fit the operation, `Codec` when the payload has the wrong shape, and
    /// `ParentNotFound` / `TargetNotFound` when a referenced entity is
    /// missing or deleted.
    pub async fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<FeedbackItem, ReviewError> {
        match (
            submission.operation.requires_target_id(),
            submission.target_id.as_deref(),
        ) {
            (true, None) => return Err(ReviewError::MissingTargetId(submission.operation)),
            (false, Some(_)) => return Err(ReviewError::UnexpectedTargetId),
            _ => {}
        }

        self.registry
            .submission_validator(submission.target_kind)
            .validate_submission(
                &self.svc,
                submission.operation,
                submission.target_id.as_deref(),
                &submission.payload,
            )
            .await?;

        let item = self
            .svc
            .create_feedback(
                submission.target_kind,
                submission.operation,
                submission.target_id.as_deref(),
                submission.risk_level,
                &submission.payload,
            )
            .await?;

        info!(
            feedback_id = %item.id,
            target_kind = %item.target_kind,
            operation = %item.operation,
            risk_level = %item.risk_level,
            "accepted feedback submission"
        );
        Ok(item)
    }

    /// Apply a reviewer action, moving the item one step through the state
    /// machine.
    ///
    /// # Errors
    ///
    /// `MissingReviewNotes` when a rejection carries no notes, and
    /// `IllegalTransition` when the action has no edge from the item's
    /// current status (wrong tier, terminal state, or already merged).
    pub async fn process(
        &self,
        feedback_id: &str,
        action: ReviewAction,
        notes: Option<&str>,
    ) -> Result<FeedbackItem, ReviewError> {
        if action.is_rejection() && notes.is_none_or(|n| n.trim().is_empty()) {
            return Err(ReviewError::MissingReviewNotes(action));
        }

        let item = self.svc.get_feedback(feedback_id).await?;
        let next = item
            .status
            .after_review(action)
            .ok_or(ReviewError::IllegalTransition {
                current: item.status,
                action: action.into(),
            })?;

        let updated = self.svc.transition_feedback(feedback_id, next, notes).await?;
        info!(feedback_id, action = %action, status = %updated.status, "reviewed feedback");
        Ok(updated)
    }

    /// Merge a human-approved feedback item into the knowledge base.
    ///
    /// Re-validates referential integrity first: the knowledge base may have
    /// changed since the approvals were granted. The entity mutation and the
    /// transition to `merged` happen in one transaction; on any failure the
    /// transaction rolls back, the failure is recorded in `review_notes`,
    /// and the item stays `human_approved` for retry.
    ///
    /// # Errors
    ///
    /// `IllegalTransition` when the item is not `human_approved`, plus any
    /// validation or persistence error from applying the change.
    pub async fn merge(&self, feedback_id: &str) -> Result<MergeOutcome, ReviewError> {
        let item = self.svc.get_feedback(feedback_id).await?;
        if !item.status.can_transition_to(FeedbackStatus::Merged) {
            return Err(ReviewError::IllegalTransition {
                current: item.status,
                action: WorkflowAction::Merge,
            });
        }

        self.svc.db().begin().await?;
        match self.apply(&item).await {
            Ok(entity_id) => {
                self.svc.db().commit().await?;
                info!(
                    feedback_id,
                    entity_id = %entity_id,
                    target_kind = %item.target_kind,
                    operation = %item.operation,
                    "merged feedback"
                );
                Ok(MergeOutcome {
                    feedback_id: item.id,
                    entity_id,
                })
            }
            Err(err) => {
                self.svc.db().rollback().await?;
                warn!(feedback_id, error = %err, "merge failed, rolled back");
                self.svc
                    .set_feedback_notes(feedback_id, &format!("merge failed: {err}"))
                    .await?;
                Err(err)
            }
        }
    }

    /// The transactional body of a merge: re-check, apply, transition, audit.
    async fn apply(&self, item: &FeedbackItem) -> Result<String, ReviewError> {
        self.registry
            .merge_validator(item.target_kind)
            .validate_merge(&self.svc, item)
            .await?;

        let entity_id = self
            .registry
            .merge_strategy(item.target_kind)
            .merge(&self.svc, item)
            .await?;

        self.svc
            .transition_feedback(&item.id, FeedbackStatus::Merged, None)
            .await?;

        let detail = MergedDetail {
            target_kind: item.target_kind.as_str().to_string(),
            operation: item.operation.as_str().to_string(),
            entity_id: entity_id.clone(),
        };
        let detail = serde_json::to_value(&detail)
            .map_err(|e| ReviewError::Database(DatabaseError::Other(anyhow::Error::from(e))))?;
        self.svc
            .append_audit(EntityType::Feedback, &item.id, AuditAction::Merged, Some(&detail))
            .await?;

        Ok(entity_id)
    }
}
