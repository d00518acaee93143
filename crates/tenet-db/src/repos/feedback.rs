//! Feedback item repository — the persisted proposal aggregate.
//!
//! Feedback rows are append-then-transition: there is no delete method, and
//! only `status`, `review_notes`, and `updated_at` change after insertion.
//! The review workflow decides *which* transition applies; this repo refuses
//! any edge the state machine does not allow, as the last line of defense.

use chrono::Utc;

use tenet_core::audit_detail::StatusChangedDetail;
use tenet_core::entities::FeedbackItem;
use tenet_core::enums::{AuditAction, EntityType, FeedbackStatus, OperationKind, RiskLevel, TargetKind};
use tenet_core::ids::PREFIX_FEEDBACK;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_json};
use crate::service::TenetService;

const SELECT_COLS: &str = "id, target_kind, operation, target_id, risk_level, payload, \
                           status, review_notes, created_at, updated_at";

fn row_to_feedback(row: &libsql::Row) -> Result<FeedbackItem, DatabaseError> {
    Ok(FeedbackItem {
        id: row.get(0)?,
        target_kind: parse_enum(&row.get::<String>(1)?)?,
        operation: parse_enum(&row.get::<String>(2)?)?,
        target_id: get_opt_string(row, 3)?,
        risk_level: parse_enum(&row.get::<String>(4)?)?,
        payload: parse_json(&row.get::<String>(5)?)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        review_notes: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl TenetService {
    /// Insert a new feedback item in `Pending` state.
    ///
    /// Callers (the review workflow) are responsible for validating the
    /// payload and the `target_id` invariant first; this method only persists.
    pub async fn create_feedback(
        &self,
        target_kind: TargetKind,
        operation: OperationKind,
        target_id: Option<&str>,
        risk_level: RiskLevel,
        payload: &serde_json::Value,
    ) -> Result<FeedbackItem, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FEEDBACK).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO feedback_items ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    target_kind.as_str(),
                    operation.as_str(),
                    target_id,
                    risk_level.as_str(),
                    payload.to_string(),
                    FeedbackStatus::Pending.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.append_audit(EntityType::Feedback, &id, AuditAction::Created, None)
            .await?;

        Ok(FeedbackItem {
            id,
            target_kind,
            operation,
            target_id: target_id.map(String::from),
            risk_level,
            payload: payload.clone(),
            status: FeedbackStatus::Pending,
            review_notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_feedback(&self, id: &str) -> Result<FeedbackItem, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM feedback_items WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_feedback(&row)
    }

    /// Move a feedback item along one state-machine edge.
    ///
    /// `notes` overwrites `review_notes` when `Some` (rejections and merge
    /// failures); `None` leaves the existing notes untouched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the current status has no
    /// edge to `next`. The row is left unchanged in that case.
    pub async fn transition_feedback(
        &self,
        id: &str,
        next: FeedbackStatus,
        notes: Option<&str>,
    ) -> Result<FeedbackItem, DatabaseError> {
        let current = self.get_feedback(id).await?;

        if !current.status.can_transition_to(next) {
            return Err(DatabaseError::InvalidState(format!(
                "Cannot transition feedback {} from {} to {}",
                id, current.status, next
            )));
        }

        let now = Utc::now();
        match notes {
            Some(notes) => {
                self.db()
                    .conn()
                    .execute(
                        "UPDATE feedback_items SET status = ?1, review_notes = ?2, updated_at = ?3
                         WHERE id = ?4",
                        libsql::params![next.as_str(), notes, now.to_rfc3339(), id],
                    )
                    .await?;
            }
            None => {
                self.db()
                    .conn()
                    .execute(
                        "UPDATE feedback_items SET status = ?1, updated_at = ?2 WHERE id = ?3",
                        libsql::params![next.as_str(), now.to_rfc3339(), id],
                    )
                    .await?;
            }
        }

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: next.as_str().to_string(),
            reason: notes.map(String::from),
        };
        let detail = serde_json::to_value(&detail).map_err(|e| DatabaseError::Other(e.into()))?;
        self.append_audit(EntityType::Feedback, id, AuditAction::StatusChanged, Some(&detail))
            .await?;

        Ok(FeedbackItem {
            status: next,
            review_notes: notes.map(String::from).or(current.review_notes.clone()),
            updated_at: now,
            ..current
        })
    }

    /// Record a merge failure in `review_notes` without changing status.
    pub async fn set_feedback_notes(
        &self,
        id: &str,
        notes: &str,
    ) -> Result<FeedbackItem, DatabaseError> {
        let current = self.get_feedback(id).await?;

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE feedback_items SET review_notes = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![notes, now.to_rfc3339(), id],
            )
            .await?;

        let detail = serde_json::json!({ "review_notes": notes });
        self.append_audit(EntityType::Feedback, id, AuditAction::Updated, Some(&detail))
            .await?;

        Ok(FeedbackItem {
            review_notes: Some(notes.to_string()),
            updated_at: now,
            ..current
        })
    }

    /// List feedback items in a given status, oldest first (review queue order).
    pub async fn list_feedback_by_status(
        &self,
        status: FeedbackStatus,
        limit: u32,
    ) -> Result<Vec<FeedbackItem>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM feedback_items
                     WHERE status = ?1 ORDER BY created_at LIMIT {limit}"
                ),
                [status.as_str()],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_feedback(&row)?);
        }
        Ok(items)
    }
}
