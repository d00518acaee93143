use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{FeedbackStatus, OperationKind, RiskLevel, TargetKind};

/// A persisted proposal to add, modify, or delete a knowledge-base entity.
///
/// `target_kind`, `operation`, `target_id`, `risk_level`, and `payload` are
/// fixed at submission; only `status`, `review_notes`, and `updated_at`
/// mutate afterwards. Feedback rows are never physically deleted — the full
/// history of proposals is the audit trail of the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FeedbackItem {
    pub id: String,
    pub target_kind: TargetKind,
    pub operation: OperationKind,
    /// Identifier of the entity being modified or deleted. `None` for adds.
    pub target_id: Option<String>,
    pub risk_level: RiskLevel,
    /// Opaque structured payload; its shape is determined by
    /// (`target_kind`, `operation`) and decoded by the payload codec.
    pub payload: serde_json::Value,
    pub status: FeedbackStatus,
    /// Set when a review action rejects the item or a merge attempt fails.
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
