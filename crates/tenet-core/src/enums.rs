//! Kind, risk, and status enums for Tenet.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `FeedbackStatus` carries the review state machine; `after_review` is the
//! single edge table consulted by the workflow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TargetKind
// ---------------------------------------------------------------------------

/// Kind of knowledge-base entity a feedback item targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    RuleExample,
    ClassTemplate,
    CodingRule,
    ChecklistItem,
    ArchUnitTest,
}

/// All target kinds, in dispatch-table order.
pub const ALL_TARGET_KINDS: [TargetKind; 5] = [
    TargetKind::RuleExample,
    TargetKind::ClassTemplate,
    TargetKind::CodingRule,
    TargetKind::ChecklistItem,
    TargetKind::ArchUnitTest,
];

impl TargetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RuleExample => "rule_example",
            Self::ClassTemplate => "class_template",
            Self::CodingRule => "coding_rule",
            Self::ChecklistItem => "checklist_item",
            Self::ArchUnitTest => "arch_unit_test",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ParentKind
// ---------------------------------------------------------------------------

/// Kind of entity that must already exist for an `Add` to be admissible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Convention,
    PackageStructure,
    CodingRule,
}

impl ParentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Convention => "convention",
            Self::PackageStructure => "package_structure",
            Self::CodingRule => "coding_rule",
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OperationKind
// ---------------------------------------------------------------------------

/// Kind of change a feedback item proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Modify,
    Delete,
}

impl OperationKind {
    /// Whether this operation addresses an existing entity via `target_id`.
    #[must_use]
    pub const fn requires_target_id(self) -> bool {
        matches!(self, Self::Modify | Self::Delete)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Risk classification supplied by the submitter, consumed by review policy.
///
/// Tenet stores this verbatim and never infers it from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Medium,
    Dangerous,
}

impl RiskLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Medium => "medium",
            Self::Dangerous => "dangerous",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReviewAction
// ---------------------------------------------------------------------------

/// Reviewer action applied to a feedback item at one of the two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    LlmApprove,
    LlmReject,
    HumanApprove,
    HumanReject,
}

impl ReviewAction {
    /// Rejections must carry non-empty review notes.
    #[must_use]
    pub const fn is_rejection(self) -> bool {
        matches!(self, Self::LlmReject | Self::HumanReject)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LlmApprove => "llm_approve",
            Self::LlmReject => "llm_reject",
            Self::HumanApprove => "human_approve",
            Self::HumanReject => "human_reject",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FeedbackStatus
// ---------------------------------------------------------------------------

/// Status of a feedback item through the review and merge lifecycle.
///
/// ```text
/// pending → llm_approved → human_approved → merged
///         → llm_rejected   → human_rejected
/// ```
///
/// `llm_rejected`, `human_rejected`, and `merged` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Pending,
    LlmApproved,
    LlmRejected,
    HumanApproved,
    HumanRejected,
    Merged,
}

impl FeedbackStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::LlmApproved, Self::LlmRejected],
            Self::LlmApproved => &[Self::HumanApproved, Self::HumanRejected],
            Self::HumanApproved => &[Self::Merged],
            Self::LlmRejected | Self::HumanRejected | Self::Merged => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether the state has no outgoing edges.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_next_states().is_empty()
    }

    /// The single review edge table: the state reached by applying `action`
    /// from the current state, or `None` when no such edge exists.
    ///
    /// The merge edge (`human_approved → merged`) is not a review action and
    /// is driven separately by the merge command.
    #[must_use]
    pub const fn after_review(self, action: ReviewAction) -> Option<Self> {
        match (self, action) {
            (Self::Pending, ReviewAction::LlmApprove) => Some(Self::LlmApproved),
            (Self::Pending, ReviewAction::LlmReject) => Some(Self::LlmRejected),
            (Self::LlmApproved, ReviewAction::HumanApprove) => Some(Self::HumanApproved),
            (Self::LlmApproved, ReviewAction::HumanReject) => Some(Self::HumanRejected),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::LlmApproved => "llm_approved",
            Self::LlmRejected => "llm_rejected",
            Self::HumanApproved => "human_approved",
            Self::HumanRejected => "human_rejected",
            Self::Merged => "merged",
        }
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Convention,
    PackageStructure,
    CodingRule,
    RuleExample,
    ChecklistItem,
    ClassTemplate,
    ArchUnitTest,
    Feedback,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Convention => "convention",
            Self::PackageStructure => "package_structure",
            Self::CodingRule => "coding_rule",
            Self::RuleExample => "rule_example",
            Self::ChecklistItem => "checklist_item",
            Self::ClassTemplate => "class_template",
            Self::ArchUnitTest => "arch_unit_test",
            Self::Feedback => "feedback",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    SoftDeleted,
    Restored,
    StatusChanged,
    Merged,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::SoftDeleted => "soft_deleted",
            Self::Restored => "restored",
            Self::StatusChanged => "status_changed",
            Self::Merged => "merged",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Serde roundtrip tests ---

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        target_rule_example,
        TargetKind,
        TargetKind::RuleExample,
        "rule_example"
    );
    test_serde_roundtrip!(
        target_arch_unit_test,
        TargetKind,
        TargetKind::ArchUnitTest,
        "arch_unit_test"
    );

    test_serde_roundtrip!(
        parent_package_structure,
        ParentKind,
        ParentKind::PackageStructure,
        "package_structure"
    );

    test_serde_roundtrip!(op_add, OperationKind, OperationKind::Add, "add");
    test_serde_roundtrip!(op_modify, OperationKind, OperationKind::Modify, "modify");

    test_serde_roundtrip!(risk_safe, RiskLevel, RiskLevel::Safe, "safe");
    test_serde_roundtrip!(risk_dangerous, RiskLevel, RiskLevel::Dangerous, "dangerous");

    test_serde_roundtrip!(
        action_llm_approve,
        ReviewAction,
        ReviewAction::LlmApprove,
        "llm_approve"
    );
    test_serde_roundtrip!(
        action_human_reject,
        ReviewAction,
        ReviewAction::HumanReject,
        "human_reject"
    );

    test_serde_roundtrip!(
        status_pending,
        FeedbackStatus,
        FeedbackStatus::Pending,
        "pending"
    );
    test_serde_roundtrip!(
        status_llm_approved,
        FeedbackStatus,
        FeedbackStatus::LlmApproved,
        "llm_approved"
    );
    test_serde_roundtrip!(
        status_merged,
        FeedbackStatus,
        FeedbackStatus::Merged,
        "merged"
    );

    test_serde_roundtrip!(
        entity_checklist_item,
        EntityType,
        EntityType::ChecklistItem,
        "checklist_item"
    );

    test_serde_roundtrip!(
        audit_soft_deleted,
        AuditAction,
        AuditAction::SoftDeleted,
        "soft_deleted"
    );

    // --- Transition tests ---

    #[test]
    fn feedback_valid_transitions() {
        assert!(FeedbackStatus::Pending.can_transition_to(FeedbackStatus::LlmApproved));
        assert!(FeedbackStatus::Pending.can_transition_to(FeedbackStatus::LlmRejected));
        assert!(FeedbackStatus::LlmApproved.can_transition_to(FeedbackStatus::HumanApproved));
        assert!(FeedbackStatus::LlmApproved.can_transition_to(FeedbackStatus::HumanRejected));
        assert!(FeedbackStatus::HumanApproved.can_transition_to(FeedbackStatus::Merged));
    }

    #[test]
    fn feedback_invalid_transitions() {
        assert!(!FeedbackStatus::Pending.can_transition_to(FeedbackStatus::HumanApproved));
        assert!(!FeedbackStatus::Pending.can_transition_to(FeedbackStatus::Merged));
        assert!(!FeedbackStatus::LlmApproved.can_transition_to(FeedbackStatus::Merged));
        assert!(!FeedbackStatus::Merged.can_transition_to(FeedbackStatus::Pending));
    }

    #[test]
    fn feedback_terminal_states() {
        assert!(FeedbackStatus::LlmRejected.is_terminal());
        assert!(FeedbackStatus::HumanRejected.is_terminal());
        assert!(FeedbackStatus::Merged.is_terminal());
        assert!(!FeedbackStatus::Pending.is_terminal());
        assert!(!FeedbackStatus::HumanApproved.is_terminal());
    }

    #[test]
    fn after_review_matches_edge_table() {
        assert_eq!(
            FeedbackStatus::Pending.after_review(ReviewAction::LlmApprove),
            Some(FeedbackStatus::LlmApproved)
        );
        assert_eq!(
            FeedbackStatus::Pending.after_review(ReviewAction::LlmReject),
            Some(FeedbackStatus::LlmRejected)
        );
        assert_eq!(
            FeedbackStatus::LlmApproved.after_review(ReviewAction::HumanApprove),
            Some(FeedbackStatus::HumanApproved)
        );
        assert_eq!(
            FeedbackStatus::LlmApproved.after_review(ReviewAction::HumanReject),
            Some(FeedbackStatus::HumanRejected)
        );
    }

    #[test]
    fn after_review_rejects_skipped_tiers() {
        assert_eq!(
            FeedbackStatus::Pending.after_review(ReviewAction::HumanApprove),
            None
        );
        assert_eq!(
            FeedbackStatus::HumanApproved.after_review(ReviewAction::HumanApprove),
            None
        );
        assert_eq!(
            FeedbackStatus::Merged.after_review(ReviewAction::LlmApprove),
            None
        );
        assert_eq!(
            FeedbackStatus::LlmRejected.after_review(ReviewAction::LlmApprove),
            None
        );
    }

    #[test]
    fn after_review_agrees_with_allowed_next_states() {
        let actions = [
            ReviewAction::LlmApprove,
            ReviewAction::LlmReject,
            ReviewAction::HumanApprove,
            ReviewAction::HumanReject,
        ];
        let states = [
            FeedbackStatus::Pending,
            FeedbackStatus::LlmApproved,
            FeedbackStatus::LlmRejected,
            FeedbackStatus::HumanApproved,
            FeedbackStatus::HumanRejected,
            FeedbackStatus::Merged,
        ];
        for state in states {
            for action in actions {
                if let Some(next) = state.after_review(action) {
                    assert!(state.can_transition_to(next), "{state} --{action}--> {next}");
                }
            }
        }
    }

    #[test]
    fn rejection_actions() {
        assert!(ReviewAction::LlmReject.is_rejection());
        assert!(ReviewAction::HumanReject.is_rejection());
        assert!(!ReviewAction::LlmApprove.is_rejection());
        assert!(!ReviewAction::HumanApprove.is_rejection());
    }

    #[test]
    fn operation_target_id_requirement() {
        assert!(!OperationKind::Add.requires_target_id());
        assert!(OperationKind::Modify.requires_target_id());
        assert!(OperationKind::Delete.requires_target_id());
    }

    // --- Display / as_str tests ---

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", TargetKind::ClassTemplate), "class_template");
        assert_eq!(format!("{}", ParentKind::CodingRule), "coding_rule");
        assert_eq!(format!("{}", OperationKind::Delete), "delete");
        assert_eq!(format!("{}", RiskLevel::Medium), "medium");
        assert_eq!(format!("{}", ReviewAction::LlmReject), "llm_reject");
        assert_eq!(format!("{}", FeedbackStatus::HumanApproved), "human_approved");
        assert_eq!(format!("{}", EntityType::Feedback), "feedback");
        assert_eq!(format!("{}", AuditAction::StatusChanged), "status_changed");
    }
}
