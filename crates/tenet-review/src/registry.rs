//! The per-kind capability registry.
//!
//! Each target kind contributes three capabilities: a submission validator,
//! a merge validator, and a merge strategy. The workflow never branches on
//! `TargetKind` itself — it looks the capability up here, so adding a kind
//! means registering one handler, not editing the orchestrator.

use std::collections::HashMap;

use async_trait::async_trait;

use tenet_core::entities::FeedbackItem;
use tenet_core::enums::{OperationKind, TargetKind};
use tenet_db::service::TenetService;

use crate::error::ReviewError;
use crate::kinds::{
    ArchUnitTestTarget, ChecklistItemTarget, ClassTemplateTarget, CodingRuleTarget,
    RuleExampleTarget,
};

/// Validates a raw submission before a feedback row is created.
#[async_trait]
pub trait SubmissionValidator: Send + Sync {
    fn target_kind(&self) -> TargetKind;

    /// Check payload shape and referential integrity for a would-be
    /// feedback item.
    async fn validate_submission(
        &self,
        svc: &TenetService,
        operation: OperationKind,
        target_id: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<(), ReviewError>;
}

/// Re-validates an approved feedback item immediately before merge.
///
/// The knowledge base may have changed since submission; an approval is
/// only good for the state it was granted under.
#[async_trait]
pub trait MergeValidator: Send + Sync {
    fn target_kind(&self) -> TargetKind;

    async fn validate_merge(
        &self,
        svc: &TenetService,
        item: &FeedbackItem,
    ) -> Result<(), ReviewError>;
}

/// Applies an approved feedback item to the knowledge base.
///
/// Runs inside the transaction owned by the merge workflow; implementations
/// must not begin or commit themselves.
#[async_trait]
pub trait MergeStrategy: Send + Sync {
    fn target_kind(&self) -> TargetKind;

    /// Apply the proposed change. Returns the id of the entity created,
    /// modified, or soft-deleted.
    async fn merge(&self, svc: &TenetService, item: &FeedbackItem) -> Result<String, ReviewError>;
}

/// Dispatch table from target kind to its three capabilities.
pub struct TargetRegistry {
    submission: HashMap<TargetKind, Box<dyn SubmissionValidator>>,
    merge_checks: HashMap<TargetKind, Box<dyn MergeValidator>>,
    strategies: HashMap<TargetKind, Box<dyn MergeStrategy>>,
}

impl TargetRegistry {
    /// Build the registry with handlers for every target kind.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            submission: HashMap::new(),
            merge_checks: HashMap::new(),
            strategies: HashMap::new(),
        };
        registry.register(
            Box::new(RuleExampleTarget),
            Box::new(RuleExampleTarget),
            Box::new(RuleExampleTarget),
        );
        registry.register(
            Box::new(ClassTemplateTarget),
            Box::new(ClassTemplateTarget),
            Box::new(ClassTemplateTarget),
        );
        registry.register(
            Box::new(CodingRuleTarget),
            Box::new(CodingRuleTarget),
            Box::new(CodingRuleTarget),
        );
        registry.register(
            Box::new(ChecklistItemTarget),
            Box::new(ChecklistItemTarget),
            Box::new(ChecklistItemTarget),
        );
        registry.register(
            Box::new(ArchUnitTestTarget),
            Box::new(ArchUnitTestTarget),
            Box::new(ArchUnitTestTarget),
        );
        registry
    }

    fn register(
        &mut self,
        submission: Box<dyn SubmissionValidator>,
        merge_check: Box<dyn MergeValidator>,
        strategy: Box<dyn MergeStrategy>,
    ) {
        self.submission.insert(submission.target_kind(), submission);
        self.merge_checks.insert(merge_check.target_kind(), merge_check);
        self.strategies.insert(strategy.target_kind(), strategy);
    }

    // Invariant: `with_defaults` registers every `TargetKind` variant, so
    // lookups cannot miss. `all_kinds_registered` pins this.

    #[must_use]
    pub fn submission_validator(&self, kind: TargetKind) -> &dyn SubmissionValidator {
        self.submission
            .get(&kind)
            .expect("every target kind is registered")
            .as_ref()
    }

    #[must_use]
    pub fn merge_validator(&self, kind: TargetKind) -> &dyn MergeValidator {
        self.merge_checks
            .get(&kind)
            .expect("every target kind is registered")
            .as_ref()
    }

    #[must_use]
    pub fn merge_strategy(&self, kind: TargetKind) -> &dyn MergeStrategy {
        self.strategies
            .get(&kind)
            .expect("every target kind is registered")
            .as_ref()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
