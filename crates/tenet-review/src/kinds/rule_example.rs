//! Rule example validation and merge.

use async_trait::async_trait;

use tenet_core::commands::{self, RuleExampleDraft, RuleExampleUpdate};
use tenet_core::entities::FeedbackItem;
use tenet_core::enums::{OperationKind, TargetKind};
use tenet_db::service::TenetService;

use super::{check_payload_id, require_parent, require_row, require_target_id};
use crate::error::ReviewError;
use crate::registry::{MergeStrategy, MergeValidator, SubmissionValidator};

const KIND: TargetKind = TargetKind::RuleExample;

pub struct RuleExampleTarget;

/// Shared by both validation phases: decode the payload and confirm the
/// entities it references are active.
async fn check_refs(
    svc: &TenetService,
    operation: OperationKind,
    target_id: Option<&str>,
    payload: &serde_json::Value,
) -> Result<(), ReviewError> {
    match operation {
        OperationKind::Add => {
            let draft: RuleExampleDraft = commands::decode(KIND, operation, payload)?;
            require_parent(
                svc.get_coding_rule(&draft.coding_rule_id).await,
                KIND,
                &draft.coding_rule_id,
            )?;
            Ok(())
        }
        OperationKind::Modify => {
            let update: RuleExampleUpdate = commands::decode(KIND, operation, payload)?;
            let id = require_target_id(operation, target_id)?;
            check_payload_id(id, &update.id)?;
            require_row(svc.get_rule_example(id).await, KIND, id)?;
            Ok(())
        }
        OperationKind::Delete => {
            let id = require_target_id(operation, target_id)?;
            require_row(svc.get_rule_example(id).await, KIND, id)?;
            Ok(())
        }
    }
}

#[async_trait]
impl SubmissionValidator for RuleExampleTarget {
    fn target_kind(&self) -> TargetKind {
        KIND
    }

    async fn validate_submission(
        &self,
        svc: &TenetService,
        operation: OperationKind,
        target_id: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<(), ReviewError> {
        check_refs(svc, operation, target_id, payload).await
    }
}

#[async_trait]
impl MergeValidator for RuleExampleTarget {
    fn target_kind(&self) -> TargetKind {
        KIND
    }

    async fn validate_merge(
        &self,
        svc: &TenetService,
        item: &FeedbackItem,
    ) -> Result<(), ReviewError> {
        check_refs(svc, item.operation, item.target_id.as_deref(), &item.payload).await
    }
}

#[async_trait]
impl MergeStrategy for RuleExampleTarget {
    fn target_kind(&self) -> TargetKind {
        KIND
    }

    async fn merge(&self, svc: &TenetService, item: &FeedbackItem) -> Result<String, ReviewError> {
        match item.operation {
            OperationKind::Add => {
                let draft: RuleExampleDraft =
                    commands::decode(KIND, item.operation, &item.payload)?;
                let created = svc.create_rule_example(&draft).await?;
                Ok(created.id)
            }
            OperationKind::Modify => {
                let update: RuleExampleUpdate =
                    commands::decode(KIND, item.operation, &item.payload)?;
                let updated = require_row(svc.update_rule_example(&update).await, KIND, &update.id)?;
                Ok(updated.id)
            }
            OperationKind::Delete => {
                let id = require_target_id(item.operation, item.target_id.as_deref())?;
                let deleted = require_row(svc.soft_delete_rule_example(id).await, KIND, id)?;
                Ok(deleted.id)
            }
        }
    }
}
