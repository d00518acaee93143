//! Coding rule validation and merge.
//!
//! Coding rules are the one kind that is both a target and a parent, so a
//! `delete` here is what the stale-parent re-check on rule examples and
//! checklist items defends against.

use async_trait::async_trait;

use tenet_core::commands::{self, CodingRuleDraft, CodingRuleUpdate};
use tenet_core::entities::FeedbackItem;
use tenet_core::enums::{OperationKind, TargetKind};
use tenet_db::service::TenetService;

use super::{check_payload_id, require_parent, require_row, require_target_id};
use crate::error::ReviewError;
use crate::registry::{MergeStrategy, MergeValidator, SubmissionValidator};

const KIND: TargetKind = TargetKind::CodingRule;

pub struct CodingRuleTarget;

async fn check_refs(
    svc: &TenetService,
    operation: OperationKind,
    target_id: Option<&str>,
    payload: &serde_json::Value,
) -> Result<(), ReviewError> {
    match operation {
        OperationKind::Add => {
            let draft: CodingRuleDraft = commands::decode(KIND, operation, payload)?;
            require_parent(
                svc.get_convention(&draft.convention_id).await,
                KIND,
                &draft.convention_id,
            )?;
            Ok(())
        }
        OperationKind::Modify => {
            let update: CodingRuleUpdate = commands::decode(KIND, operation, payload)?;
            let id = require_target_id(operation, target_id)?;
            check_payload_id(id, &update.id)?;
            require_row(svc.get_coding_rule(id).await, KIND, id)?;
            Ok(())
        }
        OperationKind::Delete => {
            let id = require_target_id(operation, target_id)?;
            require_row(svc.get_coding_rule(id).await, KIND, id)?;
            Ok(())
        }
    }
}

#[async_trait]
impl SubmissionValidator for CodingRuleTarget {
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
impl MergeValidator for CodingRuleTarget {
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
impl MergeStrategy for CodingRuleTarget {
    fn target_kind(&self) -> TargetKind {
        KIND
    }

    async fn merge(&self, svc: &TenetService, item: &FeedbackItem) -> Result<String, ReviewError> {
        match item.operation {
            OperationKind::Add => {
                let draft: CodingRuleDraft = commands::decode(KIND, item.operation, &item.payload)?;
                let created = svc.create_coding_rule(&draft).await?;
                Ok(created.id)
            }
            OperationKind::Modify => {
                let update: CodingRuleUpdate =
                    commands::decode(KIND, item.operation, &item.payload)?;
                let updated = require_row(svc.update_coding_rule(&update).await, KIND, &update.id)?;
                Ok(updated.id)
            }
            OperationKind::Delete => {
                let id = require_target_id(item.operation, item.target_id.as_deref())?;
                let deleted = require_row(svc.soft_delete_coding_rule(id).await, KIND, id)?;
                Ok(deleted.id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenet_db::service::TenetService;

    #[tokio::test]
    async fn add_requires_active_convention() {
        let svc = TenetService::new_local(":memory:").await.unwrap();
        let convention = svc.create_convention("House style", None).await.unwrap();

        let payload = json!({ "convention_id": convention.id, "title": "No bare unwrap" });
        check_refs(&svc, OperationKind::Add, None, &payload)
            .await
            .unwrap();

        svc.soft_delete_convention(&convention.id).await.unwrap();
        let err = check_refs(&svc, OperationKind::Add, None, &payload)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewError::ParentNotFound {
                target: TargetKind::CodingRule,
                ..
            }
        ));
    }
}
