//! Coding rule repository.
//!
//! Coding rules are both a feedback target kind and the parent entity for
//! rule examples and checklist items, so this repo serves both the merge
//! strategies and the parent-existence checks.

use chrono::Utc;

use tenet_core::commands::{CodingRuleDraft, CodingRuleUpdate};
use tenet_core::entities::CodingRule;
use tenet_core::enums::{AuditAction, EntityType};
use tenet_core::ids::PREFIX_CODING_RULE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::TenetService;

const SELECT_COLS: &str =
    "id, convention_id, title, rationale, created_at, updated_at, deleted_at";

fn row_to_rule(row: &libsql::Row) -> Result<CodingRule, DatabaseError> {
    Ok(CodingRule {
        id: row.get(0)?,
        convention_id: row.get(1)?,
        title: row.get(2)?,
        rationale: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
    })
}

impl TenetService {
    pub async fn create_coding_rule(
        &self,
        draft: &CodingRuleDraft,
    ) -> Result<CodingRule, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CODING_RULE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO coding_rules ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)"
                ),
                libsql::params![
                    id.as_str(),
                    draft.convention_id.as_str(),
                    draft.title.as_str(),
                    draft.rationale.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.append_audit(EntityType::CodingRule, &id, AuditAction::Created, None)
            .await?;

        Ok(CodingRule {
            id,
            convention_id: draft.convention_id.clone(),
            title: draft.title.clone(),
            rationale: draft.rationale.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch an active (not soft-deleted) coding rule.
    pub async fn get_coding_rule(&self, id: &str) -> Result<CodingRule, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM coding_rules WHERE id = ?1 AND deleted_at IS NULL"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_rule(&row)
    }

    /// Fetch a coding rule regardless of soft-delete state.
    pub async fn find_coding_rule_any(&self, id: &str) -> Result<CodingRule, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM coding_rules WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_rule(&row)
    }

    /// Apply a partial update. Only `Some` fields overwrite; the rest keep
    /// their current value.
    pub async fn update_coding_rule(
        &self,
        update: &CodingRuleUpdate,
    ) -> Result<CodingRule, DatabaseError> {
        // The target must exist and be active.
        self.get_coding_rule(&update.id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(ref rationale) = update.rationale {
            sets.push(format!("rationale = ?{idx}"));
            params.push(rationale.clone().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_coding_rule(&update.id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(update.id.as_str().into());
        let sql = format!("UPDATE coding_rules SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        let updated = self.get_coding_rule(&update.id).await?;

        let detail = serde_json::to_value(update).map_err(|e| DatabaseError::Other(e.into()))?;
        self.append_audit(EntityType::CodingRule, &update.id, AuditAction::Updated, Some(&detail))
            .await?;

        Ok(updated)
    }

    /// Soft-delete a coding rule. No-op if it is already deleted.
    pub async fn soft_delete_coding_rule(&self, id: &str) -> Result<CodingRule, DatabaseError> {
        let current = self.find_coding_rule_any(id).await?;
        if current.deleted_at.is_some() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE coding_rules SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::CodingRule, id, AuditAction::SoftDeleted, None)
            .await?;

        Ok(CodingRule {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Restore a soft-deleted coding rule. No-op if it is already active.
    pub async fn restore_coding_rule(&self, id: &str) -> Result<CodingRule, DatabaseError> {
        let current = self.find_coding_rule_any(id).await?;
        if current.deleted_at.is_none() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE coding_rules SET deleted_at = NULL, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::CodingRule, id, AuditAction::Restored, None)
            .await?;

        Ok(CodingRule {
            deleted_at: None,
            updated_at: now,
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{seed_rule, test_service};

    #[tokio::test]
    async fn create_rule_roundtrip() {
        let svc = test_service().await;
        let (convention_id, rule_id) = seed_rule(&svc).await;

        let fetched = svc.get_coding_rule(&rule_id).await.unwrap();
        assert!(fetched.id.starts_with("rul-"));
        assert_eq!(fetched.convention_id, convention_id);
        assert_eq!(fetched.title, "Propagate errors with ?");
    }

    #[tokio::test]
    async fn partial_update_keeps_omitted_fields() {
        let svc = test_service().await;
        let (convention_id, _) = seed_rule(&svc).await;

        let rule = svc
            .create_coding_rule(&CodingRuleDraft {
                convention_id,
                title: "Original title".to_string(),
                rationale: Some("Original rationale".to_string()),
            })
            .await
            .unwrap();

        let updated = svc
            .update_coding_rule(&CodingRuleUpdate {
                id: rule.id.clone(),
                title: Some("New title".to_string()),
                rationale: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.rationale.as_deref(), Some("Original rationale"));
    }

    #[tokio::test]
    async fn empty_update_is_noop() {
        let svc = test_service().await;
        let (_, rule_id) = seed_rule(&svc).await;

        let updated = svc
            .update_coding_rule(&CodingRuleUpdate {
                id: rule_id.clone(),
                title: None,
                rationale: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.id, rule_id);
    }

    #[tokio::test]
    async fn update_missing_rule_fails() {
        let svc = test_service().await;
        let result = svc
            .update_coding_rule(&CodingRuleUpdate {
                id: "rul-missing0".to_string(),
                title: Some("Nope".to_string()),
                rationale: None,
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn soft_delete_then_update_fails() {
        let svc = test_service().await;
        let (_, rule_id) = seed_rule(&svc).await;

        svc.soft_delete_coding_rule(&rule_id).await.unwrap();

        let result = svc
            .update_coding_rule(&CodingRuleUpdate {
                id: rule_id,
                title: Some("Too late".to_string()),
                rationale: None,
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn mutations_are_audited() {
        let svc = test_service().await;
        let (_, rule_id) = seed_rule(&svc).await;

        svc.update_coding_rule(&CodingRuleUpdate {
            id: rule_id.clone(),
            title: Some("Audited".to_string()),
            rationale: None,
        })
        .await
        .unwrap();
        svc.soft_delete_coding_rule(&rule_id).await.unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(rule_id),
                ..Default::default()
            })
            .await
            .unwrap();
        let actions: Vec<_> = entries.iter().map(|e| e.action).collect();
        assert!(actions.contains(&AuditAction::Created));
        assert!(actions.contains(&AuditAction::Updated));
        assert!(actions.contains(&AuditAction::SoftDeleted));
    }
}
