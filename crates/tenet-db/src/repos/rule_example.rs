//! Rule example repository.

use chrono::Utc;

use tenet_core::commands::{RuleExampleDraft, RuleExampleUpdate};
use tenet_core::entities::RuleExample;
use tenet_core::enums::{AuditAction, EntityType};
use tenet_core::ids::PREFIX_RULE_EXAMPLE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::TenetService;

const SELECT_COLS: &str = "id, coding_rule_id, title, good_code, bad_code, explanation, \
                           created_at, updated_at, deleted_at";

fn row_to_example(row: &libsql::Row) -> Result<RuleExample, DatabaseError> {
    Ok(RuleExample {
        id: row.get(0)?,
        coding_rule_id: row.get(1)?,
        title: row.get(2)?,
        good_code: get_opt_string(row, 3)?,
        bad_code: get_opt_string(row, 4)?,
        explanation: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
    })
}

impl TenetService {
    pub async fn create_rule_example(
        &self,
        draft: &RuleExampleDraft,
    ) -> Result<RuleExample, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_RULE_EXAMPLE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO rule_examples ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL)"
                ),
                libsql::params![
                    id.as_str(),
                    draft.coding_rule_id.as_str(),
                    draft.title.as_str(),
                    draft.good_code.as_deref(),
                    draft.bad_code.as_deref(),
                    draft.explanation.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.append_audit(EntityType::RuleExample, &id, AuditAction::Created, None)
            .await?;

        Ok(RuleExample {
            id,
            coding_rule_id: draft.coding_rule_id.clone(),
            title: draft.title.clone(),
            good_code: draft.good_code.clone(),
            bad_code: draft.bad_code.clone(),
            explanation: draft.explanation.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch an active (not soft-deleted) rule example.
    pub async fn get_rule_example(&self, id: &str) -> Result<RuleExample, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM rule_examples WHERE id = ?1 AND deleted_at IS NULL"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_example(&row)
    }

    /// Fetch a rule example regardless of soft-delete state.
    pub async fn find_rule_example_any(&self, id: &str) -> Result<RuleExample, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM rule_examples WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_example(&row)
    }

    /// Apply a partial update. Only `Some` fields overwrite.
    pub async fn update_rule_example(
        &self,
        update: &RuleExampleUpdate,
    ) -> Result<RuleExample, DatabaseError> {
        self.get_rule_example(&update.id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(ref good_code) = update.good_code {
            sets.push(format!("good_code = ?{idx}"));
            params.push(good_code.clone().into());
            idx += 1;
        }
        if let Some(ref bad_code) = update.bad_code {
            sets.push(format!("bad_code = ?{idx}"));
            params.push(bad_code.clone().into());
            idx += 1;
        }
        if let Some(ref explanation) = update.explanation {
            sets.push(format!("explanation = ?{idx}"));
            params.push(explanation.clone().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_rule_example(&update.id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(update.id.as_str().into());
        let sql = format!("UPDATE rule_examples SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        let updated = self.get_rule_example(&update.id).await?;

        let detail = serde_json::to_value(update).map_err(|e| DatabaseError::Other(e.into()))?;
        self.append_audit(EntityType::RuleExample, &update.id, AuditAction::Updated, Some(&detail))
            .await?;

        Ok(updated)
    }

    /// Soft-delete a rule example. No-op if it is already deleted.
    pub async fn soft_delete_rule_example(&self, id: &str) -> Result<RuleExample, DatabaseError> {
        let current = self.find_rule_example_any(id).await?;
        if current.deleted_at.is_some() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE rule_examples SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::RuleExample, id, AuditAction::SoftDeleted, None)
            .await?;

        Ok(RuleExample {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Restore a soft-deleted rule example. No-op if it is already active.
    pub async fn restore_rule_example(&self, id: &str) -> Result<RuleExample, DatabaseError> {
        let current = self.find_rule_example_any(id).await?;
        if current.deleted_at.is_none() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE rule_examples SET deleted_at = NULL, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::RuleExample, id, AuditAction::Restored, None)
            .await?;

        Ok(RuleExample {
            deleted_at: None,
            updated_at: now,
            ..current
        })
    }
}
