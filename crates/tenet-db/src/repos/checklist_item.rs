//! Checklist item repository.

use chrono::Utc;

use tenet_core::commands::{ChecklistItemDraft, ChecklistItemUpdate};
use tenet_core::entities::ChecklistItem;
use tenet_core::enums::{AuditAction, EntityType};
use tenet_core::ids::PREFIX_CHECKLIST_ITEM;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::TenetService;

const SELECT_COLS: &str = "id, coding_rule_id, content, created_at, updated_at, deleted_at";

fn row_to_item(row: &libsql::Row) -> Result<ChecklistItem, DatabaseError> {
    Ok(ChecklistItem {
        id: row.get(0)?,
        coding_rule_id: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
    })
}

impl TenetService {
    pub async fn create_checklist_item(
        &self,
        draft: &ChecklistItemDraft,
    ) -> Result<ChecklistItem, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CHECKLIST_ITEM).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO checklist_items ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, NULL)"
                ),
                libsql::params![
                    id.as_str(),
                    draft.coding_rule_id.as_str(),
                    draft.content.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.append_audit(EntityType::ChecklistItem, &id, AuditAction::Created, None)
            .await?;

        Ok(ChecklistItem {
            id,
            coding_rule_id: draft.coding_rule_id.clone(),
            content: draft.content.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch an active (not soft-deleted) checklist item.
    pub async fn get_checklist_item(&self, id: &str) -> Result<ChecklistItem, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM checklist_items WHERE id = ?1 AND deleted_at IS NULL"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_item(&row)
    }

    /// Fetch a checklist item regardless of soft-delete state.
    pub async fn find_checklist_item_any(&self, id: &str) -> Result<ChecklistItem, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM checklist_items WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_item(&row)
    }

    /// Apply a partial update. Only `Some` fields overwrite.
    pub async fn update_checklist_item(
        &self,
        update: &ChecklistItemUpdate,
    ) -> Result<ChecklistItem, DatabaseError> {
        self.get_checklist_item(&update.id).await?;

        let Some(ref content) = update.content else {
            return self.get_checklist_item(&update.id).await;
        };

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE checklist_items SET content = ?2, updated_at = ?3 WHERE id = ?1",
                libsql::params![update.id.as_str(), content.as_str(), now.to_rfc3339()],
            )
            .await?;

        let updated = self.get_checklist_item(&update.id).await?;

        let detail = serde_json::to_value(update).map_err(|e| DatabaseError::Other(e.into()))?;
        self.append_audit(EntityType::ChecklistItem, &update.id, AuditAction::Updated, Some(&detail))
            .await?;

        Ok(updated)
    }

    /// Soft-delete a checklist item. No-op if it is already deleted.
    pub async fn soft_delete_checklist_item(
        &self,
        id: &str,
    ) -> Result<ChecklistItem, DatabaseError> {
        let current = self.find_checklist_item_any(id).await?;
        if current.deleted_at.is_some() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE checklist_items SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::ChecklistItem, id, AuditAction::SoftDeleted, None)
            .await?;

        Ok(ChecklistItem {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Restore a soft-deleted checklist item. No-op if it is already active.
    pub async fn restore_checklist_item(&self, id: &str) -> Result<ChecklistItem, DatabaseError> {
        let current = self.find_checklist_item_any(id).await?;
        if current.deleted_at.is_none() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE checklist_items SET deleted_at = NULL, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::ChecklistItem, id, AuditAction::Restored, None)
            .await?;

        Ok(ChecklistItem {
            deleted_at: None,
            updated_at: now,
            ..current
        })
    }
}
