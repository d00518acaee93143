//! Convention repository — the root parent entity for coding rules.

use chrono::Utc;

use tenet_core::entities::Convention;
use tenet_core::enums::{AuditAction, EntityType};
use tenet_core::ids::PREFIX_CONVENTION;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::TenetService;

const SELECT_COLS: &str = "id, name, description, created_at, updated_at, deleted_at";

fn row_to_convention(row: &libsql::Row) -> Result<Convention, DatabaseError> {
    Ok(Convention {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
    })
}

impl TenetService {
    pub async fn create_convention(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Convention, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CONVENTION).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO conventions ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, NULL)"),
                libsql::params![id.as_str(), name, description, now.to_rfc3339(), now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::Convention, &id, AuditAction::Created, None)
            .await?;

        Ok(Convention {
            id,
            name: name.to_string(),
            description: description.map(String::from),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch an active (not soft-deleted) convention.
    pub async fn get_convention(&self, id: &str) -> Result<Convention, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM conventions WHERE id = ?1 AND deleted_at IS NULL"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_convention(&row)
    }

    /// Fetch a convention regardless of soft-delete state.
    pub async fn find_convention_any(&self, id: &str) -> Result<Convention, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM conventions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_convention(&row)
    }

    /// Soft-delete a convention. No-op if it is already deleted.
    pub async fn soft_delete_convention(&self, id: &str) -> Result<Convention, DatabaseError> {
        let current = self.find_convention_any(id).await?;
        if current.deleted_at.is_some() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE conventions SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::Convention, id, AuditAction::SoftDeleted, None)
            .await?;

        Ok(Convention {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Restore a soft-deleted convention. No-op if it is already active.
    pub async fn restore_convention(&self, id: &str) -> Result<Convention, DatabaseError> {
        let current = self.find_convention_any(id).await?;
        if current.deleted_at.is_none() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE conventions SET deleted_at = NULL, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::Convention, id, AuditAction::Restored, None)
            .await?;

        Ok(Convention {
            deleted_at: None,
            updated_at: now,
            ..current
        })
    }
}
