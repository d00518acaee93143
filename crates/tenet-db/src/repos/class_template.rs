//! Class template repository.

use chrono::Utc;

use tenet_core::commands::{ClassTemplateDraft, ClassTemplateUpdate};
use tenet_core::entities::ClassTemplate;
use tenet_core::enums::{AuditAction, EntityType};
use tenet_core::ids::PREFIX_CLASS_TEMPLATE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::TenetService;

const SELECT_COLS: &str = "id, package_structure_id, name, template_code, description, \
                           created_at, updated_at, deleted_at";

fn row_to_template(row: &libsql::Row) -> Result<ClassTemplate, DatabaseError> {
    Ok(ClassTemplate {
        id: row.get(0)?,
        package_structure_id: row.get(1)?,
        name: row.get(2)?,
        template_code: row.get(3)?,
        description: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
    })
}

impl TenetService {
    pub async fn create_class_template(
        &self,
        draft: &ClassTemplateDraft,
    ) -> Result<ClassTemplate, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CLASS_TEMPLATE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO class_templates ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)"
                ),
                libsql::params![
                    id.as_str(),
                    draft.package_structure_id.as_str(),
                    draft.name.as_str(),
                    draft.template_code.as_str(),
                    draft.description.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.append_audit(EntityType::ClassTemplate, &id, AuditAction::Created, None)
            .await?;

        Ok(ClassTemplate {
            id,
            package_structure_id: draft.package_structure_id.clone(),
            name: draft.name.clone(),
            template_code: draft.template_code.clone(),
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch an active (not soft-deleted) class template.
    pub async fn get_class_template(&self, id: &str) -> Result<ClassTemplate, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM class_templates WHERE id = ?1 AND deleted_at IS NULL"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_template(&row)
    }

    /// Fetch a class template regardless of soft-delete state.
    pub async fn find_class_template_any(&self, id: &str) -> Result<ClassTemplate, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM class_templates WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_template(&row)
    }

    /// Apply a partial update. Only `Some` fields overwrite.
    pub async fn update_class_template(
        &self,
        update: &ClassTemplateUpdate,
    ) -> Result<ClassTemplate, DatabaseError> {
        self.get_class_template(&update.id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref template_code) = update.template_code {
            sets.push(format!("template_code = ?{idx}"));
            params.push(template_code.clone().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_class_template(&update.id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(update.id.as_str().into());
        let sql = format!(
            "UPDATE class_templates SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        let updated = self.get_class_template(&update.id).await?;

        let detail = serde_json::to_value(update).map_err(|e| DatabaseError::Other(e.into()))?;
        self.append_audit(EntityType::ClassTemplate, &update.id, AuditAction::Updated, Some(&detail))
            .await?;

        Ok(updated)
    }

    /// Soft-delete a class template. No-op if it is already deleted.
    pub async fn soft_delete_class_template(
        &self,
        id: &str,
    ) -> Result<ClassTemplate, DatabaseError> {
        let current = self.find_class_template_any(id).await?;
        if current.deleted_at.is_some() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE class_templates SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::ClassTemplate, id, AuditAction::SoftDeleted, None)
            .await?;

        Ok(ClassTemplate {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Restore a soft-deleted class template. No-op if it is already active.
    pub async fn restore_class_template(&self, id: &str) -> Result<ClassTemplate, DatabaseError> {
        let current = self.find_class_template_any(id).await?;
        if current.deleted_at.is_none() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE class_templates SET deleted_at = NULL, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::ClassTemplate, id, AuditAction::Restored, None)
            .await?;

        Ok(ClassTemplate {
            deleted_at: None,
            updated_at: now,
            ..current
        })
    }
}
