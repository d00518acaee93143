//! Architecture test repository.

use chrono::Utc;

use tenet_core::commands::{ArchUnitTestDraft, ArchUnitTestUpdate};
use tenet_core::entities::ArchUnitTest;
use tenet_core::enums::{AuditAction, EntityType};
use tenet_core::ids::PREFIX_ARCH_UNIT_TEST;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::TenetService;

const SELECT_COLS: &str = "id, package_structure_id, name, test_code, description, \
                           created_at, updated_at, deleted_at";

fn row_to_test(row: &libsql::Row) -> Result<ArchUnitTest, DatabaseError> {
    Ok(ArchUnitTest {
        id: row.get(0)?,
        package_structure_id: row.get(1)?,
        name: row.get(2)?,
        test_code: row.get(3)?,
        description: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
    })
}

impl TenetService {
    pub async fn create_arch_unit_test(
        &self,
        draft: &ArchUnitTestDraft,
    ) -> Result<ArchUnitTest, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ARCH_UNIT_TEST).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO arch_unit_tests ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)"
                ),
                libsql::params![
                    id.as_str(),
                    draft.package_structure_id.as_str(),
                    draft.name.as_str(),
                    draft.test_code.as_str(),
                    draft.description.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.append_audit(EntityType::ArchUnitTest, &id, AuditAction::Created, None)
            .await?;

        Ok(ArchUnitTest {
            id,
            package_structure_id: draft.package_structure_id.clone(),
            name: draft.name.clone(),
            test_code: draft.test_code.clone(),
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch an active (not soft-deleted) architecture test.
    pub async fn get_arch_unit_test(&self, id: &str) -> Result<ArchUnitTest, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM arch_unit_tests WHERE id = ?1 AND deleted_at IS NULL"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_test(&row)
    }

    /// Fetch an architecture test regardless of soft-delete state.
    pub async fn find_arch_unit_test_any(&self, id: &str) -> Result<ArchUnitTest, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM arch_unit_tests WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_test(&row)
    }

    /// Apply a partial update. Only `Some` fields overwrite.
    pub async fn update_arch_unit_test(
        &self,
        update: &ArchUnitTestUpdate,
    ) -> Result<ArchUnitTest, DatabaseError> {
        self.get_arch_unit_test(&update.id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref test_code) = update.test_code {
            sets.push(format!("test_code = ?{idx}"));
            params.push(test_code.clone().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_arch_unit_test(&update.id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(update.id.as_str().into());
        let sql = format!(
            "UPDATE arch_unit_tests SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        let updated = self.get_arch_unit_test(&update.id).await?;

        let detail = serde_json::to_value(update).map_err(|e| DatabaseError::Other(e.into()))?;
        self.append_audit(EntityType::ArchUnitTest, &update.id, AuditAction::Updated, Some(&detail))
            .await?;

        Ok(updated)
    }

    /// Soft-delete an architecture test. No-op if it is already deleted.
    pub async fn soft_delete_arch_unit_test(
        &self,
        id: &str,
    ) -> Result<ArchUnitTest, DatabaseError> {
        let current = self.find_arch_unit_test_any(id).await?;
        if current.deleted_at.is_some() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE arch_unit_tests SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::ArchUnitTest, id, AuditAction::SoftDeleted, None)
            .await?;

        Ok(ArchUnitTest {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Restore a soft-deleted architecture test. No-op if it is already active.
    pub async fn restore_arch_unit_test(&self, id: &str) -> Result<ArchUnitTest, DatabaseError> {
        let current = self.find_arch_unit_test_any(id).await?;
        if current.deleted_at.is_none() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE arch_unit_tests SET deleted_at = NULL, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::ArchUnitTest, id, AuditAction::Restored, None)
            .await?;

        Ok(ArchUnitTest {
            deleted_at: None,
            updated_at: now,
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn create_and_partial_update() {
        let svc = test_service().await;
        let structure = svc
            .create_package_structure("layered", "src/api\nsrc/core\nsrc/infra", None)
            .await
            .unwrap();

        let test = svc
            .create_arch_unit_test(&ArchUnitTestDraft {
                package_structure_id: structure.id,
                name: "core_does_not_depend_on_api".to_string(),
                test_code: "layers().core().must_not_import(\"api\")".to_string(),
                description: Some("Enforce layering".to_string()),
            })
            .await
            .unwrap();
        assert!(test.id.starts_with("arc-"));

        let updated = svc
            .update_arch_unit_test(&ArchUnitTestUpdate {
                id: test.id,
                name: None,
                test_code: None,
                description: Some("Enforce strict layering".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "core_does_not_depend_on_api");
        assert_eq!(updated.description.as_deref(), Some("Enforce strict layering"));
    }
}
