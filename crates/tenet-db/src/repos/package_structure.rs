//! Package structure repository — parent entity for class templates and
//! architecture tests.

use chrono::Utc;

use tenet_core::entities::PackageStructure;
use tenet_core::enums::{AuditAction, EntityType};
use tenet_core::ids::PREFIX_PACKAGE_STRUCTURE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::TenetService;

const SELECT_COLS: &str = "id, name, layout, description, created_at, updated_at, deleted_at";

fn row_to_structure(row: &libsql::Row) -> Result<PackageStructure, DatabaseError> {
    Ok(PackageStructure {
        id: row.get(0)?,
        name: row.get(1)?,
        layout: row.get(2)?,
        description: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
    })
}

impl TenetService {
    pub async fn create_package_structure(
        &self,
        name: &str,
        layout: &str,
        description: Option<&str>,
    ) -> Result<PackageStructure, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PACKAGE_STRUCTURE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO package_structures ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)"
                ),
                libsql::params![
                    id.as_str(),
                    name,
                    layout,
                    description,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.append_audit(EntityType::PackageStructure, &id, AuditAction::Created, None)
            .await?;

        Ok(PackageStructure {
            id,
            name: name.to_string(),
            layout: layout.to_string(),
            description: description.map(String::from),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch an active (not soft-deleted) package structure.
    pub async fn get_package_structure(&self, id: &str) -> Result<PackageStructure, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM package_structures
                     WHERE id = ?1 AND deleted_at IS NULL"
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_structure(&row)
    }

    /// Fetch a package structure regardless of soft-delete state.
    pub async fn find_package_structure_any(
        &self,
        id: &str,
    ) -> Result<PackageStructure, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM package_structures WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_structure(&row)
    }

    /// Soft-delete a package structure. No-op if it is already deleted.
    pub async fn soft_delete_package_structure(
        &self,
        id: &str,
    ) -> Result<PackageStructure, DatabaseError> {
        let current = self.find_package_structure_any(id).await?;
        if current.deleted_at.is_some() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE package_structures SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::PackageStructure, id, AuditAction::SoftDeleted, None)
            .await?;

        Ok(PackageStructure {
            deleted_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Restore a soft-deleted package structure. No-op if it is already active.
    pub async fn restore_package_structure(
        &self,
        id: &str,
    ) -> Result<PackageStructure, DatabaseError> {
        let current = self.find_package_structure_any(id).await?;
        if current.deleted_at.is_none() {
            return Ok(current);
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE package_structures SET deleted_at = NULL, updated_at = ?2 WHERE id = ?1",
                libsql::params![id, now.to_rfc3339()],
            )
            .await?;

        self.append_audit(EntityType::PackageStructure, id, AuditAction::Restored, None)
            .await?;

        Ok(PackageStructure {
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
    async fn create_and_fetch() {
        let svc = test_service().await;

        let structure = svc
            .create_package_structure(
                "hexagonal-service",
                "src/domain\nsrc/ports\nsrc/adapters",
                None,
            )
            .await
            .unwrap();
        assert!(structure.id.starts_with("pkg-"));

        let fetched = svc.get_package_structure(&structure.id).await.unwrap();
        assert_eq!(fetched.name, "hexagonal-service");
        assert!(fetched.layout.contains("src/ports"));
    }

    #[tokio::test]
    async fn delete_and_restore() {
        let svc = test_service().await;
        let structure = svc
            .create_package_structure("layered", "src/api\nsrc/core", None)
            .await
            .unwrap();

        svc.soft_delete_package_structure(&structure.id).await.unwrap();
        assert!(matches!(
            svc.get_package_structure(&structure.id).await,
            Err(DatabaseError::NoResult)
        ));

        svc.restore_package_structure(&structure.id).await.unwrap();
        assert!(svc.get_package_structure(&structure.id).await.is_ok());
    }
}
