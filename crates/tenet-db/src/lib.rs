//! # tenet-db
//!
//! libSQL persistence for the Tenet knowledge base and feedback workflow.
//!
//! Handles all relational state: conventions, package structures, coding
//! rules, rule examples, checklist items, class templates, architecture
//! tests, feedback items, and the append-only audit trail.
//!
//! Uses the `libsql` crate — local file databases (or `:memory:` in tests),
//! native foreign keys, and SQL-side ID generation.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Tenet state operations.
///
/// Wraps a libSQL database and its single connection. Provides ID
/// generation and the transaction statements the merge workflow uses as
/// its atomicity boundary.
pub struct TenetDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TenetDb {
    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let tenet_db = Self { db, conn };
        tenet_db.run_migrations().await?;
        Ok(tenet_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"fbk-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Begin a transaction on the single connection.
    ///
    /// The merge workflow owns this boundary: the knowledge-base mutation and
    /// the feedback transition either commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails (e.g., a transaction
    /// is already open).
    pub async fn begin(&self) -> Result<(), DatabaseError> {
        self.conn.execute("BEGIN", ()).await?;
        Ok(())
    }

    /// Commit the open transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the commit fails.
    pub async fn commit(&self) -> Result<(), DatabaseError> {
        self.conn.execute("COMMIT", ()).await?;
        Ok(())
    }

    /// Roll back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the rollback fails.
    pub async fn rollback(&self) -> Result<(), DatabaseError> {
        self.conn.execute("ROLLBACK", ()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> TenetDb {
        TenetDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "conventions",
            "package_structures",
            "coding_rules",
            "rule_examples",
            "checklist_items",
            "class_templates",
            "arch_unit_tests",
            "feedback_items",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("fbk").await.unwrap();
        assert!(id.starts_with("fbk-"), "ID should start with 'fbk-': {id}");
        assert_eq!(
            id.len(),
            12,
            "ID should be 12 chars (3 prefix + 1 dash + 8 hex): {id}"
        );

        let hex_part = &id[4..];
        assert!(
            hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "Random part should be hex: {hex_part}"
        );
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in tenet_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenet.db");
        let path = path.to_str().unwrap();

        {
            let db = TenetDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO conventions (id, name) VALUES ('cnv-p1', 'Persisted')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = TenetDb::open_local(path).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT name FROM conventions WHERE id = 'cnv-p1'", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "Persisted");
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        // Run migrations again — should not fail
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn feedback_status_check_constraint() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO feedback_items (id, target_kind, operation, risk_level, payload, status)
                 VALUES ('fbk-t1', 'rule_example', 'add', 'safe', '{}', 'approved_by_nobody')",
                (),
            )
            .await;
        assert!(result.is_err(), "unknown status should violate CHECK");
    }

    #[tokio::test]
    async fn rollback_discards_insert() {
        let db = test_db().await;
        db.begin().await.unwrap();
        db.conn()
            .execute(
                "INSERT INTO conventions (id, name) VALUES ('cnv-t1', 'Rust API guidelines')",
                (),
            )
            .await
            .unwrap();
        db.rollback().await.unwrap();

        let mut rows = db
            .conn()
            .query("SELECT id FROM conventions WHERE id = 'cnv-t1'", ())
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_none());
    }
}
