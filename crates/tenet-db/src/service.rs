//! Service layer hosting the repository methods.
//!
//! `TenetService` wraps `TenetDb` (raw database access). All repo methods
//! are implemented as `impl TenetService` blocks in `repos/`.
//!
//! Every mutation method follows this protocol:
//! 1. Execute SQL
//! 2. Append an audit entry
//!
//! Transaction boundaries are owned by callers (the merge workflow wraps the
//! knowledge-base mutation and the feedback transition in one BEGIN/COMMIT).

use tracing::info;

use crate::TenetDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with the append-only audit trail.
pub struct TenetService {
    db: TenetDb,
}

impl TenetService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = TenetDb::open_local(db_path).await?;
        info!(db_path, "opened tenet database");
        Ok(Self { db })
    }

    /// Create from an existing `TenetDb` (for testing).
    #[must_use]
    pub const fn from_db(db: TenetDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TenetDb {
        &self.db
    }
}
