//! Cross-cutting error types for Tenet.
//!
//! Domain-specific errors (`DatabaseError`, `ReviewError`) live in their
//! respective crates; this module holds the errors the payload codec can
//! raise from any crate.

use thiserror::Error;

use crate::enums::{OperationKind, TargetKind};

/// Errors raised when decoding a raw feedback payload.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The payload cannot be decoded into the command shape expected for
    /// this (target kind, operation kind) pair.
    #[error("Malformed payload for {target} {operation}: {cause}")]
    MalformedPayload {
        target: TargetKind,
        operation: OperationKind,
        #[source]
        cause: serde_json::Error,
    },
}
