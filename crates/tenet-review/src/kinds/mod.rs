//! Per-kind validators and merge strategies.
//!
//! One module per target kind, each implementing all three registry roles.
//! Submission validation and pre-merge validation run the same `check_refs`
//! routine in every module, so the two phases agree by construction.

mod arch_unit_test;
mod checklist_item;
mod class_template;
mod coding_rule;
mod rule_example;

pub use arch_unit_test::ArchUnitTestTarget;
pub use checklist_item::ChecklistItemTarget;
pub use class_template::ClassTemplateTarget;
pub use coding_rule::CodingRuleTarget;
pub use rule_example::RuleExampleTarget;

use tenet_core::enums::{OperationKind, TargetKind};
use tenet_db::error::DatabaseError;

use crate::error::ReviewError;

/// Extract the `target_id` a modify/delete operation addresses.
pub(crate) fn require_target_id<'a>(
    operation: OperationKind,
    target_id: Option<&'a str>,
) -> Result<&'a str, ReviewError> {
    target_id.ok_or(ReviewError::MissingTargetId(operation))
}

/// A modify payload redundantly embeds the target's own id; it must agree
/// with the feedback item's `target_id`.
pub(crate) fn check_payload_id(expected: &str, found: &str) -> Result<(), ReviewError> {
    if expected == found {
        Ok(())
    } else {
        Err(ReviewError::TargetIdMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

/// Map a repo lookup's `NoResult` onto `TargetNotFound` for this kind.
pub(crate) fn require_row<T>(
    result: Result<T, DatabaseError>,
    target: TargetKind,
    target_id: &str,
) -> Result<T, ReviewError> {
    result.map_err(|err| match err {
        DatabaseError::NoResult => ReviewError::TargetNotFound {
            target,
            target_id: target_id.to_string(),
        },
        other => ReviewError::Database(other),
    })
}

/// Map a parent lookup's `NoResult` onto `ParentNotFound` for this kind.
pub(crate) fn require_parent<T>(
    result: Result<T, DatabaseError>,
    target: TargetKind,
    parent_id: &str,
) -> Result<T, ReviewError> {
    result.map_err(|err| match err {
        DatabaseError::NoResult => ReviewError::ParentNotFound {
            target,
            parent: tenet_core::registry::parent_kind(target),
            parent_id: parent_id.to_string(),
        },
        other => ReviewError::Database(other),
    })
}
