//! Typed payload commands and the codec that produces them.
//!
//! Each target kind has two command shapes: a *draft* (the `add` payload,
//! which names the required parent entity) and an *update* (the `modify`
//! payload, which redundantly embeds the target's own id and carries only
//! the fields to overwrite — `Option` fields left absent or null keep the
//! current value). Deletes carry no payload schema beyond the feedback
//! item's `target_id`.
//!
//! All commands use `deny_unknown_fields` so a payload aimed at the wrong
//! (kind, operation) pair fails decoding instead of being silently accepted.

mod checklist_item;
mod class_template;
mod coding_rule;
mod rule_example;

pub use arch_unit_test::{ArchUnitTestDraft, ArchUnitTestUpdate};
pub use checklist_item::{ChecklistItemDraft, ChecklistItemUpdate};
pub use class_template::{ClassTemplateDraft, ClassTemplateUpdate};
pub use coding_rule::{CodingRuleDraft, CodingRuleUpdate};
pub use rule_example::{RuleExampleDraft, RuleExampleUpdate};

use serde::de::DeserializeOwned;

use crate::enums::{OperationKind, TargetKind};
use crate::errors::CoreError;

/// Decode a raw payload into the command shape for (`target`, `operation`).
///
/// # Errors
///
/// Returns `CoreError::MalformedPayload` naming the pair when the document
/// does not match the expected shape.
pub fn decode<T: DeserializeOwned>(
    target: TargetKind,
    operation: OperationKind,
    payload: &serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(payload.clone()).map_err(|cause| CoreError::MalformedPayload {
        target,
        operation,
        cause,
    })
}
