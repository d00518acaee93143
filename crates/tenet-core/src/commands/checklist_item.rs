//! Checklist item payload commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `add` payload for a checklist item. Names the coding rule it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChecklistItemDraft {
    pub coding_rule_id: String,
    pub content: String,
}

/// `modify` payload for a checklist item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChecklistItemUpdate {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
}
