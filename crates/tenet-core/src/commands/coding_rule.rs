//! Coding rule payload commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `add` payload for a coding rule. Names the convention it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodingRuleDraft {
    pub convention_id: String,
    pub title: String,
    #[serde(default)]
    pub rationale: Option<String>,
}

/// `modify` payload for a coding rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodingRuleUpdate {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
}
