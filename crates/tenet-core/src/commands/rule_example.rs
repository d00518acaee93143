//! Rule example payload commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `add` payload for a rule example. Names the coding rule it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleExampleDraft {
    pub coding_rule_id: String,
    pub title: String,
    #[serde(default)]
    pub good_code: Option<String>,
    #[serde(default)]
    pub bad_code: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// `modify` payload for a rule example. Embeds the target's own id; absent
/// or null fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleExampleUpdate {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub good_code: Option<String>,
    #[serde(default)]
    pub bad_code: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}
