//! Class template payload commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `add` payload for a class template. Names the package structure it
/// belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClassTemplateDraft {
    pub package_structure_id: String,
    pub name: String,
    pub template_code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `modify` payload for a class template.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClassTemplateUpdate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub template_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
