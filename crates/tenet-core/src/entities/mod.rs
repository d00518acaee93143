//! Entity structs for all Tenet domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and audit
//! detail payloads. Knowledge-base entities are soft-deletable via a nullable
//! `deleted_at` timestamp; feedback items are never deleted at all.

mod audit;
mod checklist_item;
mod class_template;
mod coding_rule;
mod convention;
mod feedback;
mod package_structure;
mod rule_example;

pub use arch_unit_test::ArchUnitTest;
pub use audit::AuditEntry;
pub use checklist_item::ChecklistItem;
pub use class_template::ClassTemplate;
pub use coding_rule::CodingRule;
pub use convention::Convention;
pub use feedback::FeedbackItem;
pub use package_structure::PackageStructure;
pub use rule_example::RuleExample;
