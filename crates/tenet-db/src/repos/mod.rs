//! Repository modules implementing CRUD operations for all Tenet entities.
//!
//! Each module adds methods to `TenetService` via `impl TenetService` blocks.
//! Active-read lookups (`get_*`) exclude soft-deleted rows; `find_*_any`
//! includes them for audit and merge-history purposes. Soft deletes and
//! restores are idempotent.

pub mod arch_unit_test;
pub mod audit;
pub mod checklist_item;
pub mod class_template;
pub mod coding_rule;
pub mod convention;
pub mod feedback;
pub mod package_structure;
pub mod rule_example;
