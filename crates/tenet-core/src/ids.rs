//! ID prefix constants.
//!
//! Every row carries a `"<prefix>-<8 hex chars>"` ID generated in SQL
//! (see `TenetDb::generate_id`).

pub const PREFIX_CONVENTION: &str = "cnv";
pub const PREFIX_PACKAGE_STRUCTURE: &str = "pkg";
pub const PREFIX_CODING_RULE: &str = "rul";
pub const PREFIX_RULE_EXAMPLE: &str = "exm";
pub const PREFIX_CHECKLIST_ITEM: &str = "chk";
pub const PREFIX_CLASS_TEMPLATE: &str = "tpl";
pub const PREFIX_ARCH_UNIT_TEST: &str = "arc";
pub const PREFIX_FEEDBACK: &str = "fbk";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, for exhaustive ID-generation tests.
pub const ALL_PREFIXES: [&str; 9] = [
    PREFIX_CONVENTION,
    PREFIX_PACKAGE_STRUCTURE,
    PREFIX_CODING_RULE,
    PREFIX_RULE_EXAMPLE,
    PREFIX_CHECKLIST_ITEM,
    PREFIX_CLASS_TEMPLATE,
    PREFIX_ARCH_UNIT_TEST,
    PREFIX_FEEDBACK,
    PREFIX_AUDIT,
];
