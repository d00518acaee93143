//! The target-kind dispatch table.
//!
//! Single source of truth for which parent entity an `Add` requires, consulted
//! by both the submission validators and the merge validators so the two
//! phases cannot drift apart.

use crate::enums::{ParentKind, TargetKind};

/// Parent kind required for an `Add` of the given target kind.
///
/// Exhaustive match — adding a new `TargetKind` variant forces updating this.
#[must_use]
pub const fn parent_kind(target: TargetKind) -> ParentKind {
    match target {
        TargetKind::RuleExample | TargetKind::ChecklistItem => ParentKind::CodingRule,
        TargetKind::CodingRule => ParentKind::Convention,
        TargetKind::ClassTemplate | TargetKind::ArchUnitTest => ParentKind::PackageStructure,
    }
}
