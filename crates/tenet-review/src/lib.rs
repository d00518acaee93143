//! # tenet-review
//!
//! The gated review and merge workflow over the Tenet knowledge base.
//!
//! Proposals enter as feedback items, pass two review tiers (LLM, then
//! human), and are finally merged into the knowledge base by a per-kind
//! merge strategy. Validation runs twice: once at submission and again
//! immediately before merge, so approvals cannot outlive the referential
//! facts they were granted under.
//!
//! `ReviewWorkflow` is the single entry point; `TargetRegistry` holds the
//! per-kind validators and strategies it dispatches to.

pub mod error;
pub mod kinds;
pub mod registry;
pub mod workflow;

pub use error::{ReviewError, WorkflowAction};
pub use registry::{MergeStrategy, MergeValidator, SubmissionValidator, TargetRegistry};
pub use workflow::{FeedbackSubmission, MergeOutcome, ReviewWorkflow};
