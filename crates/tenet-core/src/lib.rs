//! # tenet-core
//!
//! Core types and error types for Tenet, a coding-conventions knowledge base
//! with a gated feedback review workflow.
//!
//! This crate provides the foundational types shared across all Tenet crates:
//! - Entity structs for the knowledge base (conventions, rules, examples, …)
//!   and the feedback aggregate
//! - Status and kind enums with state machine transitions
//! - Typed payload commands and the codec that decodes raw feedback payloads
//! - The target-kind → parent-kind dispatch table
//! - ID prefix constants
//! - Cross-cutting error types
//! - Audit detail sub-types

pub mod audit_detail;
pub mod commands;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod registry;
