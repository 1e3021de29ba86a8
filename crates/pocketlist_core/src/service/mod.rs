//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep engine/FFI layers decoupled from storage details.
//!
//! # See also
//! - docs/architecture/ordering.md

pub mod checklist_service;
pub mod item_service;
