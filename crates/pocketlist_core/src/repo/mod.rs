//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for boards and catalog.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Every committed write publishes exactly one change event, after the
//!   transaction commits.
//! - Repository APIs return semantic errors (`TitleNotFound`) in addition
//!   to DB transport errors.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod checklist_repo;
pub mod item_repo;
