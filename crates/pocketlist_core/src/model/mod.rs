//! Checklist domain model.
//!
//! # Responsibility
//! - Define the canonical checklist and item records used by core logic.
//! - Keep the ordering vocabulary (position, incidence) in one place.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Stored positions are dense and zero-based within a partition; the
//!   `Position::End` marker exists only in memory while an order is being
//!   recomputed.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod checklist;
pub mod item;
