//! Checklist item domain model.
//!
//! # Responsibility
//! - Define the canonical item record shared by both board partitions.
//! - Provide name normalization used for case-insensitive item identity.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another item.
//! - A persisted `name` is never empty and carries no leading, trailing or
//!   doubled whitespace.
//! - `position` ranks the item inside its `(checklist, is_checked)`
//!   partition; stored values are dense and zero-based.
//!
//! # See also
//! - docs/architecture/data-model.md

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a checklist item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemId = Uuid;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Rank of an item inside one board partition.
///
/// `End` is an in-memory marker meaning "after everything currently in the
/// partition"; it is resolved to a concrete dense index before any write.
/// The derived ordering places `End` after every `At(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Position {
    /// Concrete zero-based rank.
    At(i64),
    /// Logical end of the partition, not yet resolved to a rank.
    End,
}

/// Canonical record for one entry on a checklist board.
///
/// The same shape backs both the unchecked ("to buy") and checked
/// ("in the cart") partitions; `is_checked` selects the partition and
/// `position` ranks the item inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Stable ID used for persistence and bulk-write correlation.
    pub uuid: ItemId,
    /// Normalized display name, unique per checklist ignoring ASCII case.
    pub name: String,
    /// Partition flag: `true` once the item has been ticked off.
    pub is_checked: bool,
    /// Dense zero-based rank inside the `(checklist, is_checked)` partition.
    pub position: i64,
    /// Running count of check toggles; orders the checked partition and may
    /// go negative after manual reordering.
    pub incidence: i64,
}

impl ChecklistItem {
    /// Creates a new item with a generated stable ID.
    ///
    /// # Invariants
    /// - `incidence` starts at 0; the item has never been toggled.
    /// - `position` starts at 0 and must be renumbered before persisting.
    pub fn new(name: impl Into<String>, is_checked: bool) -> Self {
        Self::with_id(Uuid::new_v4(), name, is_checked)
    }

    /// Creates an item with a caller-provided stable ID.
    ///
    /// Used by storage when rehydrating rows and by tests that need
    /// deterministic identity.
    pub fn with_id(uuid: ItemId, name: impl Into<String>, is_checked: bool) -> Self {
        Self {
            uuid,
            name: name.into(),
            is_checked,
            position: 0,
            incidence: 0,
        }
    }

    /// Returns whether this item answers to `normalized_name`.
    ///
    /// Matching ignores ASCII case, mirroring the `COLLATE NOCASE` identity
    /// the schema enforces.
    pub fn answers_to(&self, normalized_name: &str) -> bool {
        self.name.eq_ignore_ascii_case(normalized_name)
    }
}

/// Normalizes raw user input into a canonical item name.
///
/// Trims leading/trailing whitespace and collapses internal runs to single
/// spaces. Returns `None` when nothing remains, which callers must surface
/// as an empty-name validation error.
pub fn normalize_item_name(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}
