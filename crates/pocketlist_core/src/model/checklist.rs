//! Checklist catalog entry model.

use serde::{Deserialize, Serialize};

/// Catalog record for one named checklist.
///
/// The title doubles as the identity key; renaming a checklist changes the
/// key and the storage layer cascades it to owned items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    /// Unique user-visible title, compared exactly.
    pub title: String,
    /// Whether this is the checklist currently shown by the app. At most one
    /// catalog entry carries `true` at any time.
    pub is_active: bool,
    /// Unix epoch milliseconds at creation; defines the catalog listing
    /// order, which survives renames.
    pub created_at: i64,
}
