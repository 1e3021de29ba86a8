//! Engine configuration types.
//!
//! # Responsibility
//! - Define the host-supplied tunables for the engine: insertion policy,
//!   title length limit and mutation queue capacity.
//!
//! # Invariants
//! - Every field carries a serde default, so hosts may supply partial
//!   configuration or none at all.
//! - `InsertPolicy` wire names are `insert-at-top` and `insert-at-bottom`.

use serde::{Deserialize, Serialize};

/// Default checklist title length limit, in characters.
pub const DEFAULT_MAX_TITLE_CHARS: usize = 50;
/// Default bound of the serialized mutation queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Where a brand-new item lands within its partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertPolicy {
    /// New items go to the head of the partition.
    InsertAtTop,
    /// New items go to the tail of the partition.
    InsertAtBottom,
}

impl Default for InsertPolicy {
    fn default() -> Self {
        Self::InsertAtBottom
    }
}

impl InsertPolicy {
    /// Parses the wire name, tolerating surrounding whitespace and ASCII
    /// case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "insert-at-top" => Some(Self::InsertAtTop),
            "insert-at-bottom" => Some(Self::InsertAtBottom),
            _ => None,
        }
    }

    /// Stable wire name, also used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsertAtTop => "insert-at-top",
            Self::InsertAtBottom => "insert-at-bottom",
        }
    }
}

/// Host-supplied engine tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Placement rule for brand-new items.
    #[serde(default)]
    pub insert_policy: InsertPolicy,
    /// Checklist title length limit, in characters.
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,
    /// Bound of the serialized mutation queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            insert_policy: InsertPolicy::default(),
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

fn default_max_title_chars() -> usize {
    DEFAULT_MAX_TITLE_CHARS
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
