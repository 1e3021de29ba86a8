//! Core domain logic for Pocketlist.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use config::{EngineConfig, InsertPolicy};
pub use engine::{ChecklistEngine, Completion, EngineCommand, EngineError, EngineResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::checklist::Checklist;
pub use model::item::{normalize_item_name, ChecklistItem, ItemId, Position};
pub use notify::{ChangeBus, ChangeSubscription, StoreChange};
pub use repo::checklist_repo::{
    CatalogRepoError, CatalogRepoResult, ChecklistRepository, SqliteChecklistRepository,
};
pub use repo::item_repo::{ItemRepoError, ItemRepoResult, ItemRepository, SqliteItemRepository};
pub use service::checklist_service::{CatalogServiceError, ChecklistService};
pub use service::item_service::{ChecklistBoard, ItemService, ItemServiceError, ItemView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
