//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose checklist gestures and board snapshots to Dart via FRB.
//! - Keep error semantics flat: an `ok` flag, a stable `error_code` label,
//!   and a human-readable message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One engine per process; the first bound database path wins for the
//!   process lifetime.
//!
//! # See also
//! - docs/architecture/logging.md

use pocketlist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Checklist, ChecklistEngine, EngineCommand, EngineConfig, InsertPolicy, ItemView,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const ENGINE_DB_FILE_NAME: &str = "pocketlist.sqlite3";
static ENGINE: OnceLock<EngineSlot> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for checklist command flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Stable machine-readable failure label, set only when `ok` is false.
    pub error_code: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }
}

/// One board row projected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItemView {
    /// Normalized item name.
    pub name: String,
    /// Whether the row sits in the checked partition.
    pub is_checked: bool,
}

/// Board snapshot envelope for one checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    /// Whether the snapshot loaded.
    pub ok: bool,
    /// Checklist title the snapshot belongs to (empty on failure).
    pub title: String,
    /// Unchecked rows in display order.
    pub unchecked: Vec<BoardItemView>,
    /// Checked rows in display order.
    pub checked: Vec<BoardItemView>,
    /// Stable machine-readable failure label, set only when `ok` is false.
    pub error_code: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardResponse {
    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            title: String::new(),
            unchecked: Vec::new(),
            checked: Vec::new(),
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }
}

/// One catalog row projected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogChecklistView {
    /// Unique checklist title.
    pub title: String,
    /// Whether this checklist is the one currently shown.
    pub is_active: bool,
    /// Creation instant in Unix epoch milliseconds.
    pub created_at_epoch_ms: i64,
}

/// Catalog snapshot envelope listing every checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogResponse {
    /// Whether the snapshot loaded.
    pub ok: bool,
    /// Catalog rows in creation order.
    pub checklists: Vec<CatalogChecklistView>,
    /// Stable machine-readable failure label, set only when `ok` is false.
    pub error_code: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CatalogResponse {
    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            checklists: Vec::new(),
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }
}

/// Binds the process-wide engine to an app-provided database path.
///
/// # FFI contract
/// - Sync call; opens the database and starts the engine worker.
/// - First successful call wins; repeating it with the same path is
///   idempotent.
/// - A different path after binding returns `engine_path_conflict`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn open_engine(db_path: String) -> ActionResponse {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return ActionResponse::failure(
            "engine_db_path_empty",
            "open_engine failed: empty database path",
        );
    }
    let requested = PathBuf::from(trimmed);
    let slot = ENGINE.get_or_init(|| EngineSlot::boot(requested.clone()));
    if slot.db_path != requested {
        return ActionResponse::failure(
            "engine_path_conflict",
            format!(
                "open_engine failed: engine already bound to {}",
                slot.db_path.display()
            ),
        );
    }
    match &slot.engine {
        Ok(_) => ActionResponse::success("Engine open."),
        Err(failure) => ActionResponse::failure(
            failure.code,
            format!("open_engine failed: {}", failure.message),
        ),
    }
}

/// Saves an item into a checklist partition.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - Reuses an existing row with the same name instead of duplicating it.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_insert_item(checklist: String, name: String, is_checked: bool) -> ActionResponse {
    run_command(
        "board_insert_item",
        "Item saved.",
        EngineCommand::InsertItem {
            checklist,
            name,
            is_checked,
        },
    )
}

/// Toggles one item between the unchecked and checked partitions.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_flip_item(checklist: String, name: String) -> ActionResponse {
    run_command(
        "board_flip_item",
        "Item flipped.",
        EngineCommand::FlipItem { checklist, name },
    )
}

/// Applies a drag-reorder result to one partition.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - `names_in_new_order` must list every current row of the partition
///   exactly once; anything else is rejected as a stale view.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_reorder_partition(
    checklist: String,
    is_checked: bool,
    names_in_new_order: Vec<String>,
) -> ActionResponse {
    run_command(
        "board_reorder_partition",
        "Order saved.",
        EngineCommand::ReorderPartition {
            checklist,
            is_checked,
            names_in_new_order,
        },
    )
}

/// Removes one item from a checklist.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_remove_item(checklist: String, name: String) -> ActionResponse {
    run_command(
        "board_remove_item",
        "Item removed.",
        EngineCommand::RemoveItem { checklist, name },
    )
}

/// Creates a checklist and makes it the active one.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_create_checklist(title: String) -> ActionResponse {
    run_command(
        "catalog_create_checklist",
        "Checklist created.",
        EngineCommand::CreateChecklist { title },
    )
}

/// Renames a checklist; owned items follow automatically.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_rename_checklist(old_title: String, new_title: String) -> ActionResponse {
    run_command(
        "catalog_rename_checklist",
        "Checklist renamed.",
        EngineCommand::RenameChecklist {
            old_title,
            new_title,
        },
    )
}

/// Deletes a checklist together with its items.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - Deleting the active checklist promotes the oldest remaining one.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_delete_checklist(title: String) -> ActionResponse {
    run_command(
        "catalog_delete_checklist",
        "Checklist deleted.",
        EngineCommand::DeleteChecklist { title },
    )
}

/// Switches which checklist is the active one.
///
/// # FFI contract
/// - Sync call; blocks until the engine worker applied the write.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_activate_checklist(title: String) -> ActionResponse {
    run_command(
        "catalog_activate_checklist",
        "Checklist activated.",
        EngineCommand::ActivateChecklist { title },
    )
}

/// Loads the two-partition board snapshot for one checklist.
///
/// # FFI contract
/// - Sync call; runs behind any queued writes, so the snapshot reflects
///   every gesture submitted before it.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn fetch_board(checklist: String) -> BoardResponse {
    let engine = match engine() {
        Ok(engine) => engine,
        Err(failure) => {
            return BoardResponse::failure(
                failure.code,
                format!("fetch_board failed: {}", failure.message),
            );
        }
    };
    match engine.fetch_board(&checklist) {
        Ok(board) => {
            let total = board.unchecked.len() + board.checked.len();
            BoardResponse {
                ok: true,
                title: board.title,
                unchecked: board.unchecked.into_iter().map(to_board_item).collect(),
                checked: board.checked.into_iter().map(to_board_item).collect(),
                error_code: None,
                message: format!("Loaded {total} item(s)."),
            }
        }
        Err(err) => BoardResponse::failure(err.error_code(), format!("fetch_board failed: {err}")),
    }
}

/// Loads the checklist catalog snapshot.
///
/// # FFI contract
/// - Sync call; runs behind any queued writes.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn fetch_catalog() -> CatalogResponse {
    let engine = match engine() {
        Ok(engine) => engine,
        Err(failure) => {
            return CatalogResponse::failure(
                failure.code,
                format!("fetch_catalog failed: {}", failure.message),
            );
        }
    };
    match engine.fetch_catalog() {
        Ok(checklists) => {
            let message = format!("Loaded {} checklist(s).", checklists.len());
            CatalogResponse {
                ok: true,
                checklists: checklists.into_iter().map(to_catalog_row).collect(),
                error_code: None,
                message,
            }
        }
        Err(err) => {
            CatalogResponse::failure(err.error_code(), format!("fetch_catalog failed: {err}"))
        }
    }
}

struct EngineSlot {
    db_path: PathBuf,
    engine: Result<ChecklistEngine, BootFailure>,
}

impl EngineSlot {
    fn boot(db_path: PathBuf) -> Self {
        let config = EngineConfig {
            insert_policy: resolve_insert_policy(),
            ..EngineConfig::default()
        };
        let engine = match ChecklistEngine::open(&db_path, config) {
            Ok(engine) => {
                log::info!("event=ffi_engine_open module=ffi status=ok");
                Ok(engine)
            }
            Err(err) => {
                log::warn!(
                    "event=ffi_engine_open module=ffi status=error error_code={}",
                    err.error_code()
                );
                Err(BootFailure {
                    code: err.error_code(),
                    message: err.to_string(),
                })
            }
        };
        Self { db_path, engine }
    }
}

#[derive(Clone)]
struct BootFailure {
    code: &'static str,
    message: String,
}

fn run_command(op: &str, done_message: &str, command: EngineCommand) -> ActionResponse {
    let engine = match engine() {
        Ok(engine) => engine,
        Err(failure) => {
            return ActionResponse::failure(failure.code, format!("{op} failed: {}", failure.message));
        }
    };
    let completion = match engine.submit(command) {
        Ok(completion) => completion,
        Err(err) => return ActionResponse::failure(err.error_code(), format!("{op} failed: {err}")),
    };
    match completion.wait() {
        Ok(()) => ActionResponse::success(done_message),
        Err(err) => ActionResponse::failure(err.error_code(), format!("{op} failed: {err}")),
    }
}

fn engine() -> Result<&'static ChecklistEngine, BootFailure> {
    let slot = ENGINE.get_or_init(|| EngineSlot::boot(default_db_path()));
    slot.engine.as_ref().map_err(BootFailure::clone)
}

fn default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var("POCKETLIST_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(ENGINE_DB_FILE_NAME)
}

fn resolve_insert_policy() -> InsertPolicy {
    std::env::var("POCKETLIST_INSERT_POLICY")
        .ok()
        .and_then(|raw| InsertPolicy::parse(&raw))
        .unwrap_or_default()
}

fn to_board_item(view: ItemView) -> BoardItemView {
    BoardItemView {
        name: view.name,
        is_checked: view.is_checked,
    }
}

fn to_catalog_row(checklist: Checklist) -> CatalogChecklistView {
    CatalogChecklistView {
        title: checklist.title,
        is_active: checklist.is_active,
        created_at_epoch_ms: checklist.created_at,
    }
}
