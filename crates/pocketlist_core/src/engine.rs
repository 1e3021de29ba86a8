//! Serialized mutation engine.
//!
//! # Responsibility
//! - Own the SQLite connection on one dedicated worker thread.
//! - Execute every mutating operation strictly in submission order through
//!   a bounded job queue.
//! - Serve one-shot board/catalog snapshots from the same queue, so reads
//!   always observe fully-committed state.
//!
//! # Invariants
//! - At most one job runs at a time; two mutations never interleave.
//! - A full queue rejects the submission instead of blocking or buffering
//!   without bound.
//! - Every job answers its completion channel exactly once.
//! - Log lines carry stable error codes, never item names or titles.
//!
//! # See also
//! - docs/architecture/ordering.md

use crate::config::EngineConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::checklist::Checklist;
use crate::notify::{ChangeBus, ChangeSubscription};
use crate::repo::checklist_repo::{
    CatalogRepoError, ChecklistRepository, SqliteChecklistRepository,
};
use crate::repo::item_repo::{ItemRepoError, SqliteItemRepository};
use crate::service::checklist_service::{CatalogServiceError, ChecklistService};
use crate::service::item_service::{ChecklistBoard, ItemService, ItemServiceError};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Result alias for engine APIs.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine facade.
#[derive(Debug)]
pub enum EngineError {
    /// Board ordering operation failed.
    Item(ItemServiceError),
    /// Catalog operation failed.
    Catalog(CatalogServiceError),
    /// Connection bootstrap failed.
    Db(DbError),
    /// Worker thread could not be spawned.
    Spawn(std::io::Error),
    /// The bounded job queue is full; the submission was rejected.
    QueueFull,
    /// The engine is shut down or its worker is gone.
    Closed,
}

impl EngineError {
    /// Stable machine-readable label for log lines and host bindings.
    ///
    /// Codes never contain user-entered text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Item(ItemServiceError::EmptyName) => "item_empty_name",
            Self::Item(ItemServiceError::UnknownChecklist(_)) => "unknown_checklist",
            Self::Item(ItemServiceError::MissingItem { .. }) => "missing_item",
            Self::Item(ItemServiceError::PartitionMismatch(_)) => "partition_mismatch",
            Self::Item(ItemServiceError::Repo(_)) => "item_repo_failure",
            Self::Catalog(CatalogServiceError::EmptyTitle) => "empty_title",
            Self::Catalog(CatalogServiceError::TitleTooLong { .. }) => "title_too_long",
            Self::Catalog(CatalogServiceError::DuplicateTitle(_)) => "duplicate_title",
            Self::Catalog(CatalogServiceError::NotFound(_)) => "checklist_not_found",
            Self::Catalog(CatalogServiceError::Repo(_)) => "catalog_repo_failure",
            Self::Db(_) => "db_bootstrap_failed",
            Self::Spawn(_) => "worker_spawn_failed",
            Self::QueueFull => "queue_full",
            Self::Closed => "engine_closed",
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Spawn(err) => write!(f, "engine worker could not be started: {err}"),
            Self::QueueFull => write!(f, "engine job queue is full"),
            Self::Closed => write!(f, "engine is closed"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Item(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Spawn(err) => Some(err),
            Self::QueueFull | Self::Closed => None,
        }
    }
}

impl From<ItemServiceError> for EngineError {
    fn from(value: ItemServiceError) -> Self {
        Self::Item(value)
    }
}

impl From<CatalogServiceError> for EngineError {
    fn from(value: CatalogServiceError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ItemRepoError> for EngineError {
    fn from(value: ItemRepoError) -> Self {
        Self::Item(ItemServiceError::from(value))
    }
}

impl From<CatalogRepoError> for EngineError {
    fn from(value: CatalogRepoError) -> Self {
        Self::Catalog(CatalogServiceError::from(value))
    }
}

impl From<DbError> for EngineError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// One mutating operation, executed in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    InsertItem {
        checklist: String,
        name: String,
        is_checked: bool,
    },
    FlipItem {
        checklist: String,
        name: String,
    },
    ReorderPartition {
        checklist: String,
        is_checked: bool,
        names_in_new_order: Vec<String>,
    },
    RemoveItem {
        checklist: String,
        name: String,
    },
    CreateChecklist {
        title: String,
    },
    RenameChecklist {
        old_title: String,
        new_title: String,
    },
    DeleteChecklist {
        title: String,
    },
    ActivateChecklist {
        title: String,
    },
}

impl EngineCommand {
    fn op_name(&self) -> &'static str {
        match self {
            Self::InsertItem { .. } => "insert_item",
            Self::FlipItem { .. } => "flip_item",
            Self::ReorderPartition { .. } => "reorder_partition",
            Self::RemoveItem { .. } => "remove_item",
            Self::CreateChecklist { .. } => "create_checklist",
            Self::RenameChecklist { .. } => "rename_checklist",
            Self::DeleteChecklist { .. } => "delete_checklist",
            Self::ActivateChecklist { .. } => "activate_checklist",
        }
    }
}

enum EngineJob {
    Mutate {
        command: EngineCommand,
        done: Sender<EngineResult<()>>,
    },
    FetchBoard {
        checklist: String,
        done: Sender<EngineResult<ChecklistBoard>>,
    },
    FetchCatalog {
        done: Sender<EngineResult<Vec<Checklist>>>,
    },
}

/// Per-job completion signal.
///
/// Dropping it without waiting is allowed; the job still runs.
pub struct Completion<T> {
    rx: Receiver<EngineResult<T>>,
}

impl<T> Completion<T> {
    /// Blocks until the job has run and returns its outcome.
    pub fn wait(self) -> EngineResult<T> {
        self.rx.recv().unwrap_or(Err(EngineError::Closed))
    }
}

/// Serialized engine facade owning the worker thread.
pub struct ChecklistEngine {
    sender: Option<SyncSender<EngineJob>>,
    worker: Option<JoinHandle<()>>,
    changes: Arc<ChangeBus>,
    config: EngineConfig,
}

impl ChecklistEngine {
    /// Opens the database file and starts the worker.
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> EngineResult<Self> {
        let conn = open_db(path)?;
        Self::start(conn, config)
    }

    /// Starts the engine over a private in-memory database.
    pub fn open_in_memory(config: EngineConfig) -> EngineResult<Self> {
        let conn = open_db_in_memory()?;
        Self::start(conn, config)
    }

    fn start(conn: Connection, config: EngineConfig) -> EngineResult<Self> {
        let changes = Arc::new(ChangeBus::new());
        let capacity = config.queue_capacity.max(1);
        let (tx, rx) = mpsc::sync_channel(capacity);

        let worker_changes = Arc::clone(&changes);
        let worker_config = config.clone();
        let worker = thread::Builder::new()
            .name("pocketlist-engine".to_string())
            .spawn(move || run_worker(conn, rx, worker_changes, worker_config))
            .map_err(EngineError::Spawn)?;

        info!(
            "event=engine_start module=engine status=ok queue_capacity={capacity} insert_policy={}",
            config.insert_policy.as_str()
        );
        Ok(Self {
            sender: Some(tx),
            worker: Some(worker),
            changes,
            config,
        })
    }

    /// Effective engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a change observer; see [`crate::notify::ChangeBus`].
    pub fn subscribe(&self) -> ChangeSubscription {
        self.changes.subscribe()
    }

    /// Queues one mutating operation.
    ///
    /// Returns without blocking on execution; the returned [`Completion`]
    /// reports the outcome. A full queue rejects the submission with
    /// [`EngineError::QueueFull`].
    pub fn submit(&self, command: EngineCommand) -> EngineResult<Completion<()>> {
        let (done, rx) = mpsc::channel();
        self.send_job(EngineJob::Mutate { command, done })?;
        Ok(Completion { rx })
    }

    /// Fetches both partitions of one checklist, in display order.
    ///
    /// Runs on the serial queue behind previously queued mutations.
    pub fn fetch_board(&self, checklist: &str) -> EngineResult<ChecklistBoard> {
        let (done, rx) = mpsc::channel();
        self.send_job(EngineJob::FetchBoard {
            checklist: checklist.to_string(),
            done,
        })?;
        Completion { rx }.wait()
    }

    /// Fetches the checklist catalog in creation order.
    pub fn fetch_catalog(&self) -> EngineResult<Vec<Checklist>> {
        let (done, rx) = mpsc::channel();
        self.send_job(EngineJob::FetchCatalog { done })?;
        Completion { rx }.wait()
    }

    /// Stops accepting jobs, drains queued ones and joins the worker.
    pub fn close(mut self) -> EngineResult<()> {
        self.shutdown()
    }

    fn send_job(&self, job: EngineJob) -> EngineResult<()> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(EngineError::Closed);
        };
        match sender.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(EngineError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(EngineError::Closed),
        }
    }

    fn shutdown(&mut self) -> EngineResult<()> {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            info!("event=engine_stop module=engine status=start");
            worker.join().map_err(|_| EngineError::Closed)?;
            info!("event=engine_stop module=engine status=ok");
        }
        Ok(())
    }
}

impl Drop for ChecklistEngine {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.shutdown();
        }
    }
}

fn run_worker(
    conn: Connection,
    rx: Receiver<EngineJob>,
    changes: Arc<ChangeBus>,
    config: EngineConfig,
) {
    while let Ok(job) = rx.recv() {
        handle_job(&conn, &changes, &config, job);
    }
}

fn handle_job(conn: &Connection, changes: &ChangeBus, config: &EngineConfig, job: EngineJob) {
    match job {
        EngineJob::Mutate { command, done } => {
            let started_at = Instant::now();
            let op = command.op_name();
            let result = run_command(conn, changes, config, command);
            match &result {
                Ok(()) => info!(
                    "event=engine_job module=engine op={op} status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                ),
                Err(err) => warn!(
                    "event=engine_job module=engine op={op} status=error error_code={} duration_ms={}",
                    err.error_code(),
                    started_at.elapsed().as_millis()
                ),
            }
            let _ = done.send(result);
        }
        EngineJob::FetchBoard { checklist, done } => {
            let result = run_fetch_board(conn, changes, config, &checklist);
            if let Err(err) = &result {
                warn!(
                    "event=engine_job module=engine op=fetch_board status=error error_code={}",
                    err.error_code()
                );
            }
            let _ = done.send(result);
        }
        EngineJob::FetchCatalog { done } => {
            let result = run_fetch_catalog(conn, changes);
            if let Err(err) = &result {
                warn!(
                    "event=engine_job module=engine op=fetch_catalog status=error error_code={}",
                    err.error_code()
                );
            }
            let _ = done.send(result);
        }
    }
}

fn run_command(
    conn: &Connection,
    changes: &ChangeBus,
    config: &EngineConfig,
    command: EngineCommand,
) -> EngineResult<()> {
    match command {
        EngineCommand::InsertItem {
            checklist,
            name,
            is_checked,
        } => {
            let service = item_service(conn, changes, config)?;
            service.insert_item(&checklist, &name, is_checked)?;
            Ok(())
        }
        EngineCommand::FlipItem { checklist, name } => {
            let service = item_service(conn, changes, config)?;
            service.flip_item(&checklist, &name)?;
            Ok(())
        }
        EngineCommand::ReorderPartition {
            checklist,
            is_checked,
            names_in_new_order,
        } => {
            let service = item_service(conn, changes, config)?;
            service.reorder_partition(&checklist, is_checked, &names_in_new_order)?;
            Ok(())
        }
        EngineCommand::RemoveItem { checklist, name } => {
            let service = item_service(conn, changes, config)?;
            service.remove_item(&checklist, &name)?;
            Ok(())
        }
        EngineCommand::CreateChecklist { title } => {
            let service = catalog_service(conn, changes, config)?;
            service.create(&title)?;
            Ok(())
        }
        EngineCommand::RenameChecklist {
            old_title,
            new_title,
        } => {
            let service = catalog_service(conn, changes, config)?;
            service.rename(&old_title, &new_title)?;
            Ok(())
        }
        EngineCommand::DeleteChecklist { title } => {
            let service = catalog_service(conn, changes, config)?;
            service.delete(&title)?;
            Ok(())
        }
        EngineCommand::ActivateChecklist { title } => {
            let service = catalog_service(conn, changes, config)?;
            service.set_active(&title)?;
            Ok(())
        }
    }
}

fn run_fetch_board(
    conn: &Connection,
    changes: &ChangeBus,
    config: &EngineConfig,
    checklist: &str,
) -> EngineResult<ChecklistBoard> {
    let service = item_service(conn, changes, config)?;
    Ok(service.board(checklist)?)
}

fn run_fetch_catalog(conn: &Connection, changes: &ChangeBus) -> EngineResult<Vec<Checklist>> {
    let repo = SqliteChecklistRepository::try_new(conn, changes)?;
    Ok(repo.list()?)
}

fn item_service<'a>(
    conn: &'a Connection,
    changes: &'a ChangeBus,
    config: &EngineConfig,
) -> EngineResult<ItemService<SqliteItemRepository<'a>>> {
    let repo = SqliteItemRepository::try_new(conn, changes)?;
    Ok(ItemService::new(repo, config.insert_policy))
}

fn catalog_service<'a>(
    conn: &'a Connection,
    changes: &'a ChangeBus,
    config: &EngineConfig,
) -> EngineResult<ChecklistService<SqliteChecklistRepository<'a>>> {
    let repo = SqliteChecklistRepository::try_new(conn, changes)?;
    Ok(ChecklistService::new(repo, config.max_title_chars))
}
