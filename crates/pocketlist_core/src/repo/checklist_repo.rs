//! Checklist catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist catalog entries (title, active flag, creation order).
//! - Keep compound catalog mutations (create-and-activate, delete with
//!   successor activation) inside single transactions.
//!
//! # Invariants
//! - At most one row carries `is_active = 1`; every activation clears the
//!   others in the same transaction.
//! - Each committed mutation publishes exactly one `StoreChange::Catalog`
//!   event, after commit.
//! - Listing order is creation order and survives renames.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::checklist::Checklist;
use crate::notify::{ChangeBus, StoreChange};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CHECKLIST_SELECT_SQL: &str = "SELECT
    title,
    is_active,
    created_at
FROM checklists";

/// Result type used by catalog repository operations.
pub type CatalogRepoResult<T> = Result<T, CatalogRepoError>;

/// Errors from catalog repository operations.
#[derive(Debug)]
pub enum CatalogRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No catalog row carries this title.
    TitleNotFound(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for CatalogRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::TitleNotFound(title) => write!(f, "checklist not found: `{title}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for CatalogRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::TitleNotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for CatalogRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CatalogRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for checklist catalog operations.
pub trait ChecklistRepository {
    /// Point lookup by exact title.
    fn get(&self, title: &str) -> CatalogRepoResult<Option<Checklist>>;
    /// Returns every catalog entry in creation order.
    fn list(&self) -> CatalogRepoResult<Vec<Checklist>>;
    /// Inserts a new checklist and makes it the active one, atomically.
    fn create_active(&self, title: &str) -> CatalogRepoResult<Checklist>;
    /// Changes a checklist's identity key; item ownership follows via the
    /// schema's `ON UPDATE CASCADE`. Active flag and listing slot survive.
    fn rename(&self, old_title: &str, new_title: &str) -> CatalogRepoResult<()>;
    /// Deletes a checklist (items cascade). When the deleted entry was
    /// active, activates the first remaining entry in listing order.
    fn delete(&self, title: &str) -> CatalogRepoResult<()>;
    /// Marks one checklist active, clearing the flag on all others in the
    /// same transaction.
    fn set_active(&self, title: &str) -> CatalogRepoResult<()>;
}

/// SQLite-backed catalog repository.
pub struct SqliteChecklistRepository<'a> {
    conn: &'a Connection,
    changes: &'a ChangeBus,
}

impl<'a> SqliteChecklistRepository<'a> {
    /// Validates schema readiness before exposing repository operations.
    pub fn try_new(conn: &'a Connection, changes: &'a ChangeBus) -> CatalogRepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn, changes })
    }
}

impl ChecklistRepository for SqliteChecklistRepository<'_> {
    fn get(&self, title: &str) -> CatalogRepoResult<Option<Checklist>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CHECKLIST_SELECT_SQL}
             WHERE title = ?1;"
        ))?;

        let mut rows = stmt.query([title])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_checklist_row(row)?));
        }

        Ok(None)
    }

    fn list(&self) -> CatalogRepoResult<Vec<Checklist>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CHECKLIST_SELECT_SQL}
             ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut checklists = Vec::new();
        while let Some(row) = rows.next()? {
            checklists.push(parse_checklist_row(row)?);
        }

        Ok(checklists)
    }

    fn create_active(&self, title: &str) -> CatalogRepoResult<Checklist> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO checklists (title, is_active, created_at)
             VALUES (?1, 0, (strftime('%s', 'now') * 1000));",
            [title],
        )?;
        activate_in_tx(&tx, title)?;

        let created_at: i64 = tx.query_row(
            "SELECT created_at FROM checklists WHERE title = ?1;",
            [title],
            |row| row.get(0),
        )?;

        tx.commit()?;
        self.changes.publish(&StoreChange::Catalog);

        Ok(Checklist {
            title: title.to_string(),
            is_active: true,
            created_at,
        })
    }

    fn rename(&self, old_title: &str, new_title: &str) -> CatalogRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE checklists
             SET title = ?2
             WHERE title = ?1;",
            params![old_title, new_title],
        )?;
        if changed == 0 {
            return Err(CatalogRepoError::TitleNotFound(old_title.to_string()));
        }

        self.changes.publish(&StoreChange::Catalog);
        Ok(())
    }

    fn delete(&self, title: &str) -> CatalogRepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let was_active: Option<i64> = tx
            .query_row(
                "SELECT is_active FROM checklists WHERE title = ?1;",
                [title],
                |row| row.get(0),
            )
            .optional()?;
        let Some(was_active) = was_active else {
            return Err(CatalogRepoError::TitleNotFound(title.to_string()));
        };

        tx.execute("DELETE FROM checklists WHERE title = ?1;", [title])?;

        if was_active == 1 {
            // Successor rule: first remaining title in listing order. The
            // title filter keeps the choice correct even against a stale
            // cached list that still contains the deleted entry.
            let successor: Option<String> = tx
                .query_row(
                    "SELECT title
                     FROM checklists
                     WHERE title <> ?1
                     ORDER BY created_at ASC, rowid ASC
                     LIMIT 1;",
                    [title],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(successor) = successor {
                activate_in_tx(&tx, &successor)?;
            }
        }

        tx.commit()?;
        self.changes.publish(&StoreChange::Catalog);
        Ok(())
    }

    fn set_active(&self, title: &str) -> CatalogRepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let changed = activate_in_tx(&tx, title)?;
        if changed == 0 {
            return Err(CatalogRepoError::TitleNotFound(title.to_string()));
        }

        tx.commit()?;
        self.changes.publish(&StoreChange::Catalog);
        Ok(())
    }
}

/// Clears every active flag, then sets `title` active. Returns the number
/// of rows the final update touched (0 when `title` does not exist).
fn activate_in_tx(tx: &Transaction<'_>, title: &str) -> CatalogRepoResult<usize> {
    tx.execute(
        "UPDATE checklists
         SET is_active = 0
         WHERE is_active = 1
           AND title <> ?1;",
        [title],
    )?;
    let changed = tx.execute(
        "UPDATE checklists
         SET is_active = 1
         WHERE title = ?1;",
        [title],
    )?;
    Ok(changed)
}

fn parse_checklist_row(row: &Row<'_>) -> CatalogRepoResult<Checklist> {
    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(CatalogRepoError::InvalidData(format!(
                "invalid is_active value `{other}` in checklists.is_active"
            )));
        }
    };

    Ok(Checklist {
        title: row.get("title")?,
        is_active,
        created_at: row.get("created_at")?,
    })
}

fn ensure_catalog_connection_ready(conn: &Connection) -> CatalogRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(CatalogRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "checklists")? {
        return Err(CatalogRepoError::MissingRequiredTable("checklists"));
    }

    for column in ["title", "is_active", "created_at"] {
        if !table_has_column(conn, "checklists", column)? {
            return Err(CatalogRepoError::MissingRequiredColumn {
                table: "checklists",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> CatalogRepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> CatalogRepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
