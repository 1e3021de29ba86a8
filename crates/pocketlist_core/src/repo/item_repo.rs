//! Board item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide partition-ordered reads and the atomic bulk-replace write over
//!   `checklist_items` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `replace_items` commits the whole board state in one transaction and
//!   publishes exactly one change event after commit.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Point lookups by name ignore ASCII case, matching the schema's
//!   `COLLATE NOCASE` identity index.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::item::ChecklistItem;
use crate::notify::{ChangeBus, StoreChange};
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    is_checked,
    position,
    incidence
FROM checklist_items";

/// Result type used by board item repository operations.
pub type ItemRepoResult<T> = Result<T, ItemRepoError>;

/// Errors from board item repository operations.
#[derive(Debug)]
pub enum ItemRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
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

impl Display for ItemRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "item repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "item repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "item repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for ItemRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for ItemRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ItemRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for board item reads and the bulk-replace write.
pub trait ItemRepository {
    /// Returns whether a checklist with this exact title exists.
    fn checklist_exists(&self, checklist: &str) -> ItemRepoResult<bool>;
    /// Returns every item of the checklist, unchecked partition first, each
    /// partition ordered by ascending position.
    fn list_items(&self, checklist: &str) -> ItemRepoResult<Vec<ChecklistItem>>;
    /// Returns one partition of the checklist ordered by ascending position.
    fn list_partition(
        &self,
        checklist: &str,
        is_checked: bool,
    ) -> ItemRepoResult<Vec<ChecklistItem>>;
    /// Case-insensitive point lookup by item name.
    fn find_by_name(&self, checklist: &str, name: &str) -> ItemRepoResult<Option<ChecklistItem>>;
    /// Replaces the checklist's entire item set in one transaction.
    ///
    /// Rows whose uuid is already persisted are updated, unknown uuids are
    /// inserted, and persisted rows absent from `items` are deleted. One
    /// `StoreChange::Items` event is published after commit.
    fn replace_items(&self, checklist: &str, items: &[ChecklistItem]) -> ItemRepoResult<()>;
}

/// SQLite-backed board item repository.
pub struct SqliteItemRepository<'a> {
    conn: &'a Connection,
    changes: &'a ChangeBus,
}

impl<'a> SqliteItemRepository<'a> {
    /// Validates schema readiness before exposing repository operations.
    pub fn try_new(conn: &'a Connection, changes: &'a ChangeBus) -> ItemRepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn, changes })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn checklist_exists(&self, checklist: &str) -> ItemRepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM checklists
                WHERE title = ?1
            );",
            [checklist],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_items(&self, checklist: &str) -> ItemRepoResult<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE checklist_title = ?1
             ORDER BY is_checked ASC, position ASC;"
        ))?;

        let mut rows = stmt.query([checklist])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn list_partition(
        &self,
        checklist: &str,
        is_checked: bool,
    ) -> ItemRepoResult<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE checklist_title = ?1
               AND is_checked = ?2
             ORDER BY position ASC;"
        ))?;

        let mut rows = stmt.query(params![checklist, bool_to_int(is_checked)])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn find_by_name(&self, checklist: &str, name: &str) -> ItemRepoResult<Option<ChecklistItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE checklist_title = ?1
               AND name = ?2 COLLATE NOCASE;"
        ))?;

        let mut rows = stmt.query(params![checklist, name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn replace_items(&self, checklist: &str, items: &[ChecklistItem]) -> ItemRepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        delete_absent_items(&tx, checklist, items)?;
        for item in items {
            let changed = tx.execute(
                "UPDATE checklist_items
                 SET name = ?3,
                     is_checked = ?4,
                     position = ?5,
                     incidence = ?6
                 WHERE uuid = ?1
                   AND checklist_title = ?2;",
                params![
                    item.uuid.to_string(),
                    checklist,
                    item.name.as_str(),
                    bool_to_int(item.is_checked),
                    item.position,
                    item.incidence,
                ],
            )?;
            if changed == 0 {
                tx.execute(
                    "INSERT INTO checklist_items (
                        uuid,
                        checklist_title,
                        name,
                        is_checked,
                        position,
                        incidence
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                    params![
                        item.uuid.to_string(),
                        checklist,
                        item.name.as_str(),
                        bool_to_int(item.is_checked),
                        item.position,
                        item.incidence,
                    ],
                )?;
            }
        }

        tx.commit()?;
        self.changes.publish(&StoreChange::Items {
            checklist: checklist.to_string(),
        });
        Ok(())
    }
}

fn delete_absent_items(
    tx: &Transaction<'_>,
    checklist: &str,
    kept: &[ChecklistItem],
) -> ItemRepoResult<()> {
    if kept.is_empty() {
        tx.execute(
            "DELETE FROM checklist_items WHERE checklist_title = ?1;",
            [checklist],
        )?;
        return Ok(());
    }

    let placeholders = (0..kept.len())
        .map(|index| format!("?{}", index + 2))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "DELETE FROM checklist_items
         WHERE checklist_title = ?1
           AND uuid NOT IN ({placeholders});"
    );

    let mut bind_values: Vec<String> = Vec::with_capacity(kept.len() + 1);
    bind_values.push(checklist.to_string());
    bind_values.extend(kept.iter().map(|item| item.uuid.to_string()));

    tx.execute(&sql, params_from_iter(bind_values))?;
    Ok(())
}

fn parse_item_row(row: &Row<'_>) -> ItemRepoResult<ChecklistItem> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        ItemRepoError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in checklist_items.uuid"
        ))
    })?;

    let is_checked = match row.get::<_, i64>("is_checked")? {
        0 => false,
        1 => true,
        other => {
            return Err(ItemRepoError::InvalidData(format!(
                "invalid is_checked value `{other}` in checklist_items.is_checked"
            )));
        }
    };

    Ok(ChecklistItem {
        uuid,
        name: row.get("name")?,
        is_checked,
        position: row.get("position")?,
        incidence: row.get("incidence")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_item_connection_ready(conn: &Connection) -> ItemRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(ItemRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["checklists", "checklist_items"] {
        if !table_exists(conn, table)? {
            return Err(ItemRepoError::MissingRequiredTable(table));
        }
    }

    for column in [
        "uuid",
        "checklist_title",
        "name",
        "is_checked",
        "position",
        "incidence",
    ] {
        if !table_has_column(conn, "checklist_items", column)? {
            return Err(ItemRepoError::MissingRequiredColumn {
                table: "checklist_items",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> ItemRepoResult<bool> {
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

fn table_has_column(conn: &Connection, table: &str, column: &str) -> ItemRepoResult<bool> {
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
