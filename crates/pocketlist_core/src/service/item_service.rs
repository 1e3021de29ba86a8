//! Board ordering use-case service.
//!
//! # Responsibility
//! - Implement the insert/flip/reorder/remove state machine over board
//!   items: name dedupe, partition membership, dense renumbering and the
//!   incidence algebra.
//! - Issue exactly one bulk-replace write per logical user action.
//!
//! # Invariants
//! - After every operation, each partition's positions are exactly
//!   `0..n-1` in display order.
//! - The checked partition is ranked by descending incidence after every
//!   flip; manual reorders rewrite incidences so the chosen order becomes
//!   the incidence order with minimal changes.
//! - Every operation re-reads authoritative state first and never caches
//!   items across calls.
//!
//! # See also
//! - docs/architecture/ordering.md

use crate::config::InsertPolicy;
use crate::model::item::{normalize_item_name, ChecklistItem, ItemId, Position};
use crate::repo::item_repo::{ItemRepoError, ItemRepository};
use std::cmp::Reverse;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from board ordering operations.
///
/// `EmptyName` is user-correctable; the remaining non-repo variants are
/// caller-contract violations (the presentation layer asserted state that
/// does not exist) and are surfaced as defects, not retried.
#[derive(Debug)]
pub enum ItemServiceError {
    /// Item name is blank after normalization.
    EmptyName,
    /// No checklist with this title exists.
    UnknownChecklist(String),
    /// No item with this name exists on the checklist.
    MissingItem { checklist: String, name: String },
    /// Reorder input is not a permutation of the stored partition.
    PartitionMismatch(String),
    /// Repository-level failure.
    Repo(ItemRepoError),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name must not be blank"),
            Self::UnknownChecklist(title) => write!(f, "checklist not found: `{title}`"),
            Self::MissingItem { checklist, name } => {
                write!(f, "item `{name}` not found in checklist `{checklist}`")
            }
            Self::PartitionMismatch(detail) => {
                write!(f, "reorder does not match stored partition: {detail}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemRepoError> for ItemServiceError {
    fn from(value: ItemRepoError) -> Self {
        Self::Repo(value)
    }
}

/// One row of a board as shown to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub name: String,
    pub is_checked: bool,
}

/// Snapshot of one checklist's two partitions in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistBoard {
    pub title: String,
    pub unchecked: Vec<ItemView>,
    pub checked: Vec<ItemView>,
}

/// Board ordering service facade.
pub struct ItemService<R: ItemRepository> {
    repo: R,
    insert_policy: InsertPolicy,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates the service from a repository implementation and the
    /// configured insertion policy.
    pub fn new(repo: R, insert_policy: InsertPolicy) -> Self {
        Self {
            repo,
            insert_policy,
        }
    }

    /// Adds `raw_name` to the checklist, or resolves the collision when the
    /// name already exists.
    ///
    /// A same-partition duplicate is moved to the tail of its partition; an
    /// opposite-partition duplicate is flipped instead of duplicated.
    pub fn insert_item(
        &self,
        checklist: &str,
        raw_name: &str,
        is_checked: bool,
    ) -> Result<(), ItemServiceError> {
        let name = normalize_item_name(raw_name).ok_or(ItemServiceError::EmptyName)?;
        self.ensure_checklist(checklist)?;
        let items = self.repo.list_items(checklist)?;

        let existing = items
            .iter()
            .find(|item| item.answers_to(&name))
            .map(|item| (item.uuid, item.is_checked));
        match existing {
            None => {
                let (mut target, rest) = split_partition(items, is_checked);
                let item = ChecklistItem::new(name, is_checked);
                match self.insert_policy {
                    InsertPolicy::InsertAtTop => target.insert(0, item),
                    InsertPolicy::InsertAtBottom => target.push(item),
                }
                assign_dense_positions(&mut target);
                self.commit(checklist, is_checked, target, rest)
            }
            Some((uuid, checked)) if checked == is_checked => {
                let (mut target, rest) = split_partition(items, is_checked);
                let index = target.iter().position(|item| item.uuid == uuid);
                if let Some(index) = index {
                    let moved = target.remove(index);
                    target.push(moved);
                }
                assign_dense_positions(&mut target);
                self.commit(checklist, is_checked, target, rest)
            }
            Some((uuid, _)) => self.flip_loaded(checklist, items, uuid),
        }
    }

    /// Toggles the checked state of the named item.
    pub fn flip_item(&self, checklist: &str, raw_name: &str) -> Result<(), ItemServiceError> {
        self.ensure_checklist(checklist)?;
        let name = normalize_item_name(raw_name).ok_or_else(|| ItemServiceError::MissingItem {
            checklist: checklist.to_string(),
            name: raw_name.trim().to_string(),
        })?;
        let items = self.repo.list_items(checklist)?;

        let Some(uuid) = items
            .iter()
            .find(|item| item.answers_to(&name))
            .map(|item| item.uuid)
        else {
            return Err(ItemServiceError::MissingItem {
                checklist: checklist.to_string(),
                name,
            });
        };

        self.flip_loaded(checklist, items, uuid)
    }

    /// Applies a drag-and-drop result: `names_in_new_order` must be a
    /// permutation of the current partition contents.
    pub fn reorder_partition(
        &self,
        checklist: &str,
        is_checked: bool,
        names_in_new_order: &[String],
    ) -> Result<(), ItemServiceError> {
        self.ensure_checklist(checklist)?;
        let items = self.repo.list_items(checklist)?;
        let (current, rest) = split_partition(items, is_checked);

        if names_in_new_order.len() != current.len() {
            return Err(ItemServiceError::PartitionMismatch(format!(
                "expected {} item references, got {}",
                current.len(),
                names_in_new_order.len()
            )));
        }

        let mut remaining = current;
        let mut ordered = Vec::with_capacity(remaining.len());
        for raw_name in names_in_new_order {
            let name = normalize_item_name(raw_name).ok_or_else(|| {
                ItemServiceError::PartitionMismatch("blank item reference".to_string())
            })?;
            let Some(index) = remaining.iter().position(|item| item.answers_to(&name)) else {
                return Err(ItemServiceError::PartitionMismatch(format!(
                    "unknown or repeated item reference `{name}`"
                )));
            };
            ordered.push(remaining.swap_remove(index));
        }

        assign_dense_positions(&mut ordered);
        if is_checked {
            align_incidence_to_manual_order(&mut ordered);
        }
        self.commit(checklist, is_checked, ordered, rest)
    }

    /// Removes the named item and renumbers its partition.
    pub fn remove_item(&self, checklist: &str, raw_name: &str) -> Result<(), ItemServiceError> {
        self.ensure_checklist(checklist)?;
        let name = normalize_item_name(raw_name).ok_or_else(|| ItemServiceError::MissingItem {
            checklist: checklist.to_string(),
            name: raw_name.trim().to_string(),
        })?;
        let items = self.repo.list_items(checklist)?;

        if !items.iter().any(|item| item.answers_to(&name)) {
            return Err(ItemServiceError::MissingItem {
                checklist: checklist.to_string(),
                name,
            });
        }

        let mut unchecked = Vec::new();
        let mut checked = Vec::new();
        for item in items {
            if item.answers_to(&name) {
                continue;
            }
            if item.is_checked {
                checked.push(item);
            } else {
                unchecked.push(item);
            }
        }
        assign_dense_positions(&mut unchecked);
        assign_dense_positions(&mut checked);
        self.commit(checklist, false, unchecked, checked)
    }

    /// Returns both partitions of the checklist in display order.
    pub fn board(&self, checklist: &str) -> Result<ChecklistBoard, ItemServiceError> {
        self.ensure_checklist(checklist)?;
        let items = self.repo.list_items(checklist)?;

        let mut board = ChecklistBoard {
            title: checklist.to_string(),
            unchecked: Vec::new(),
            checked: Vec::new(),
        };
        for item in items {
            let view = ItemView {
                name: item.name,
                is_checked: item.is_checked,
            };
            if view.is_checked {
                board.checked.push(view);
            } else {
                board.unchecked.push(view);
            }
        }

        Ok(board)
    }

    fn flip_loaded(
        &self,
        checklist: &str,
        items: Vec<ChecklistItem>,
        target: ItemId,
    ) -> Result<(), ItemServiceError> {
        let mut unchecked: Vec<(Position, ChecklistItem)> = Vec::new();
        let mut checked: Vec<ChecklistItem> = Vec::new();

        for mut item in items {
            if item.uuid == target {
                item.incidence += 1;
                item.is_checked = !item.is_checked;
                if item.is_checked {
                    checked.push(item);
                } else {
                    // Unchecking sends the item to the bottom of the to-do
                    // list, not back to its old slot.
                    unchecked.push((Position::End, item));
                }
            } else if item.is_checked {
                checked.push(item);
            } else {
                unchecked.push((Position::At(item.position), item));
            }
        }

        let unchecked = resolve_positions(unchecked);
        let checked = rank_checked_by_incidence(checked);
        self.commit(checklist, false, unchecked, checked)
    }

    fn ensure_checklist(&self, checklist: &str) -> Result<(), ItemServiceError> {
        if self.repo.checklist_exists(checklist)? {
            Ok(())
        } else {
            Err(ItemServiceError::UnknownChecklist(checklist.to_string()))
        }
    }

    /// Writes both partitions back as one bulk replace, unchecked rows
    /// first.
    ///
    /// `target` holds the partition selected by `target_checked`; `rest` is
    /// the other partition.
    fn commit(
        &self,
        checklist: &str,
        target_checked: bool,
        target: Vec<ChecklistItem>,
        rest: Vec<ChecklistItem>,
    ) -> Result<(), ItemServiceError> {
        let (mut all, tail) = if target_checked {
            (rest, target)
        } else {
            (target, rest)
        };
        all.extend(tail);
        self.repo.replace_items(checklist, &all)?;
        Ok(())
    }
}

fn split_partition(
    items: Vec<ChecklistItem>,
    is_checked: bool,
) -> (Vec<ChecklistItem>, Vec<ChecklistItem>) {
    items
        .into_iter()
        .partition(|item| item.is_checked == is_checked)
}

fn assign_dense_positions(items: &mut [ChecklistItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.position = index as i64;
    }
}

/// Orders entries by their tagged position (`End` sorts last, stably) and
/// resolves them to dense positions.
fn resolve_positions(mut entries: Vec<(Position, ChecklistItem)>) -> Vec<ChecklistItem> {
    entries.sort_by_key(|(position, _)| *position);
    let mut items: Vec<ChecklistItem> = entries.into_iter().map(|(_, item)| item).collect();
    assign_dense_positions(&mut items);
    items
}

/// Ranks the checked partition by descending incidence (stable) and assigns
/// dense positions.
fn rank_checked_by_incidence(mut items: Vec<ChecklistItem>) -> Vec<ChecklistItem> {
    items.sort_by_key(|item| Reverse(item.incidence));
    assign_dense_positions(&mut items);
    items
}

/// Greedy minimal rewrite making incidence strictly descending in the given
/// order.
///
/// The first item is unconstrained; each later item keeps its incidence
/// when it already sorts below its predecessor and is otherwise reassigned
/// to predecessor minus one, which may go negative.
fn align_incidence_to_manual_order(items: &mut [ChecklistItem]) {
    let mut prev_incidence: Option<i64> = None;
    for item in items.iter_mut() {
        if let Some(prev) = prev_incidence {
            if item.incidence >= prev {
                item.incidence = prev - 1;
            }
        }
        prev_incidence = Some(item.incidence);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        align_incidence_to_manual_order, assign_dense_positions, rank_checked_by_incidence,
        resolve_positions, split_partition,
    };
    use crate::model::item::{ChecklistItem, Position};

    fn item(name: &str, is_checked: bool, position: i64, incidence: i64) -> ChecklistItem {
        let mut item = ChecklistItem::new(name, is_checked);
        item.position = position;
        item.incidence = incidence;
        item
    }

    #[test]
    fn resolve_positions_sorts_end_markers_last() {
        let entries = vec![
            (Position::At(1), item("B", false, 1, 0)),
            (Position::End, item("D", false, 9, 0)),
            (Position::At(0), item("A", false, 0, 0)),
            (Position::At(2), item("C", false, 2, 0)),
        ];

        let resolved = resolve_positions(entries);

        let names: Vec<&str> = resolved.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
        let positions: Vec<i64> = resolved.iter().map(|item| item.position).collect();
        assert_eq!(positions, [0, 1, 2, 3]);
    }

    #[test]
    fn rank_checked_orders_by_descending_incidence_stably() {
        let items = vec![
            item("newest", true, 0, 2),
            item("often", true, 1, 5),
            item("tied", true, 2, 2),
        ];

        let ranked = rank_checked_by_incidence(items);

        let names: Vec<&str> = ranked.iter().map(|item| item.name.as_str()).collect();
        // Equal incidences keep their input order.
        assert_eq!(names, ["often", "newest", "tied"]);
        let positions: Vec<i64> = ranked.iter().map(|item| item.position).collect();
        assert_eq!(positions, [0, 1, 2]);
    }

    #[test]
    fn align_incidence_keeps_first_item_unconstrained() {
        let mut items = vec![item("Y", true, 0, 3), item("X", true, 1, 5)];

        align_incidence_to_manual_order(&mut items);

        assert_eq!(items[0].incidence, 3);
        assert_eq!(items[1].incidence, 2);
    }

    #[test]
    fn align_incidence_leaves_already_descending_sequences_alone() {
        let mut items = vec![
            item("a", true, 0, 9),
            item("b", true, 1, 4),
            item("c", true, 2, 1),
        ];

        align_incidence_to_manual_order(&mut items);

        let incidences: Vec<i64> = items.iter().map(|item| item.incidence).collect();
        assert_eq!(incidences, [9, 4, 1]);
    }

    #[test]
    fn align_incidence_can_go_negative() {
        let mut items = vec![
            item("a", true, 0, 0),
            item("b", true, 1, 0),
            item("c", true, 2, 0),
        ];

        align_incidence_to_manual_order(&mut items);

        let incidences: Vec<i64> = items.iter().map(|item| item.incidence).collect();
        assert_eq!(incidences, [0, -1, -2]);
    }

    #[test]
    fn split_partition_separates_by_checked_flag() {
        let items = vec![
            item("a", false, 0, 0),
            item("b", true, 0, 1),
            item("c", false, 1, 0),
        ];

        let (unchecked, checked) = split_partition(items, false);

        assert_eq!(unchecked.len(), 2);
        assert_eq!(checked.len(), 1);
        assert_eq!(checked[0].name, "b");
    }

    #[test]
    fn assign_dense_positions_renumbers_from_zero() {
        let mut items = vec![item("a", false, 7, 0), item("b", false, 3, 0)];

        assign_dense_positions(&mut items);

        assert_eq!(items[0].position, 0);
        assert_eq!(items[1].position, 1);
    }
}
