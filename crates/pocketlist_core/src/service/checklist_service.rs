//! Checklist catalog use-case service.
//!
//! # Responsibility
//! - Validate checklist titles before any write reaches the repository.
//! - Provide create/rename/delete/activate/list APIs over the catalog.
//!
//! # Invariants
//! - Titles are trimmed, non-empty and at most the configured number of
//!   characters.
//! - A freshly created checklist is always the active one.
//! - Title comparison for duplicate detection is exact after trimming.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::checklist::Checklist;
use crate::repo::checklist_repo::{CatalogRepoError, ChecklistRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogServiceError {
    /// Title is blank after trimming.
    EmptyTitle,
    /// Title exceeds the configured character limit.
    TitleTooLong { max_chars: usize },
    /// A checklist with this title already exists.
    DuplicateTitle(String),
    /// Target checklist does not exist.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(CatalogRepoError),
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "checklist title must not be blank"),
            Self::TitleTooLong { max_chars } => {
                write!(f, "checklist title exceeds {max_chars} characters")
            }
            Self::DuplicateTitle(title) => {
                write!(f, "checklist already exists: `{title}`")
            }
            Self::NotFound(title) => write!(f, "checklist not found: `{title}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogRepoError> for CatalogServiceError {
    fn from(value: CatalogRepoError) -> Self {
        match value {
            CatalogRepoError::TitleNotFound(title) => Self::NotFound(title),
            other => Self::Repo(other),
        }
    }
}

/// Trims `raw` and enforces the emptiness and length rules.
///
/// Length is counted in characters, not bytes.
pub fn normalize_title(raw: &str, max_chars: usize) -> Result<String, CatalogServiceError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(CatalogServiceError::EmptyTitle);
    }
    if title.chars().count() > max_chars {
        return Err(CatalogServiceError::TitleTooLong { max_chars });
    }
    Ok(title.to_string())
}

/// Catalog service facade over repository implementations.
pub struct ChecklistService<R: ChecklistRepository> {
    repo: R,
    max_title_chars: usize,
}

impl<R: ChecklistRepository> ChecklistService<R> {
    /// Creates a service using the provided repository implementation and
    /// the configured title length limit.
    pub fn new(repo: R, max_title_chars: usize) -> Self {
        Self {
            repo,
            max_title_chars,
        }
    }

    /// Creates a checklist and makes it the active one.
    ///
    /// Validation runs before any write; a failed create leaves the
    /// previously active checklist in place.
    pub fn create(&self, raw_title: &str) -> Result<Checklist, CatalogServiceError> {
        let title = normalize_title(raw_title, self.max_title_chars)?;
        if self.repo.get(&title)?.is_some() {
            return Err(CatalogServiceError::DuplicateTitle(title));
        }
        Ok(self.repo.create_active(&title)?)
    }

    /// Renames a checklist; its items follow the new title.
    ///
    /// Renaming to any existing title is rejected, including the current
    /// one.
    pub fn rename(&self, raw_old: &str, raw_new: &str) -> Result<(), CatalogServiceError> {
        let new_title = normalize_title(raw_new, self.max_title_chars)?;
        if self.repo.get(&new_title)?.is_some() {
            return Err(CatalogServiceError::DuplicateTitle(new_title));
        }
        self.repo.rename(raw_old.trim(), &new_title)?;
        Ok(())
    }

    /// Deletes a checklist together with its items.
    ///
    /// When the deleted checklist was active, the repository promotes the
    /// oldest remaining one.
    pub fn delete(&self, raw_title: &str) -> Result<(), CatalogServiceError> {
        self.repo.delete(raw_title.trim())?;
        Ok(())
    }

    /// Makes the named checklist the single active one.
    pub fn set_active(&self, raw_title: &str) -> Result<(), CatalogServiceError> {
        self.repo.set_active(raw_title.trim())?;
        Ok(())
    }

    /// Returns the whole catalog in creation order.
    pub fn list(&self) -> Result<Vec<Checklist>, CatalogServiceError> {
        Ok(self.repo.list()?)
    }

    /// Looks up one checklist by title.
    pub fn get(&self, raw_title: &str) -> Result<Option<Checklist>, CatalogServiceError> {
        Ok(self.repo.get(raw_title.trim())?)
    }
}
