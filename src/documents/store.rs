// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::documents::names::{self, DocumentName, NameError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Flat-file document access rooted at a fixed directory.
///
/// Paths are recomputed on every call; nothing is cached. The directory is
/// shared with other processes and manual edits, so an existence check is
/// only ever advisory — callers may still hit the window between resolving
/// a path and using it.
pub struct DocumentStore {
    documents_dir: PathBuf,
}

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "document not found"),
            StoreError::Io(err) => write!(f, "document I/O failed: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl DocumentStore {
    pub fn new(documents_dir: PathBuf) -> Self {
        Self { documents_dir }
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// New-name validation with the collision rule wired to this store.
    pub fn validate_new_name(&self, raw: &str) -> Result<DocumentName, NameError> {
        names::validate_new_name(raw, |candidate| {
            self.documents_dir.join(candidate).is_file()
        })
    }

    /// Joins the documents directory with the validated basename and checks
    /// that a regular file is there. Directories and special files are never
    /// documents. Advisory: the file can vanish between this check and any
    /// subsequent read or write.
    pub fn resolve_existing(&self, name: &DocumentName) -> Option<PathBuf> {
        let path = self.documents_dir.join(name.as_str());
        if path.is_file() { Some(path) } else { None }
    }

    /// Basenames of all documents in the store, filtered through the same
    /// extension allow-list the routes use, sorted for stable listings.
    pub fn list(&self) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.documents_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(raw) = file_name.to_str() else {
                continue;
            };
            if names::sanitize_existing_name(raw).is_some() {
                names.push(raw.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn read(&self, name: &DocumentName) -> Result<String, StoreError> {
        let path = self.resolve_existing(name).ok_or(StoreError::NotFound)?;
        Ok(fs::read_to_string(path)?)
    }

    /// Creates an empty document under a name that already passed
    /// `validate_new_name`.
    pub fn create(&self, name: &DocumentName) -> Result<(), StoreError> {
        fs::write(self.documents_dir.join(name.as_str()), "")?;
        Ok(())
    }

    pub fn save(&self, name: &DocumentName, content: &str) -> Result<(), StoreError> {
        let path = self.resolve_existing(name).ok_or(StoreError::NotFound)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Copies the contents of `source` into a new document `target`. The
    /// target must already have passed `validate_new_name` (which includes
    /// the collision rule).
    pub fn duplicate(&self, source: &DocumentName, target: &DocumentName) -> Result<(), StoreError> {
        let source_path = self.resolve_existing(source).ok_or(StoreError::NotFound)?;
        let content = fs::read(source_path)?;
        fs::write(self.documents_dir.join(target.as_str()), content)?;
        Ok(())
    }

    pub fn remove(&self, name: &DocumentName) -> Result<(), StoreError> {
        let path = self.resolve_existing(name).ok_or(StoreError::NotFound)?;
        fs::remove_file(path)?;
        Ok(())
    }
}
