// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Document name validation.
//!
//! Every mutating route goes through one of two gates before touching the
//! filesystem: `validate_new_name` for names about to be created, and
//! `sanitize_existing_name` for names taken from a URL path segment. Both
//! yield a `DocumentName` whose string is guaranteed to be a plain basename
//! with a supported extension, so joining it onto the documents directory
//! can never escape that directory.

use std::fmt;

pub const ALLOWED_EXTENSIONS: [&str; 2] = [".txt", ".md"];

/// A document basename that passed validation. The inner string contains no
/// path separators and carries a supported extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentName(String);

impl DocumentName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Empty,
    IllegalCharacter,
    UnsupportedExtension,
    NameCollision,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "A name is required"),
            NameError::IllegalCharacter => {
                write!(f, "Name must contain only alphanumeric chars or . or _")
            }
            NameError::UnsupportedExtension => {
                write!(f, "Document must have .md or .txt extensions")
            }
            NameError::NameCollision => write!(f, "Name already exists."),
        }
    }
}

impl std::error::Error for NameError {}

/// Validates a user-supplied name for a document about to be created.
///
/// Rules apply in order, first failure wins; the ordering is observable
/// through the returned error and must not change:
/// 1. empty (or whitespace-only) name
/// 2. characters outside ASCII word characters and literal periods; this is
///    the traversal guard, since `/` and `\` fail it
/// 3. names made of periods only (`.`, `..`) — these would survive rule 2
///    and alias a directory after basename extraction
/// 4. extension not in the allowed set
/// 5. collision with an existing file, as reported by `exists`
pub fn validate_new_name<F>(raw: &str, exists: F) -> Result<DocumentName, NameError>
where
    F: Fn(&str) -> bool,
{
    if raw.trim().is_empty() {
        return Err(NameError::Empty);
    }
    if raw.chars().any(|ch| !is_word_char(ch) && ch != '.') {
        return Err(NameError::IllegalCharacter);
    }
    if raw.chars().all(|ch| ch == '.') {
        return Err(NameError::UnsupportedExtension);
    }
    match extension(raw) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext) => {}
        _ => return Err(NameError::UnsupportedExtension),
    }
    if exists(raw) {
        return Err(NameError::NameCollision);
    }
    Ok(DocumentName(raw.to_string()))
}

/// Reduces a raw path segment to a document basename, accepting it only when
/// its extension is supported.
///
/// Unlike `validate_new_name` this does not reject unusual characters:
/// existing files may predate the write-time allow-list. Directory
/// components are stripped outright (defense in depth against traversal;
/// the router should already hand us a single segment), and
/// percent-encoded input is decoded first so an encoded `..%2F` cannot
/// smuggle a separator past the basename split.
pub fn sanitize_existing_name(raw: &str) -> Option<DocumentName> {
    let decoded = urlencoding::decode(raw).ok()?;
    let base = basename(decoded.as_ref());
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    let ext = extension(base)?;
    if !ALLOWED_EXTENSIONS.contains(&ext) {
        return None;
    }
    Some(DocumentName(base.to_string()))
}

/// The extension from the last `.` to the end, but only when a non-empty
/// stem precedes it — `.txt` alone is a hidden file, not a `txt` document.
pub fn extension(name: &str) -> Option<&str> {
    let base = basename(name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => Some(&base[idx..]),
        _ => None,
    }
}

/// Suggested name for a copy of `name`: the stem with `_copy` appended,
/// extension preserved.
pub fn duplicate_suggestion(name: &str) -> String {
    match extension(name) {
        Some(ext) => format!("{}_copy{}", &name[..name.len() - ext.len()], ext),
        None => format!("{}_copy", name),
    }
}

fn basename(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
