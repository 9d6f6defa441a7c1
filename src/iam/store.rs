// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::iam::password::{hash_password, verify_password};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_TEMP_ATTEMPTS: u32 = 100;

/// Credentials file: a YAML mapping of username to password hash. The file
/// is re-read on every operation so external edits take effect without a
/// restart, and rewritten atomically (temp file + rename) so a crashed
/// write can never leave a half-written credentials file behind.
pub struct UserStore {
    users_file: PathBuf,
}

#[derive(Debug)]
pub enum UserStoreError {
    InvalidUsername,
    AlreadyExists,
    Storage(String),
}

impl fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStoreError::InvalidUsername => write!(f, "username contains invalid characters"),
            UserStoreError::AlreadyExists => write!(f, "username already exists"),
            UserStoreError::Storage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for UserStoreError {}

impl UserStore {
    pub fn new(users_file: PathBuf) -> Self {
        Self { users_file }
    }

    pub fn load(&self) -> Result<BTreeMap<String, String>, UserStoreError> {
        if !self.users_file.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.users_file)
            .map_err(|err| UserStoreError::Storage(format!("Failed to read users file: {}", err)))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_yaml::from_str(&content)
            .map_err(|err| UserStoreError::Storage(format!("Failed to parse users file: {}", err)))
    }

    /// Credential oracle: true only when the username is known and the
    /// password verifies against its stored hash.
    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        let users = match self.load() {
            Ok(users) => users,
            Err(err) => {
                log::error!("User store unavailable during sign-in: {}", err);
                return false;
            }
        };
        match users.get(username) {
            Some(stored_hash) => verify_password(password, stored_hash),
            None => false,
        }
    }

    pub fn add_user(&self, username: &str, password: &str) -> Result<(), UserStoreError> {
        if !valid_new_username(username) {
            return Err(UserStoreError::InvalidUsername);
        }
        let mut users = self.load()?;
        if users.contains_key(username) {
            return Err(UserStoreError::AlreadyExists);
        }
        let stored_hash = hash_password(password)
            .map_err(|err| UserStoreError::Storage(format!("Failed to hash password: {}", err)))?;
        users.insert(username.to_string(), stored_hash);
        self.write_atomic(&users)
    }

    fn write_atomic(&self, users: &BTreeMap<String, String>) -> Result<(), UserStoreError> {
        let content = serde_yaml::to_string(users)
            .map_err(|err| UserStoreError::Storage(format!("Failed to serialize users: {}", err)))?;
        let parent = self
            .users_file
            .parent()
            .ok_or_else(|| UserStoreError::Storage("Users file path has no parent".to_string()))?;
        let file_name = self
            .users_file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| UserStoreError::Storage("Users file path has no file name".to_string()))?;

        let (mut file, temp_path) = create_temp_file(parent, file_name)?;

        if let Err(err) = file.write_all(content.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(UserStoreError::Storage(format!(
                "Failed to write users temp file: {}",
                err
            )));
        }
        if let Err(err) = file.sync_all() {
            let _ = fs::remove_file(&temp_path);
            return Err(UserStoreError::Storage(format!(
                "Failed to sync users temp file: {}",
                err
            )));
        }
        if let Err(err) = fs::rename(&temp_path, &self.users_file) {
            let _ = fs::remove_file(&temp_path);
            return Err(UserStoreError::Storage(format!(
                "Failed to replace users file: {}",
                err
            )));
        }
        Ok(())
    }
}

fn create_temp_file(parent: &Path, file_name: &str) -> Result<(fs::File, PathBuf), UserStoreError> {
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let temp_name = format!(".{}.tmp.{}.{}", file_name, std::process::id(), attempt);
        let temp_path = parent.join(temp_name);
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path);
        match file {
            Ok(file) => return Ok((file, temp_path)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(UserStoreError::Storage(format!(
                    "Failed to create users temp file: {}",
                    err
                )));
            }
        }
    }
    Err(UserStoreError::Storage(
        "Failed to create users temp file after multiple attempts".to_string(),
    ))
}

fn valid_new_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
