// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::{self, ConfigError, ValidatedConfig};
use crate::runtime_paths::RuntimePaths;
use std::fs;
use std::path::Path;

pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub created_config: bool,
    pub created_users: bool,
}

/// Prepares the runtime root for a server start: seeds config.yaml and
/// users.yaml on first run, then loads and validates the configuration.
pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, ConfigError> {
    if !root.exists() {
        fs::create_dir_all(root).map_err(|err| {
            ConfigError::ValidationError(format!(
                "Failed to create runtime root '{}': {}",
                root.display(),
                err
            ))
        })?;
    }

    let config_file = root.join("config.yaml");
    let created_config = if config_file.exists() {
        false
    } else {
        fs::write(&config_file, config::default_config_yaml()).map_err(|err| {
            ConfigError::ValidationError(format!(
                "Failed to create '{}': {}",
                config_file.display(),
                err
            ))
        })?;
        true
    };

    let users_file = root.join("users.yaml");
    let created_users = if users_file.exists() {
        false
    } else {
        fs::write(&users_file, "").map_err(|err| {
            ConfigError::ValidationError(format!(
                "Failed to create '{}': {}",
                users_file.display(),
                err
            ))
        })?;
        true
    };

    let validated_config = config::load_config(&config_file)?;
    let runtime_paths = RuntimePaths::from_root(root)?;

    Ok(BootstrapResult {
        validated_config,
        runtime_paths,
        created_config,
        created_users,
    })
}
