// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_description")]
    pub description: String,
}

fn default_app_name() -> String {
    "Docket".to_string()
}

fn default_app_description() -> String {
    "Flat-file document CMS".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: default_app_description(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl_seconds")]
    pub ttl_seconds: u64,
}

fn default_session_ttl_seconds() -> u64 {
    3600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl_seconds(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_image_size_mb")]
    pub max_image_size_mb: u64,
    #[serde(default = "default_image_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_max_image_size_mb() -> u64 {
    10
}

fn default_image_extensions() -> Vec<String> {
    vec!["png".to_string(), "jpg".to_string()]
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_size_mb: default_max_image_size_mb(),
            allowed_extensions: default_image_extensions(),
        }
    }
}

impl UploadConfig {
    pub fn max_image_size_bytes(&self) -> usize {
        (self.max_image_size_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn extension_allowed(&self, extension: &str) -> bool {
        let bare = extension.trim_start_matches('.');
        self.allowed_extensions.iter().any(|allowed| allowed == bare)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ValidatedConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl ValidatedConfig {
    pub fn log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "app.name must not be empty".to_string(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "logging.level '{}' is not one of trace/debug/info/warn/error",
                    other
                )));
            }
        }
        if self.session.ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "session.ttl_seconds must be non-zero".to_string(),
            ));
        }
        if self.upload.allowed_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "upload.allowed_extensions must not be empty".to_string(),
            ));
        }
        for extension in &self.upload.allowed_extensions {
            let bare = extension.trim_start_matches('.');
            if bare.is_empty() || !bare.chars().all(|ch| ch.is_ascii_alphanumeric()) {
                return Err(ConfigError::ValidationError(format!(
                    "upload.allowed_extensions entry '{}' must be alphanumeric",
                    extension
                )));
            }
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<ValidatedConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| {
        ConfigError::LoadError(format!("Failed to read '{}': {}", path.display(), err))
    })?;
    let config: ValidatedConfig = serde_yaml::from_str(&content).map_err(|err| {
        ConfigError::LoadError(format!("Failed to parse '{}': {}", path.display(), err))
    })?;
    config.validate()?;
    Ok(config)
}

pub fn default_config_yaml() -> String {
    let config = ValidatedConfig::default();
    serde_yaml::to_string(&config).unwrap_or_else(|_| String::new())
}
