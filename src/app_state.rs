// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;
use std::time::Duration;

use crate::config::ValidatedConfig;
use crate::documents::DocumentStore;
use crate::iam::UserStore;
use crate::login::sessions::SessionStore;
use crate::runtime_paths::RuntimePaths;
use crate::templates::{MiniJinjaEngine, TemplateEngine};

/// Shared application state handed to every actix worker.
pub struct AppState {
    pub config: Arc<ValidatedConfig>,
    pub templates: Arc<dyn TemplateEngine>,
    pub sessions: SessionStore,
    pub documents: DocumentStore,
    pub users: UserStore,
    pub runtime_paths: RuntimePaths,
}

impl AppState {
    pub fn new(config: Arc<ValidatedConfig>, runtime_paths: RuntimePaths) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session.ttl_seconds));
        let documents = DocumentStore::new(runtime_paths.documents_dir.clone());
        let users = UserStore::new(runtime_paths.users_file.clone());
        Self {
            config,
            templates: Arc::new(MiniJinjaEngine::new()),
            sessions,
            documents,
            users,
            runtime_paths,
        }
    }
}
