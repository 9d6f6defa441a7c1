// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use docket::app_state::AppState;
use docket::config::ValidatedConfig;
use docket::iam::UserStore;
use docket::public::SESSION_COOKIE;
use docket::runtime_paths::RuntimePaths;
use docket::util::test_fixtures::TestFixtureRoot;
use docket::{login, public};
use std::fs;
use std::sync::Arc;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
}

pub struct AuthSession {
    pub username: String,
    pub cookie: actix_web::cookie::Cookie<'static>,
}

impl TestHarness {
    pub fn new() -> Self {
        let fixture = TestFixtureRoot::new_unique("docket-test-suite").expect("fixture root");
        fixture.init_runtime_layout().expect("fixture layout");
        fs::write(fixture.path().join("config.yaml"), "{}\n").expect("config file");
        fs::write(fixture.path().join("users.yaml"), "").expect("users file");

        let config = Arc::new(build_config());
        let runtime_paths = fixture.runtime_paths().expect("runtime paths");

        let users = UserStore::new(runtime_paths.users_file.clone());
        users
            .add_user(ADMIN_USERNAME, ADMIN_PASSWORD)
            .expect("seed admin user");

        let app_state = Arc::new(AppState::new(config.clone(), runtime_paths.clone()));

        Self {
            fixture,
            config,
            runtime_paths,
            app_state,
        }
    }

    /// Session issued directly against the store, bypassing the sign-in
    /// form. Form-based sign-in has its own tests.
    pub fn admin_auth(&self) -> AuthSession {
        let token = self.app_state.sessions.issue(ADMIN_USERNAME);
        let cookie = actix_web::cookie::Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .finish()
            .into_owned();
        AuthSession {
            username: ADMIN_USERNAME.to_string(),
            cookie,
        }
    }

    pub fn seed_document(&self, name: &str, content: &str) {
        fs::write(self.runtime_paths.documents_dir.join(name), content).expect("seed document");
    }

    pub fn document_content(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.runtime_paths.documents_dir.join(name)).ok()
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app_state = harness.app_state.clone();
    let runtime_paths = harness.runtime_paths.clone();
    let upload_limit = harness.config.upload.max_image_size_bytes();

    App::new()
        .app_data(web::Data::from(app_state))
        .app_data(web::PayloadConfig::new(upload_limit))
        .app_data(web::FormConfig::default().limit(1024 * 1024))
        .configure(login::configure)
        .configure(move |cfg| public::configure(cfg, &runtime_paths))
}

fn build_config() -> ValidatedConfig {
    let mut config = ValidatedConfig::default();
    config.app.name = "Docket Test".to_string();
    config.server.workers = 1;
    config
}

pub fn location_header(response: &ServiceResponse) -> Option<String> {
    response
        .headers()
        .get("Location")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

pub fn flash_message(response: &ServiceResponse) -> Option<String> {
    let header = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "docket_flash")?;
    urlencoding::decode(header.value())
        .ok()
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}
