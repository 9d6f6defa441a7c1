// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod flash;
pub mod handlers;
pub mod upload;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, guard, web};
use minijinja::{Value, context};

use crate::app_state::AppState;
use crate::login::sessions::SessionStore;
use crate::runtime_paths::RuntimePaths;
use crate::templates::TemplateEngine as _;

pub const SESSION_COOKIE: &str = "docket_session";

pub fn configure(cfg: &mut web::ServiceConfig, runtime_paths: &RuntimePaths) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(handlers::index))
            .route(web::post().to(handlers::create)),
    )
    .service(web::resource("/new").route(web::get().to(handlers::new_form)))
    .service(web::resource("/upload_image").route(web::get().to(upload::upload_form)))
    // POST uploads; anything else falls through to the static file service.
    .service(
        web::resource("/images/{filename}")
            .guard(guard::Post())
            .route(web::post().to(upload::upload_image)),
    )
    .service(actix_files::Files::new("/images", &runtime_paths.images_dir))
    .service(web::resource("/{filename}/edit").route(web::get().to(handlers::edit_form)))
    .service(
        web::resource("/{filename}/duplicate")
            .route(web::get().to(handlers::duplicate_form))
            .route(web::post().to(handlers::duplicate)),
    )
    .service(web::resource("/{filename}/delete").route(web::post().to(handlers::delete)))
    .service(
        web::resource("/{filename}")
            .route(web::get().to(handlers::show))
            .route(web::post().to(handlers::update)),
    );
}

pub fn current_user(req: &HttpRequest, sessions: &SessionStore) -> Option<String> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    sessions.lookup(cookie.value())
}

/// Renders a page, consuming any pending flash notice from the request
/// cookie and attaching its removal cookie to the response.
pub(crate) fn render_page(
    state: &AppState,
    req: &HttpRequest,
    template: &str,
    extra: Value,
) -> HttpResponse {
    let flash = flash::take_flash(req);
    let consumed = flash.is_some();
    page_response(state, req, template, StatusCode::OK, flash, consumed, extra)
}

/// Renders a page with an explicit notice, used for same-request validation
/// feedback. The pending flash cookie, if any, is left untouched.
pub(crate) fn render_page_with_notice(
    state: &AppState,
    req: &HttpRequest,
    template: &str,
    status: StatusCode,
    notice: &str,
    extra: Value,
) -> HttpResponse {
    page_response(
        state,
        req,
        template,
        status,
        Some(notice.to_string()),
        false,
        extra,
    )
}

fn page_response(
    state: &AppState,
    req: &HttpRequest,
    template: &str,
    status: StatusCode,
    flash: Option<String>,
    remove_flash_cookie: bool,
    extra: Value,
) -> HttpResponse {
    let ctx = context! {
        app_name => state.config.app.name,
        current_user => current_user(req, &state.sessions),
        flash => flash,
        ..extra
    };
    match state.templates.render(template, ctx) {
        Ok(body) => {
            let mut builder = HttpResponse::build(status);
            builder.content_type("text/html; charset=utf-8");
            if remove_flash_cookie {
                builder.cookie(flash::removal_cookie());
            }
            builder.body(body)
        }
        Err(err) => {
            log::error!("Failed to render template '{}': {}", template, err);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Internal server error")
        }
    }
}

/// Sign-in gate shared by every mutating route.
pub(crate) fn require_user(state: &AppState, req: &HttpRequest) -> Result<String, HttpResponse> {
    match current_user(req, &state.sessions) {
        Some(username) => Ok(username),
        None => Err(flash::flash_redirect(
            "/",
            "You must be signed in to do that.",
        )),
    }
}
