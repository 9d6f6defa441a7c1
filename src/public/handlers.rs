// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Document routes.
//!
//! Mutating routes require a signed-in user and answer validation failures
//! with a 422 re-render of the submitted form. Routes addressing an
//! existing document answer a missing file with a redirect and a notice.
//! Filesystem state is only ever checked at the moment of the request, so
//! a concurrent delete between check and use surfaces as an I/O error, not
//! as a panic.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use minijinja::context;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::documents::names::{DocumentName, duplicate_suggestion, sanitize_existing_name};
use crate::documents::render::{DocumentKind, render_markdown};
use crate::documents::store::StoreError;
use crate::public::flash::flash_redirect;
use crate::public::{render_page, render_page_with_notice, require_user};

#[derive(Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub filename: String,
}

#[derive(Deserialize)]
pub struct ContentForm {
    #[serde(default)]
    pub content: String,
}

pub async fn index(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let documents = match state.documents.list() {
        Ok(documents) => documents,
        Err(err) => {
            log::error!("Failed to list documents: {}", err);
            return internal_error();
        }
    };
    let images = match crate::public::upload::list_images(&state) {
        Ok(images) => images,
        Err(err) => {
            log::error!("Failed to list images: {}", err);
            return internal_error();
        }
    };
    render_page(
        &state,
        &req,
        "public/index.html",
        context! { documents, images },
    )
}

pub async fn show(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let Some(name) = existing(&state, &path) else {
        return flash_redirect("/", "File doesn't exist.");
    };
    let content = match state.documents.read(&name) {
        Ok(content) => content,
        Err(StoreError::NotFound) => return flash_redirect("/", "File doesn't exist."),
        Err(err) => {
            log::error!("Failed to read document '{}': {}", name, err);
            return internal_error();
        }
    };
    match DocumentKind::from_name(name.as_str()) {
        Some(DocumentKind::Markdown) => {
            let rendered = render_markdown(&content);
            render_page(&state, &req, "public/document.html", context! { rendered })
        }
        // Plain text is served verbatim, outside the layout.
        _ => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(content),
    }
}

pub async fn new_form(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    render_page(&state, &req, "public/new.html", context! { filename => "" })
}

pub async fn create(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<NameForm>,
) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let name = match state.documents.validate_new_name(&form.filename) {
        Ok(name) => name,
        Err(err) => {
            return render_page_with_notice(
                &state,
                &req,
                "public/new.html",
                StatusCode::UNPROCESSABLE_ENTITY,
                &err.to_string(),
                context! { filename => form.filename },
            );
        }
    };
    if let Err(err) = state.documents.create(&name) {
        log::error!("Failed to create document '{}': {}", name, err);
        return internal_error();
    }
    flash_redirect("/", &format!("{} has been created", name))
}

pub async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let Some(name) = existing(&state, &path) else {
        return flash_redirect("/", "Can't edit non-existing document.");
    };
    let content = match state.documents.read(&name) {
        Ok(content) => content,
        Err(StoreError::NotFound) => {
            return flash_redirect("/", "Can't edit non-existing document.");
        }
        Err(err) => {
            log::error!("Failed to read document '{}': {}", name, err);
            return internal_error();
        }
    };
    render_page(
        &state,
        &req,
        "public/edit.html",
        context! { name => name.as_str(), content },
    )
}

pub async fn update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Form<ContentForm>,
) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let Some(name) = existing(&state, &path) else {
        return flash_redirect("/", "File doesn't exist.");
    };
    match state.documents.save(&name, &form.content) {
        Ok(()) => flash_redirect("/", &format!("{} has been updated.", name)),
        Err(StoreError::NotFound) => flash_redirect("/", "File doesn't exist."),
        Err(err) => {
            log::error!("Failed to update document '{}': {}", name, err);
            internal_error()
        }
    }
}

pub async fn duplicate_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let Some(source) = existing(&state, &path) else {
        return flash_redirect("/", "Can't duplicate non-existing document.");
    };
    let filename = duplicate_suggestion(source.as_str());
    render_page(
        &state,
        &req,
        "public/duplicate.html",
        context! { source => source.as_str(), filename },
    )
}

pub async fn duplicate(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Form<NameForm>,
) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let Some(source) = existing(&state, &path) else {
        // The form was loaded while the source still existed.
        return render_page_with_notice(
            &state,
            &req,
            "public/duplicate.html",
            StatusCode::UNPROCESSABLE_ENTITY,
            "File to duplicate from doesn't exist.",
            context! { source => path.as_str(), filename => form.filename },
        );
    };
    let target = match state.documents.validate_new_name(&form.filename) {
        Ok(target) => target,
        Err(err) => {
            return render_page_with_notice(
                &state,
                &req,
                "public/duplicate.html",
                StatusCode::UNPROCESSABLE_ENTITY,
                &err.to_string(),
                context! { source => source.as_str(), filename => form.filename },
            );
        }
    };
    match state.documents.duplicate(&source, &target) {
        Ok(()) => flash_redirect(
            "/",
            &format!("{} has been duplicated from {}", target, source),
        ),
        Err(StoreError::NotFound) => render_page_with_notice(
            &state,
            &req,
            "public/duplicate.html",
            StatusCode::UNPROCESSABLE_ENTITY,
            "File to duplicate from doesn't exist.",
            context! { source => source.as_str(), filename => form.filename },
        ),
        Err(err) => {
            log::error!(
                "Failed to duplicate '{}' into '{}': {}",
                source,
                target,
                err
            );
            internal_error()
        }
    }
}

pub async fn delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let Some(name) = existing(&state, &path) else {
        return flash_redirect("/", "File doesn't exist.");
    };
    match state.documents.remove(&name) {
        Ok(()) => flash_redirect("/", &format!("{} deleted successfully.", name)),
        Err(StoreError::NotFound) => flash_redirect("/", "File doesn't exist."),
        Err(err) => {
            log::error!("Failed to delete document '{}': {}", name, err);
            internal_error()
        }
    }
}

/// Path segment to resolved document name. `None` covers both a name the
/// sanitizer rejects and a name with no file behind it.
fn existing(state: &AppState, raw: &str) -> Option<DocumentName> {
    let name = sanitize_existing_name(raw)?;
    state.documents.resolve_existing(&name)?;
    Some(name)
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/plain; charset=utf-8")
        .body("Internal server error")
}
