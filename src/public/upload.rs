// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use minijinja::context;
use std::fs;

use crate::app_state::AppState;
use crate::public::flash::flash_redirect;
use crate::public::{render_page, render_page_with_notice, require_user};

/// Image upload page. The actual upload is a raw-body POST to
/// `/images/{filename}` issued by the page's script.
pub async fn upload_form(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let allowed_extensions = state.config.upload.allowed_extensions.join(", ");
    render_page(
        &state,
        &req,
        "public/upload_image.html",
        context! { allowed_extensions },
    )
}

pub async fn upload_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    if let Err(redirect) = require_user(&state, &req) {
        return redirect;
    }
    let Some(file_name) = sanitize_image_name(&path, &state) else {
        let allowed_extensions = state.config.upload.allowed_extensions.join(", ");
        return render_page_with_notice(
            &state,
            &req,
            "public/upload_image.html",
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unsupported image format.",
            context! { allowed_extensions },
        );
    };
    let target = state.runtime_paths.images_dir.join(&file_name);
    if let Err(err) = fs::write(&target, &body) {
        log::error!("Failed to store image '{}': {}", file_name, err);
        return HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body("Internal server error");
    }
    flash_redirect("/", "Image has been uploaded successfully.")
}

/// Basenames of the stored images, filtered through the configured
/// extension allow-list, sorted for stable listings.
pub fn list_images(state: &AppState) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(&state.runtime_paths.images_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(raw) = file_name.to_str() else {
            continue;
        };
        let Some(idx) = raw.rfind('.').filter(|idx| *idx > 0) else {
            continue;
        };
        if state.config.upload.extension_allowed(&raw[idx..]) {
            names.push(raw.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Basename extraction plus the configured extension allow-list. Unlike
/// document names, the allowed extensions come from configuration.
fn sanitize_image_name(raw: &str, state: &AppState) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    let base = decoded
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(decoded.as_ref());
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    let idx = base.rfind('.').filter(|idx| *idx > 0)?;
    if !state.config.upload.extension_allowed(&base[idx..]) {
        return None;
    }
    Some(base.to_string())
}
