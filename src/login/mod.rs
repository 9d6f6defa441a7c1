// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod sessions;

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use minijinja::context;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::iam::UserStoreError;
use crate::public::flash::flash_redirect;
use crate::public::{SESSION_COOKIE, current_user, render_page, render_page_with_notice};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users/signin")
            .route(web::get().to(sign_in_form))
            .route(web::post().to(sign_in)),
    )
    .service(web::resource("/users/signout").route(web::post().to(sign_out)))
    .service(
        web::resource("/users/signup")
            .route(web::get().to(sign_up_form))
            .route(web::post().to(sign_up)),
    );
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn session_cookie<'a>(token: String, ttl_seconds: u64) -> Cookie<'a> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl_seconds as i64))
        .finish()
}

fn session_removal_cookie<'a>() -> Cookie<'a> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(0))
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .finish()
}

async fn sign_in_form(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if current_user(&req, &state.sessions).is_some() {
        return flash_redirect("/", "You're already signed in");
    }
    render_page(&state, &req, "login/sign_in.html", context! { username => "" })
}

async fn sign_in(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<CredentialsForm>,
) -> HttpResponse {
    if current_user(&req, &state.sessions).is_some() {
        return flash_redirect("/", "You're already signed in");
    }
    if !state.users.verify_credentials(&form.username, &form.password) {
        return render_page_with_notice(
            &state,
            &req,
            "login/sign_in.html",
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid credentials",
            context! { username => form.username },
        );
    }
    let token = state.sessions.issue(&form.username);
    log::info!("User '{}' signed in", form.username);
    let mut response = flash_redirect("/", "Welcome!");
    if let Err(err) = response.add_cookie(&session_cookie(token, state.config.session.ttl_seconds))
    {
        log::error!("Failed to attach session cookie: {}", err);
        return HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body("Internal server error");
    }
    response
}

async fn sign_out(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.sessions.invalidate(cookie.value());
    }
    let mut response = flash_redirect("/", "You have been signed out.");
    if let Err(err) = response.add_cookie(&session_removal_cookie()) {
        log::error!("Failed to attach session removal cookie: {}", err);
    }
    response
}

async fn sign_up_form(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if current_user(&req, &state.sessions).is_some() {
        return flash_redirect("/", "You're already signed in");
    }
    render_page(&state, &req, "login/sign_up.html", context! { username => "" })
}

async fn sign_up(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<CredentialsForm>,
) -> HttpResponse {
    if current_user(&req, &state.sessions).is_some() {
        return flash_redirect("/", "You're already signed in");
    }
    if form.username.trim().is_empty() {
        return render_page_with_notice(
            &state,
            &req,
            "login/sign_up.html",
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid username.",
            context! { username => form.username },
        );
    }
    match state.users.add_user(&form.username, &form.password) {
        Ok(()) => {
            log::info!("User '{}' signed up", form.username);
            flash_redirect(
                "/users/signin",
                &format!("User {} successfully created", form.username),
            )
        }
        Err(UserStoreError::InvalidUsername) | Err(UserStoreError::AlreadyExists) => {
            render_page_with_notice(
                &state,
                &req,
                "login/sign_up.html",
                StatusCode::UNPROCESSABLE_ENTITY,
                "Username already exists or contains invalid characters.",
                context! { username => form.username },
            )
        }
        Err(err) => {
            log::error!("Failed to create user '{}': {}", form.username, err);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Internal server error")
        }
    }
}
