// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{HttpRequest, HttpResponse};

pub const FLASH_COOKIE: &str = "docket_flash";

/// One-shot notice carried across a redirect in a short-lived cookie. The
/// page render that consumes it attaches a removal cookie so the notice
/// shows exactly once.
pub fn flash_redirect(location: &str, message: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .cookie(flash_cookie(message))
        .finish()
}

pub fn flash_cookie<'a>(message: &str) -> Cookie<'a> {
    Cookie::build(FLASH_COOKIE, urlencoding::encode(message).into_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5))
        .finish()
}

pub fn removal_cookie<'a>() -> Cookie<'a> {
    Cookie::build(FLASH_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(0))
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .finish()
}

pub fn take_flash(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    let value = cookie.value();
    if value.is_empty() {
        return None;
    }
    match urlencoding::decode(value) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => None,
    }
}
