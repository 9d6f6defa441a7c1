// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

mod common;

use actix_web::{http::StatusCode, test};

#[actix_web::test]
async fn sign_in_issues_session() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/users/signin")
        .set_form([
            ("username", common::ADMIN_USERNAME),
            ("password", common::ADMIN_PASSWORD),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location_header(&resp).as_deref(), Some("/"));
    assert_eq!(common::flash_message(&resp).as_deref(), Some("Welcome!"));

    let session_cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "docket_session")
        .expect("session cookie")
        .into_owned();
    assert!(session_cookie.value().starts_with("ses_"));

    // The session grants access to a protected page.
    let req = test::TestRequest::get()
        .uri("/new")
        .cookie(session_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn sign_in_rejects_bad_credentials() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/users/signin")
        .set_form([("username", common::ADMIN_USERNAME), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Invalid credentials"));
    assert!(html.contains(common::ADMIN_USERNAME));
}

#[actix_web::test]
async fn signed_in_user_is_redirected_from_sign_in() {
    let harness = common::TestHarness::new();
    let session = harness.admin_auth();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get()
        .uri("/users/signin")
        .cookie(session.cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        common::flash_message(&resp).as_deref(),
        Some("You're already signed in")
    );
}

#[actix_web::test]
async fn sign_out_invalidates_session() {
    let harness = common::TestHarness::new();
    let session = harness.admin_auth();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/users/signout")
        .cookie(session.cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        common::flash_message(&resp).as_deref(),
        Some("You have been signed out.")
    );

    // The old token no longer works even if the browser kept the cookie.
    let req = test::TestRequest::get()
        .uri("/new")
        .cookie(session.cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        common::flash_message(&resp).as_deref(),
        Some("You must be signed in to do that.")
    );
}

#[actix_web::test]
async fn sign_up_creates_account() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/users/signup")
        .set_form([("username", "writer"), ("password", "secret")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        common::location_header(&resp).as_deref(),
        Some("/users/signin")
    );
    assert_eq!(
        common::flash_message(&resp).as_deref(),
        Some("User writer successfully created")
    );

    let req = test::TestRequest::post()
        .uri("/users/signin")
        .set_form([("username", "writer"), ("password", "secret")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::flash_message(&resp).as_deref(), Some("Welcome!"));
}

#[actix_web::test]
async fn sign_up_rejects_empty_username() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/users/signup")
        .set_form([("username", "  "), ("password", "secret")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Invalid username."));
}

#[actix_web::test]
async fn sign_up_rejects_taken_or_invalid_usernames() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    for username in [common::ADMIN_USERNAME, "bad name", "a/b"] {
        let req = test::TestRequest::post()
            .uri("/users/signup")
            .set_form([("username", username), ("password", "secret")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "expected 422 for {:?}",
            username
        );
        let body = test::read_body(resp).await;
        assert!(
            String::from_utf8_lossy(&body)
                .contains("Username already exists or contains invalid characters.")
        );
    }
}
