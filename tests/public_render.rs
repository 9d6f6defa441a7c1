// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

mod common;

use actix_web::{http::StatusCode, test};

#[actix_web::test]
async fn index_lists_documents() {
    let harness = common::TestHarness::new();
    harness.seed_document("about.md", "# About");
    harness.seed_document("notes.txt", "plain");
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("about.md"));
    assert!(html.contains("notes.txt"));
}

#[actix_web::test]
async fn markdown_document_renders_as_html() {
    let harness = common::TestHarness::new();
    harness.seed_document("about.md", "# About\n\nSome **bold** text.");
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/about.md").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("Content-Type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("<h1>About</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
}

#[actix_web::test]
async fn plain_text_document_is_served_verbatim() {
    let harness = common::TestHarness::new();
    harness.seed_document("notes.txt", "# not markdown\nline two");
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/notes.txt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("Content-Type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    let body = test::read_body(resp).await;
    assert_eq!(body, "# not markdown\nline two".as_bytes());
}

#[actix_web::test]
async fn missing_document_redirects_with_notice() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/ghost.md").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location_header(&resp).as_deref(), Some("/"));
    assert_eq!(
        common::flash_message(&resp).as_deref(),
        Some("File doesn't exist.")
    );
}

#[actix_web::test]
async fn unsupported_extension_is_not_served() {
    let harness = common::TestHarness::new();
    harness.seed_document("photo.png", "binary-ish");
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/photo.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        common::flash_message(&resp).as_deref(),
        Some("File doesn't exist.")
    );
}

#[actix_web::test]
async fn encoded_traversal_cannot_escape_documents_dir() {
    let harness = common::TestHarness::new();
    harness.seed_document("notes.txt", "inside");
    let app = test::init_service(common::build_test_app(&harness)).await;

    // Decodes to ../../notes.txt; the basename rule pins it to the store.
    let req = test::TestRequest::get()
        .uri("/..%2F..%2Fnotes.txt")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "inside".as_bytes());

    let req = test::TestRequest::get()
        .uri("/..%2F..%2Fetc%2Fpasswd")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        common::flash_message(&resp).as_deref(),
        Some("File doesn't exist.")
    );
}

#[actix_web::test]
async fn flash_notice_shows_once() {
    let harness = common::TestHarness::new();
    let session = harness.admin_auth();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/")
        .cookie(session.cookie.clone())
        .set_form([("filename", "notes.txt")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let flash_cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "docket_flash")
        .expect("flash cookie")
        .into_owned();

    // First render shows the notice and clears the cookie.
    let req = test::TestRequest::get()
        .uri("/")
        .cookie(flash_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removal = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "docket_flash")
        .expect("removal cookie")
        .into_owned();
    assert_eq!(removal.value(), "");
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("notes.txt has been created"));

    // Without the cookie the notice is gone.
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    let body = test::read_body(resp).await;
    assert!(!String::from_utf8_lossy(&body).contains("notes.txt has been created"));
}
