mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use trimly::domain::click_event::ClickContext;

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_generates_code() {
    let app = common::spawn_app();

    let body = common::create_link(&app.server, json!({ "url": "https://example.com" })).await;

    let code = body["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["code"], code);
    assert_eq!(body["alias"], Value::Null);
    assert_eq!(body["clicks"], 0);
}

#[tokio::test]
async fn test_create_link_adds_https_scheme() {
    let app = common::spawn_app();

    let body = common::create_link(&app.server, json!({ "url": "example.com" })).await;

    assert_eq!(body["long_url"], "https://example.com");
    assert_eq!(body["title"], "https://example.com");
}

#[tokio::test]
async fn test_create_link_accepts_long_url_field() {
    let app = common::spawn_app();

    let body = common::create_link(
        &app.server,
        json!({ "long_url": "http://example.com/a", "title": "A page" }),
    )
    .await;

    assert_eq!(body["long_url"], "http://example.com/a");
    assert_eq!(body["title"], "A page");
}

#[tokio::test]
async fn test_create_link_with_alias() {
    let app = common::spawn_app();

    let body = common::create_link(
        &app.server,
        json!({ "url": "https://example.com", "custom_alias": "my-link_1" }),
    )
    .await;

    assert_eq!(body["short_code"], "my-link_1");
    assert_eq!(body["alias"], "my-link_1");
    assert_eq!(body["code"], Value::Null);
}

#[tokio::test]
async fn test_create_link_blank_alias_generates_code() {
    let app = common::spawn_app();

    let body = common::create_link(
        &app.server,
        json!({ "url": "https://example.com", "custom_alias": "   " }),
    )
    .await;

    assert_eq!(body["alias"], Value::Null);
    assert_eq!(body["short_code"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_link_alias_taken_any_case() {
    let app = common::spawn_app();
    common::create_link(
        &app.server,
        json!({ "url": "https://example.com", "custom_alias": "promo" }),
    )
    .await;

    let response = app
        .server
        .post("/api/links")
        .json(&json!({ "url": "https://example.org", "custom_alias": "PROMO" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "alias_taken");
}

#[tokio::test]
async fn test_create_link_alias_colliding_with_code() {
    let app = common::spawn_app();
    let first = common::create_link(&app.server, json!({ "url": "https://example.com" })).await;
    let code = first["short_code"].as_str().unwrap().to_lowercase();

    let response = app
        .server
        .post("/api/links")
        .json(&json!({ "url": "https://example.org", "custom_alias": code }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_link_invalid_alias() {
    let app = common::spawn_app();

    for alias in ["a", "has space", "toolongaliasxxxxxxxxx", "bad!char"] {
        let response = app
            .server
            .post("/api/links")
            .json(&json!({ "url": "https://example.com", "custom_alias": alias }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"]["field"], "custom_alias");
    }
}

#[tokio::test]
async fn test_create_link_rejects_unsupported_scheme() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/links")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["details"]["field"], "long_url");
}

#[tokio::test]
async fn test_create_link_rejects_empty_url() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/links")
        .json(&json!({ "url": "  " }))
        .await;

    response.assert_status_bad_request();
}

// ─── READ ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_link() {
    let app = common::spawn_app();
    let created = common::create_link(
        &app.server,
        json!({ "url": "https://example.com", "custom_alias": "getme" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = app.server.get(&format!("/api/links/{}", id)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["short_code"], "getme");
}

#[tokio::test]
async fn test_get_link_not_found() {
    let app = common::spawn_app();

    let response = app.server.get("/api/links/999").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_list_links_paginated() {
    let app = common::spawn_app();
    for i in 0..5 {
        common::create_link(
            &app.server,
            json!({ "url": format!("https://example.com/{}", i) }),
        )
        .await;
    }

    let response = app.server.get("/api/links?page=2&page_size=2").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 2);
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_links_filters_by_owner() {
    let app = common::spawn_app();
    let owner = "6f1c2b4e-8d3a-4c55-9e1f-2a7b3c4d5e6f";
    common::create_link(
        &app.server,
        json!({ "url": "https://example.com/mine", "user_id": owner }),
    )
    .await;
    common::create_link(&app.server, json!({ "url": "https://example.com/other" })).await;

    let response = app
        .server
        .get(&format!("/api/links?user_id={}", owner))
        .await;

    let body = response.json::<Value>();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["long_url"], "https://example.com/mine");
}

#[tokio::test]
async fn test_list_links_rejects_page_zero() {
    let app = common::spawn_app();

    let response = app.server.get("/api/links?page=0").await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["details"]["field"], "page");
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link_success() {
    let app = common::spawn_app();
    let created = common::create_link(&app.server, json!({ "url": "https://example.com" })).await;
    let id = created["id"].as_i64().unwrap();

    app.server
        .delete(&format!("/api/links/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/links/{}", id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_not_found() {
    let app = common::spawn_app();

    app.server
        .delete("/api/links/12345")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_invalid_id() {
    let app = common::spawn_app();

    app.server
        .delete("/api/links/0")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_deleted_alias_can_be_reused() {
    let app = common::spawn_app();
    let created = common::create_link(
        &app.server,
        json!({ "url": "https://example.com", "custom_alias": "reuse" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    app.server
        .delete(&format!("/api/links/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let again = common::create_link(
        &app.server,
        json!({ "url": "https://example.org", "custom_alias": "reuse" }),
    )
    .await;
    assert_ne!(again["id"], created["id"]);
}

// ─── CLICKS ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_link_clicks_lists_recorded_clicks() {
    let app = common::spawn_app();
    let created = common::create_link(
        &app.server,
        json!({ "url": "https://example.com", "custom_alias": "counted" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let click_service = Arc::clone(&app.state.click_service);
    click_service
        .record_click(
            id,
            ClickContext::new(
                Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0 Safari/537.36"),
                None,
                Some("203.0.113.7".to_string()),
                Some("fr"),
            ),
        )
        .await;

    let response = app.server.get(&format!("/api/links/{}/clicks", id)).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["link_id"], id);
    assert_eq!(body["total_clicks"], 1);
    assert_eq!(body["recorded_clicks"], 1);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["country"], "FR");
    assert_eq!(items[0]["device"], "desktop");
    assert_eq!(items[0]["browser"], "Chrome");
}

#[tokio::test]
async fn test_link_clicks_unknown_link() {
    let app = common::spawn_app();

    app.server
        .get("/api/links/77/clicks")
        .await
        .assert_status_not_found();
}
