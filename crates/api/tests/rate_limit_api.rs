//! Per-route-group rate limiting.
//!
//! Requests built in-process carry no peer address, so they all share one
//! client bucket.

mod common;

use axum::http::{header, StatusCode};
use common::{build_test_app_with, expect_json, get, post_json, test_config};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_auth_routes_are_limited(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.rate_limits.auth_per_min = 2;
    let app = build_test_app_with(pool, config);

    let body = json!({ "email": "nobody@test.com", "password": "whatever" });
    for _ in 0..2 {
        let response = post_json(app.clone(), "/api/auth/login", body.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = post_json(app.clone(), "/api/auth/login", body).await;
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    let json = expect_json(response, StatusCode::TOO_MANY_REQUESTS).await;
    assert_eq!(json["code"], "RATE_LIMITED");

    // Other groups are unaffected.
    assert_eq!(get(app, "/api/recipes").await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_routes_are_limited(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.rate_limits.upload_per_min = 1;
    let app = build_test_app_with(pool, config);

    let response =
        common::post_multipart(app.clone(), "/api/videos/upload", "video", "video/mp4", b"a").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        common::post_multipart(app, "/api/images/upload", "file", "image/avif", b"b").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
