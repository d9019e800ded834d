//! HTTP-level integration tests for the `/favorites` resource.

mod common;

use axum::http::StatusCode;
use common::{create_recipe, delete_auth, expect_json, get, get_auth, post_auth, register};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favoriting_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "fan@test.com").await;
    let id = create_recipe(&app, &token, json!({ "title": "Tarte" })).await;
    let uri = format!("/api/favorites/{id}");

    for _ in 0..2 {
        let json = expect_json(post_auth(app.clone(), &uri, &token).await, StatusCode::OK).await;
        assert_eq!(json, json!({ "success": true, "favorited": true }));
    }

    let json = expect_json(get_auth(app, "/api/favorites", &token).await, StatusCode::OK).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["favorites"].as_array().unwrap().len(), 1);
    assert_eq!(json["favorites"][0]["id"], id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removing_a_non_favorite_succeeds(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "fan@test.com").await;
    let id = create_recipe(&app, &token, json!({ "title": "Tarte" })).await;
    let uri = format!("/api/favorites/{id}");

    let json = expect_json(delete_auth(app.clone(), &uri, &token).await, StatusCode::OK).await;
    assert_eq!(json, json!({ "success": true, "favorited": false }));

    post_auth(app.clone(), &uri, &token).await;
    let json = expect_json(delete_auth(app.clone(), &uri, &token).await, StatusCode::OK).await;
    assert_eq!(json["favorited"], false);

    let json = expect_json(get_auth(app, "/api/favorites", &token).await, StatusCode::OK).await;
    assert_eq!(json["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favoriting_unknown_recipe_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "fan@test.com").await;

    let response = post_auth(app, "/api/favorites/999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_newest_favorite_first_and_paginated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "fan@test.com").await;

    let mut ids = Vec::new();
    for title in ["Un", "Deux", "Trois"] {
        let id = create_recipe(&app, &token, json!({ "title": title })).await;
        post_auth(app.clone(), &format!("/api/favorites/{id}"), &token).await;
        ids.push(id);
    }

    let json = expect_json(
        get_auth(app.clone(), "/api/favorites?page=1&limit=2", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["favorites"][0]["id"], ids[2]);
    assert_eq!(json["favorites"][1]["id"], ids[1]);
    assert_eq!(json["favorites"][0]["image_url"], common::DEFAULT_IMAGE_URL);

    let json = expect_json(
        get_auth(app.clone(), "/api/favorites?limit=500", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["limit"], 50);

    assert_eq!(get(app, "/api/favorites").await.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favorites_are_per_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (alice, _) = register(&app, "alice@test.com").await;
    let (bob, _) = register(&app, "bob@test.com").await;
    let id = create_recipe(&app, &alice, json!({ "title": "Tarte" })).await;

    post_auth(app.clone(), &format!("/api/favorites/{id}"), &alice).await;

    let json = expect_json(get_auth(app, "/api/favorites", &bob).await, StatusCode::OK).await;
    assert_eq!(json["total"], 0);
}
