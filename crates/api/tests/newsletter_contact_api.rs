//! HTTP-level integration tests for the newsletter and contact endpoints.

mod common;

use axum::http::StatusCode;
use common::{expect_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscribe_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    for email in ["news@test.com", "  NEWS@test.com "] {
        let json = expect_json(
            post_json(app.clone(), "/api/newsletter/subscribe", json!({ "email": email })).await,
            StatusCode::OK,
        )
        .await;
        assert_eq!(json, json!({ "ok": true }));
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    for _ in 0..2 {
        let response = post_json(
            app.clone(),
            "/api/newsletter/unsubscribe",
            json!({ "email": "news@test.com" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscribe_rejects_invalid_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/newsletter/subscribe",
        json!({ "email": "nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(app, "/api/newsletter/subscribe", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_message_is_stored_trimmed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let json = expect_json(
        post_json(
            app,
            "/api/contact",
            json!({
                "name": " Léa ",
                "email": "lea@test.com",
                "subject": "  Bonjour ",
                "message": " Merci pour le site ! "
            }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json, json!({ "ok": true }));

    let row: (Option<String>, String, String) =
        sqlx::query_as("SELECT name, subject, message FROM contact_messages")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(
        row,
        (
            Some("Léa".to_string()),
            "Bonjour".to_string(),
            "Merci pour le site !".to_string()
        )
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_requires_email_subject_and_message(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [
        json!({ "subject": "Salut", "message": "Coucou" }),
        json!({ "email": "a@test.com", "subject": " ", "message": "Coucou" }),
        json!({ "email": "a@test.com", "subject": "Salut" }),
        json!({ "email": "invalid", "subject": "Salut", "message": "Coucou" }),
    ] {
        let response = post_json(app.clone(), "/api/contact", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
