#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use recettes_api::auth::jwt::JwtConfig;
pub use recettes_api::config::DEFAULT_IMAGE_URL;
use recettes_api::config::{MediaConfig, RateLimitConfig, ServerConfig};
use recettes_api::router::build_app_router;
use recettes_api::state::AppState;
use recettes_core::media::MIB;
use recettes_db::SchemaCapabilities;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_ORIGIN: &str = "http://localhost:5174";
pub const PUBLIC_BASE_URL: &str = "http://localhost:4000";
pub const PASSWORD: &str = "secret123";

/// Build a test `ServerConfig` with safe defaults.
///
/// Rate limits are disabled (`0`) and uploads go to `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        default_image_url: DEFAULT_IMAGE_URL.to_string(),
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiry_hours: 1,
        },
        media: MediaConfig {
            upload_dir: upload_dir.to_path_buf(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
            max_image_bytes: 4 * MIB,
            max_video_bytes: 20 * MIB,
            image_variants: true,
        },
        rate_limits: RateLimitConfig {
            auth_per_min: 0,
            upload_per_min: 0,
        },
    }
}

/// Upload directory for tests that never upload anything.
fn unused_upload_dir() -> PathBuf {
    std::env::temp_dir().join("recettes-api-tests-unused")
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(&unused_upload_dir()))
}

/// Same as [`build_test_app`] with a custom configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone(), SchemaCapabilities::FULL);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a single-file `multipart/form-data` body.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    field: &str,
    content_type: &str,
    data: &[u8],
) -> Response<Body> {
    const BOUNDARY: &str = "recettes-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register an account through the API and return `(token, user_id)`.
pub async fn register(app: &Router, email: &str) -> (String, i64) {
    let response = post_json(
        app.clone(),
        "/api/auth/register",
        json!({ "name": "Chef", "email": email, "password": PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    (
        json["token"].as_str().unwrap().to_string(),
        json["user"]["id"].as_i64().unwrap(),
    )
}

/// Log in through the API and return the token.
pub async fn login(app: &Router, email: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/auth/login",
        json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    json["token"].as_str().unwrap().to_string()
}

/// Create a recipe through the API and return its id.
pub async fn create_recipe(app: &Router, token: &str, body: Value) -> i64 {
    let response = post_json_auth(app.clone(), "/api/recipes", body, token).await;
    let json = expect_json(response, StatusCode::OK).await;
    json["recipe"]["id"].as_i64().unwrap()
}
