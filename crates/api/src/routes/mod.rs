pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::middleware::rate_limit::{limit_auth, limit_uploads};
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public, rate limited)
/// /auth/login                      login (public, rate limited)
/// /auth/change-password            change password (auth, rate limited)
///
/// /recipes                         list (public), create (auth)
/// /recipes/videos                  latest recipes with a video (public)
/// /recipes/{id}                    detail (public), update, delete (owner or admin)
/// /recipes/{id}/view               increment views (public)
/// /recipes/{id}/rate               rate 1-5 (auth)
///
/// /favorites                       list own favorites (auth)
/// /favorites/{recipe_id}           add, remove (auth)
///
/// /comments/{recipe_id}            create (auth)       POST
/// /comments/{id}                   delete (author or admin) DELETE
///
/// /images/upload                   image upload (public, rate limited)
/// /videos/upload                   video upload (public, rate limited)
///
/// /newsletter/subscribe            subscribe (public)
/// /newsletter/unsubscribe          unsubscribe (public)
/// /contact                         contact form (public)
///
/// /users/me                        get, update, delete own account (auth)
/// ```
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let media = &state.config.media;

    let auth = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/change-password", post(handlers::auth::change_password))
        .layer(from_fn_with_state(state.clone(), limit_auth));

    let recipes = Router::new()
        .route(
            "/",
            get(handlers::recipes::list_recipes).post(handlers::recipes::create_recipe),
        )
        .route("/videos", get(handlers::recipes::list_video_recipes))
        .route(
            "/{id}",
            get(handlers::recipes::get_recipe)
                .put(handlers::recipes::update_recipe)
                .delete(handlers::recipes::delete_recipe),
        )
        .route("/{id}/view", post(handlers::recipes::record_view))
        .route("/{id}/rate", post(handlers::recipes::rate_recipe));

    let favorites = Router::new()
        .route("/", get(handlers::favorites::list_favorites))
        .route(
            "/{recipe_id}",
            post(handlers::favorites::add_favorite).delete(handlers::favorites::remove_favorite),
        );

    // POST takes a recipe id, DELETE a comment id.
    let comments = Router::new().route(
        "/{id}",
        post(handlers::comments::create_comment).delete(handlers::comments::delete_comment),
    );

    let images = Router::new()
        .route("/upload", post(handlers::media::upload_image))
        .layer(DefaultBodyLimit::max(
            media.max_image_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(from_fn_with_state(state.clone(), limit_uploads));

    let videos = Router::new()
        .route("/upload", post(handlers::media::upload_video))
        .layer(DefaultBodyLimit::max(
            media.max_video_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(from_fn_with_state(state.clone(), limit_uploads));

    let newsletter = Router::new()
        .route("/subscribe", post(handlers::newsletter::subscribe))
        .route("/unsubscribe", post(handlers::newsletter::unsubscribe));

    let users = Router::new().route(
        "/me",
        get(handlers::users::get_me)
            .put(handlers::users::update_me)
            .delete(handlers::users::delete_me),
    );

    Router::new()
        .nest("/auth", auth)
        .nest("/recipes", recipes)
        .nest("/favorites", favorites)
        .nest("/comments", comments)
        .nest("/images", images)
        .nest("/videos", videos)
        .nest("/newsletter", newsletter)
        .route("/contact", post(handlers::contact::submit_contact))
        .nest("/users", users)
}
