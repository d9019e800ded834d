//! HTTP-level integration tests for the `/recipes` resource.

mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use common::{
    body_json, create_recipe, delete_auth, expect_json, get, login, post_json, post_json_auth,
    put_json_auth, register, DEFAULT_IMAGE_URL,
};
use recettes_db::repositories::UserRepo;
use serde_json::{json, Value};
use sqlx::PgPool;

fn ids(json: &Value, key: &str) -> Vec<i64> {
    json[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_applies_defaults_and_detail_echoes_them(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = register(&app, "chef@test.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/recipes",
        json!({ "title": "Soupe", "servings": 4 }),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    let recipe = &json["recipe"];
    assert_eq!(recipe["title"], "Soupe");
    assert_eq!(recipe["servings"], 4);
    assert_eq!(recipe["prep_time_minutes"], 0);
    assert_eq!(recipe["image_url"], DEFAULT_IMAGE_URL);
    assert_eq!(recipe["user_id"], user_id);
    assert_eq!(recipe["views"], 0);

    let id = recipe["id"].as_i64().unwrap();
    let response = get(app, &format!("/api/recipes/{id}")).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["recipe"]["servings"], 4);
    assert_eq!(json["recipe"]["prep_time_minutes"], 0);
    assert_eq!(json["recipe"]["image_url"], DEFAULT_IMAGE_URL);
    assert_eq!(json["recipe"]["user_name"], "Chef");
    assert_eq!(json["ingredients"], json!([]));
    assert_eq!(json["comments"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_coerces_lenient_numbers(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;

    let response = post_json_auth(
        app,
        "/api/recipes",
        json!({
            "title": "Quiche",
            "prep_time_minutes": "-5",
            "servings": "abc",
            "image_url": "   ",
            "video_url": "",
            "ingredients": [
                { "name": "oeufs", "quantity": 3, "unit": null },
                { "name": "   " }
            ]
        }),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["recipe"]["prep_time_minutes"], 0);
    assert_eq!(json["recipe"]["servings"], 1);
    assert_eq!(json["recipe"]["image_url"], DEFAULT_IMAGE_URL);
    assert_eq!(json["recipe"]["video_url"], Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_requires_auth_and_title(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;

    let response = post_json(app.clone(), "/api/recipes", json!({ "title": "Soupe" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        post_json_auth(app, "/api/recipes", json!({ "title": "   " }), &token).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["error"], "Title is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_lists_ingredients_in_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;
    let id = create_recipe(
        &app,
        &token,
        json!({
            "title": "Ratatouille",
            "ingredients": [
                { "name": "tomate", "quantity": "4", "unit": "pièce" },
                { "name": "courgette", "quantity": "2" },
                { "name": "aubergine" }
            ]
        }),
    )
    .await;

    let json = expect_json(get(app, &format!("/api/recipes/{id}")).await, StatusCode::OK).await;
    let names: Vec<&str> = json["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["tomate", "courgette", "aubergine"]);
    assert_eq!(json["ingredients"][0]["quantity"], "4");
    assert_eq!(json["ingredients"][0]["unit"], "pièce");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_or_malformed_id(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(get(app.clone(), "/api/recipes/999").await, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");

    let json = expect_json(get(app, "/api/recipes/abc").await, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingredient_filter_matches_any_term_without_duplicates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;

    let both = create_recipe(
        &app,
        &token,
        json!({ "title": "Sauce", "ingredients": [{ "name": "Tomate cerise" }, { "name": "Oignon rouge" }] }),
    )
    .await;
    let tomato = create_recipe(
        &app,
        &token,
        json!({ "title": "Salade", "ingredients": [{ "name": "tomate" }] }),
    )
    .await;
    create_recipe(
        &app,
        &token,
        json!({ "title": "Gratin", "ingredients": [{ "name": "pomme de terre" }] }),
    )
    .await;

    let json = expect_json(
        get(app, "/api/recipes?ingredients=TOMATE,%20oignon,").await,
        StatusCode::OK,
    )
    .await;

    let found = ids(&json, "recipes");
    assert_eq!(found.len(), 2);
    assert_eq!(found.iter().collect::<HashSet<_>>(), HashSet::from([&both, &tomato]));
    assert_eq!(json["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pages_partition_the_total(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;
    for i in 0..7 {
        create_recipe(&app, &token, json!({ "title": format!("Recette {i}") })).await;
    }

    let mut seen = HashSet::new();
    for page in 1..=3 {
        let json = expect_json(
            get(app.clone(), &format!("/api/recipes?page={page}&limit=3")).await,
            StatusCode::OK,
        )
        .await;
        assert_eq!(json["total"], 7);
        assert_eq!(json["page"], page);
        assert_eq!(json["limit"], 3);
        seen.extend(ids(&json, "recipes"));
    }
    assert_eq!(seen.len(), 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_paging_values_are_coerced(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(
        get(app.clone(), "/api/recipes?page=abc&limit=xyz&max_time=soon").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 12);

    let json = expect_json(get(app, "/api/recipes?page=0&limit=1000").await, StatusCode::OK).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_max_time_filters_to_zero_prep_time(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;

    let instant = create_recipe(&app, &token, json!({ "title": "Tartine" })).await;
    create_recipe(
        &app,
        &token,
        json!({ "title": "Gratin", "prep_time_minutes": 45 }),
    )
    .await;

    for uri in ["/api/recipes?max_time=abc", "/api/recipes?max_time=0"] {
        let json = expect_json(get(app.clone(), uri).await, StatusCode::OK).await;
        assert_eq!(ids(&json, "recipes"), vec![instant]);
        assert_eq!(json["total"], 1);
    }

    let json = expect_json(get(app, "/api/recipes?max_time=").await, StatusCode::OK).await;
    assert_eq!(json["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scalar_filters_and_video_listing(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;

    let quick = create_recipe(
        &app,
        &token,
        json!({ "title": "Omelette rapide", "cuisine_type": "Française", "prep_time_minutes": 10 }),
    )
    .await;
    create_recipe(
        &app,
        &token,
        json!({ "title": "Boeuf bourguignon", "cuisine_type": "Française", "prep_time_minutes": 180 }),
    )
    .await;
    let video = create_recipe(
        &app,
        &token,
        json!({ "title": "Pizza", "cuisine_type": "Italienne", "video_url": "/uploads/pizza.mp4" }),
    )
    .await;

    let json = expect_json(
        get(app.clone(), "/api/recipes?cuisine=Fran%C3%A7aise&max_time=30").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(ids(&json, "recipes"), vec![quick]);

    let json = expect_json(get(app.clone(), "/api/recipes?q=OMELETTE").await, StatusCode::OK).await;
    assert_eq!(ids(&json, "recipes"), vec![quick]);

    let json = expect_json(
        get(app.clone(), "/api/recipes?has_video=1").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(ids(&json, "recipes"), vec![video]);

    let json = expect_json(get(app, "/api/recipes/videos?limit=5").await, StatusCode::OK).await;
    assert_eq!(ids(&json, "recipes"), vec![video]);
    assert_eq!(json["limit"], 5);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_keeps_or_replaces_ingredients(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;
    let id = create_recipe(
        &app,
        &token,
        json!({ "title": "Soupe", "ingredients": [{ "name": "poireau" }] }),
    )
    .await;
    let uri = format!("/api/recipes/{id}");

    // Without `ingredients`: scalars overwritten, lines kept.
    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "Soupe verte", "servings": 6 }),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["recipe"]["title"], "Soupe verte");
    assert_eq!(json["recipe"]["servings"], 6);
    let detail = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(detail["ingredients"].as_array().unwrap().len(), 1);

    // With an empty list: lines cleared.
    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "Soupe verte", "ingredients": [] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(detail["ingredients"], json!([]));

    // A blank title is still rejected.
    let response = put_json_auth(app, &uri, json!({ "title": "" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_owner_is_forbidden_until_promoted_to_admin(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (owner_token, _) = register(&app, "owner@test.com").await;
    let (other_token, other_id) = register(&app, "other@test.com").await;
    let id = create_recipe(&app, &owner_token, json!({ "title": "Tarte" })).await;
    let uri = format!("/api/recipes/{id}");

    let response =
        put_json_auth(app.clone(), &uri, json!({ "title": "Volée" }), &other_token).await;
    let json = expect_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["error"], "Not allowed");

    let response = delete_auth(app.clone(), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The role is carried in the token, so log in again after promotion.
    UserRepo::set_role(&pool, other_id, "admin").await.unwrap();
    let admin_token = login(&app, "other@test.com").await;

    let response =
        put_json_auth(app.clone(), &uri, json!({ "title": "Modérée" }), &admin_token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["recipe"]["title"], "Modérée");

    let response = delete_auth(app.clone(), &uri, &admin_token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["success"], true);

    assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_unknown_recipe_return_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;

    let response =
        put_json_auth(app.clone(), "/api/recipes/4242", json!({ "title": "X" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, "/api/recipes/4242", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Views and ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_view_counter_increments(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register(&app, "chef@test.com").await;
    let id = create_recipe(&app, &token, json!({ "title": "Soupe" })).await;
    let uri = format!("/api/recipes/{id}/view");

    post_json(app.clone(), &uri, json!({})).await;
    let json = expect_json(post_json(app.clone(), &uri, json!({})).await, StatusCode::OK).await;
    assert_eq!(json, json!({ "ok": true, "views": 2 }));

    let json = expect_json(
        post_json(app, "/api/recipes/999/view", json!({})).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["views"], Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rating_is_clamped_and_upserted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = register(&app, "owner@test.com").await;
    let (fan, _) = register(&app, "fan@test.com").await;
    let id = create_recipe(&app, &owner, json!({ "title": "Crêpes" })).await;
    let uri = format!("/api/recipes/{id}/rate");

    let json = expect_json(
        post_json_auth(app.clone(), &uri, json!({ "rating": 9 }), &fan).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["my_rating"], 5);
    assert_eq!(json["ratings_count"], 1);

    let json = expect_json(
        post_json_auth(app.clone(), &uri, json!({ "rating": "3" }), &fan).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["my_rating"], 3);
    assert_eq!(json["ratings_count"], 1);

    let json = expect_json(
        post_json_auth(app.clone(), &uri, json!({ "rating": 4 }), &owner).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["avg_rating"], 3.5);
    assert_eq!(json["ratings_count"], 2);

    let response = post_json_auth(app.clone(), &uri, json!({}), &fan).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        post_json_auth(app, "/api/recipes/999/rate", json!({ "rating": 4 }), &fan).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
