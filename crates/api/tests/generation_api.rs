//! Integration tests for the generation, profile, and template routes.
//!
//! All of these paths must resolve before any external collaborator is
//! reached; the test config points the generative API and object store at
//! an unroutable address, so a surprise external call fails loudly instead
//! of passing silently.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, test_config};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use viralthumb_api::auth::jwt::generate_access_token;
use viralthumb_db::models::profile::ProvisionProfile;
use viralthumb_db::repositories::ProfileRepo;

fn mint_token(account_id: Uuid) -> String {
    generate_access_token(account_id, "user", &test_config().jwt).unwrap()
}

async fn seed_profile(pool: &PgPool, credits: i32) -> Uuid {
    let id = Uuid::new_v4();
    ProfileRepo::provision(
        pool,
        &ProvisionProfile {
            id,
            email: format!("{id}@example.com"),
            username: format!("creator_{}", &id.to_string()[..8]),
            full_name: "Creator".to_string(),
            avatar_url: String::new(),
        },
    )
    .await
    .unwrap();
    sqlx::query("UPDATE profiles SET credits = $2 WHERE id = $1")
        .bind(id)
        .bind(credits)
        .execute(pool)
        .await
        .unwrap();
    id
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/generations", None, json!({ "prompt": "x" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/generations",
        Some("not.a.token"),
        json!({ "prompt": "x" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Submission guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_prompt_returns_400_without_provisioning(pool: PgPool) {
    let account_id = Uuid::new_v4();
    let token = mint_token(account_id);
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/generations",
        Some(&token),
        json!({ "prompt": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // The guard fires before any side effect, including provisioning.
    let profile = ProfileRepo::find_by_id(&pool, account_id).await.unwrap();
    assert!(profile.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn too_many_reference_images_returns_400(pool: PgPool) {
    let token = mint_token(Uuid::new_v4());
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/generations",
        Some(&token),
        json!({
            "prompt": "concept",
            "reference_images": vec!["data:image/png;base64,A"; 4],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insufficient_credits_returns_402_before_any_external_call(pool: PgPool) {
    let account_id = seed_profile(&pool, 2).await;
    let token = mint_token(account_id);
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/generations",
        Some(&token),
        json!({ "prompt": "Surprised Face at 3AM" }),
    )
    .await;

    // 402 (and not a 502 connection failure) proves the pre-check rejected
    // the batch before the unroutable collaborators were contacted.
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INSUFFICIENT_CREDITS");
    assert_eq!(body["required"], 3);
    assert_eq!(body["balance"], 2);
    assert_eq!(body["upgrade"], true);
    assert!(body["items"].as_array().unwrap().is_empty());

    // Balance untouched.
    let profile = ProfileRepo::find_by_id(&pool, account_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.credits, 2);
}

// ---------------------------------------------------------------------------
// Profile and catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_is_provisioned_on_first_sight(pool: PgPool) {
    let account_id = Uuid::new_v4();
    let token = mint_token(account_id);
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/profile", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], account_id.to_string());
    assert_eq!(body["data"]["credits"], 50);
    assert_eq!(body["data"]["plan"], "free");
    assert_eq!(body["data"]["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn templates_are_seeded_and_listed(pool: PgPool) {
    let token = mint_token(Uuid::new_v4());
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/templates", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let templates = body["data"].as_array().unwrap();
    assert_eq!(templates.len(), 4);
    assert!(templates
        .iter()
        .any(|t| t["name"] == "MrBeast Style (High Saturation)"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_starts_empty(pool: PgPool) {
    let account_id = seed_profile(&pool, 50).await;
    let token = mint_token(account_id);
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/generations?limit=10", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
