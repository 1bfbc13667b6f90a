//! HTTP-level tests for signup, login, bearer authentication and the admin
//! suspension endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user_with_role, get, get_auth, login, post_auth, post_json, signup,
    ADMIN_ROLE_ID, PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_grants_starting_credits(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "username": "alice", "email": "Alice@Test.com", "password": PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["email"], "alice@test.com");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["user"]["credits"], 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_duplicate_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(&app, "alice").await;

    let response = post_json(
        app,
        "/api/v1/auth/signup",
        json!({ "username": "alice", "email": "other@test.com", "password": PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_validates_input(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [
        json!({ "username": "al", "email": "al@test.com", "password": PASSWORD }),
        json!({ "username": "alice", "email": "not-an-email", "password": PASSWORD }),
        json!({ "username": "alice", "email": "alice@test.com", "password": "short" }),
    ] {
        let response = post_json(app.clone(), "/api/v1/auth/signup", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    signup(&app, "alice").await;

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": "incorrect_password" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_require_a_bearer_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/me", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn suspended_user_cannot_log_in(pool: PgPool) {
    let admin = create_user_with_role(&pool, "admin", ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);
    let admin_token = login(&app, &admin.username).await;
    let (alice_id, _) = signup(&app, "alice").await;

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{alice_id}/suspend"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_suspended"], true);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{alice_id}/unsuspend"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    login(&app, "alice").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admins_can_suspend(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, alice_token) = signup(&app, "alice").await;
    let (bob_id, _) = signup(&app, "bob").await;

    let response = post_auth(
        app,
        &format!("/api/v1/admin/users/{bob_id}/suspend"),
        &alice_token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admins_cannot_suspend_themselves(pool: PgPool) {
    let admin = create_user_with_role(&pool, "admin", ADMIN_ROLE_ID).await;
    let app = common::build_test_app(pool);
    let token = login(&app, &admin.username).await;

    let response = post_auth(
        app,
        &format!("/api/v1/admin/users/{}/suspend", admin.id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
