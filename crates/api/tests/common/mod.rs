//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use ecoride_api::auth::jwt::JwtConfig;
use ecoride_api::auth::password::hash_password;
use ecoride_api::config::{ReviewConfig, ServerConfig};
use ecoride_api::router::build_app_router;
use ecoride_api::state::AppState;
use ecoride_db::models::user::{CreateUser, User};
use ecoride_db::repositories::UserRepo;
use ecoride_events::{EventBus, LogNotifier};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const REVIEW_SECRET: &str = "api-test-review-secret";
pub const PASSWORD: &str = "test_password_123!";

pub const ADMIN_ROLE_ID: i16 = 1;
pub const EMPLOYEE_ROLE_ID: i16 = 2;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "api-test-jwt-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        review: ReviewConfig {
            token_secret: REVIEW_SECRET.to_string(),
            token_ttl_hours: 24,
            base_url: "http://localhost:5173/reviews/new".to_string(),
        },
    }
}

/// Build the production router over `pool`, logging notifications instead
/// of sending them.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(
        pool,
        config.clone(),
        Arc::new(EventBus::default()),
        Arc::new(LogNotifier),
    );
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).expect("request should build"))
        .await
        .expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up through the API. Returns the user id and an access token.
pub async fn signup(app: &Router, username: &str) -> (i64, String) {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/signup",
        json!({
            "username": username,
            "email": format!("{username}@test.com"),
            "password": PASSWORD,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["user"]["id"].as_i64().expect("user id");
    let token = json["access_token"].as_str().expect("token").to_string();
    (id, token)
}

/// Insert a user with `role_id` directly, bypassing signup.
pub async fn create_user_with_role(pool: &PgPool, username: &str, role_id: i16) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
            role_id,
        },
    )
    .await
    .expect("user creation should succeed")
}

pub async fn login(app: &Router, username: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "username": username, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .expect("token")
        .to_string()
}

/// Register a vehicle and publish a ride departing tomorrow. Returns the
/// ride id.
pub async fn publish_ride(app: &Router, token: &str, plate: &str, price: i32, seats: i32) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/vehicles",
        token,
        json!({
            "brand": "Peugeot",
            "model": "e-208",
            "energy": "electric",
            "seats": 4,
            "plate": plate,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let vehicle_id = body_json(response).await["data"]["id"]
        .as_i64()
        .expect("vehicle id");

    let date_start = Utc::now() + Duration::days(1);
    let response = post_json_auth(
        app.clone(),
        "/api/v1/rides",
        token,
        json!({
            "vehicle_id": vehicle_id,
            "from_city": "Lyon",
            "to_city": "Grenoble",
            "date_start": date_start,
            "date_end": date_start + Duration::hours(2),
            "price": price,
            "seats": seats,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("ride id")
}

pub async fn credits(app: &Router, token: &str) -> i64 {
    let response = get_auth(app.clone(), "/api/v1/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["credits"]
        .as_i64()
        .expect("credits")
}
