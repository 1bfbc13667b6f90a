//! HTTP-level tests for the driver's start / end / cancel actions.

mod common;

use axum::http::StatusCode;
use common::{body_json, credits, post_auth, publish_ride, signup};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_twice_reports_no_change(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, driver) = signup(&app, "driver").await;
    let ride_id = publish_ride(&app, &driver, "AA-100-AA", 5, 2).await;
    let uri = format!("/api/v1/rides/{ride_id}/start");

    let first = body_json(post_auth(app.clone(), &uri, &driver).await).await;
    let second = body_json(post_auth(app.clone(), &uri, &driver).await).await;

    assert_eq!(first["changed"], true);
    assert_eq!(first["data"]["status"], "started");
    assert_eq!(second["changed"], false);
    assert_eq!(second["data"]["status"], "started");
    assert_eq!(second["warnings"].as_array().map(Vec::len), Some(0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_driver_can_act(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, driver) = signup(&app, "driver").await;
    let (_, stranger) = signup(&app, "stranger").await;
    let ride_id = publish_ride(&app, &driver, "AA-100-AA", 5, 2).await;

    for action in ["start", "end", "cancel"] {
        let response = post_auth(
            app.clone(),
            &format!("/api/v1/rides/{ride_id}/{action}"),
            &stranger,
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "action {action}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_ride_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, driver) = signup(&app, "driver").await;

    let response = post_auth(app, "/api/v1/rides/999999/start", &driver).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_refunds_passengers_and_blocks_end(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, driver) = signup(&app, "driver").await;
    let (_, passenger) = signup(&app, "passenger").await;
    let ride_id = publish_ride(&app, &driver, "AA-100-AA", 6, 2).await;
    post_auth(app.clone(), &format!("/api/v1/rides/{ride_id}/bookings"), &passenger).await;
    assert_eq!(credits(&app, &passenger).await, 14);

    let response = post_auth(app.clone(), &format!("/api/v1/rides/{ride_id}/cancel"), &driver).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["changed"], true);
    assert_eq!(json["data"]["status"], "cancelled");
    assert_eq!(json["data"]["seats_left"], 2);
    assert_eq!(credits(&app, &passenger).await, 20);

    let response = post_auth(app.clone(), &format!("/api/v1/rides/{ride_id}/end"), &driver).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["changed"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelling_a_finished_ride_is_an_invalid_transition(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, driver) = signup(&app, "driver").await;
    let ride_id = publish_ride(&app, &driver, "AA-100-AA", 6, 2).await;

    let response = post_auth(app.clone(), &format!("/api/v1/rides/{ride_id}/end"), &driver).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "finished");

    let response = post_auth(app, &format!("/api/v1/rides/{ride_id}/cancel"), &driver).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn started_rides_cannot_be_booked(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, driver) = signup(&app, "driver").await;
    let (_, passenger) = signup(&app, "passenger").await;
    let ride_id = publish_ride(&app, &driver, "AA-100-AA", 6, 2).await;
    post_auth(app.clone(), &format!("/api/v1/rides/{ride_id}/start"), &driver).await;

    let response = post_auth(app.clone(), &format!("/api/v1/rides/{ride_id}/bookings"), &passenger).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(credits(&app, &passenger).await, 20);
}
