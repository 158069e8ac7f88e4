mod common;

use actix_web::{test, App};
use serde_json::{json, Value};
use vasta::routes;

use common::{mint_token, test_state, unix_now, TEST_SECRET};

fn full_app_state() -> actix_web::web::Data<vasta::AppState> {
    test_state(TEST_SECRET)
}

#[actix_web::test]
async fn plans_are_public() {
    let app = test::init_service(
        App::new()
            .app_data(full_app_state())
            .configure(routes::configure),
    )
    .await;

    // No Authorization header at all
    let req = test::TestRequest::get().uri("/api/v1/plans").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    let plans = body["plans"].as_array().expect("plans array");
    assert_eq!(plans.len(), 3);

    let codes: Vec<&str> = plans.iter().filter_map(|p| p["code"].as_str()).collect();
    assert_eq!(codes, vec!["start", "pro", "business"]);

    // The free tier stays free
    assert_eq!(plans[0]["monthly_price_cents"], 0);
}

#[actix_web::test]
async fn protected_routes_reject_anonymous_requests() {
    let app = test::init_service(
        App::new()
            .app_data(full_app_state())
            .configure(routes::configure),
    )
    .await;

    for uri in [
        "/api/v1/offers",
        "/api/v1/appointments",
        "/api/v1/users",
        "/api/v1/service_availabilities",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 401, "uri {uri}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unauthorized");
    }
}

#[actix_web::test]
async fn authenticated_request_without_db_is_a_server_error_not_401() {
    // The gate passes; the tenant lookup then fails on the missing database.
    // Verifies the 401 path is exclusively the gate's.
    let app = test::init_service(
        App::new()
            .app_data(full_app_state())
            .configure(routes::configure),
    )
    .await;

    let token = mint_token(
        TEST_SECRET,
        &json!({"sub": "user-123", "exp": unix_now() + 3600}),
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/offers")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
}

#[actix_web::test]
async fn webhook_without_signature_is_400() {
    let app = test::init_service(
        App::new()
            .app_data(full_app_state())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/webhooks/stripe")
        .set_json(json!({"id": "evt_1", "type": "noop", "data": {"object": {}}}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}
