mod common;

use actix_web::{test, App};
use serde_json::Value;
use vasta::{routes, RequestTrace};

use common::{test_state, TEST_SECRET};

#[actix_web::test]
async fn health_reports_ok_without_a_database() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(test_state(TEST_SECRET))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "unavailable");
    assert!(body["time"].as_str().is_some());
}

#[actix_web::test]
async fn responses_carry_a_request_id() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(test_state(TEST_SECRET))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    let request_id = resp
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert!(!request_id.is_empty());
}
