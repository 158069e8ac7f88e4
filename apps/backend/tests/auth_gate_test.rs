mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use vasta::{AppError, AuthUser, RequireAuth};

use common::{mint_token, test_state, unix_now, TEST_SECRET};

/// Probe endpoint behind the auth middleware; echoes the verified subject.
async fn whoami(auth: AuthUser) -> Result<web::Json<Value>, AppError> {
    Ok(web::Json(json!({ "user_id": auth.sub })))
}

macro_rules! protected_app {
    ($secret:expr) => {
        test::init_service(
            App::new().app_data(test_state($secret)).service(
                web::scope("/protected")
                    .wrap(RequireAuth)
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn valid_token_reaches_the_handler() {
    let app = protected_app!(TEST_SECRET);

    let token = mint_token(
        TEST_SECRET,
        &json!({"sub": "user-123", "exp": unix_now() + 3600}),
    );

    let req = test::TestRequest::get()
        .uri("/protected/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], "user-123");
}

#[actix_web::test]
async fn verification_is_idempotent_across_requests() {
    let app = protected_app!(TEST_SECRET);

    let token = mint_token(
        TEST_SECRET,
        &json!({"sub": "user-123", "exp": unix_now() + 3600}),
    );

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/protected/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user_id"], "user-123");
    }
}

#[actix_web::test]
async fn token_without_exp_is_accepted() {
    let app = protected_app!(TEST_SECRET);

    let token = mint_token(TEST_SECRET, &json!({"sub": "user-123"}));

    let req = test::TestRequest::get()
        .uri("/protected/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn missing_header_is_401() {
    let app = protected_app!(TEST_SECRET);

    let req = test::TestRequest::get().uri("/protected/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);

    // Body is the uniform `{"error": ...}` object, nothing more
    let body: Value = test::read_body_json(resp).await;
    let obj = body.as_object().expect("error body must be an object");
    assert_eq!(obj.len(), 1);
    assert_eq!(body["error"], "Unauthorized");
}

#[actix_web::test]
async fn malformed_headers_are_401() {
    let app = protected_app!(TEST_SECRET);

    for header in ["Token abc123", "Bearer", "Bearer ", "Basic abc123", "abc123"] {
        let req = test::TestRequest::get()
            .uri("/protected/me")
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 401, "header {header:?}");
    }
}

#[actix_web::test]
async fn unparsable_tokens_are_401() {
    let app = protected_app!(TEST_SECRET);

    for token in ["not.a.jwt", "garbage", "a.b.c.d"] {
        let req = test::TestRequest::get()
            .uri("/protected/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 401, "token {token:?}");
    }
}

#[actix_web::test]
async fn wrong_secret_never_reaches_the_handler() {
    let reached = Arc::new(AtomicBool::new(false));
    let flag = reached.clone();

    let app = test::init_service(
        App::new().app_data(test_state("correct-secret")).service(
            web::scope("/protected").wrap(RequireAuth).route(
                "/me",
                web::get().to(move |auth: AuthUser| {
                    let flag = flag.clone();
                    async move {
                        flag.store(true, Ordering::SeqCst);
                        Result::<web::Json<Value>, AppError>::Ok(web::Json(
                            json!({ "user_id": auth.sub }),
                        ))
                    }
                }),
            ),
        ),
    )
    .await;

    let token = mint_token("wrong-secret", &json!({"sub": "hacker"}));

    let req = test::TestRequest::get()
        .uri("/protected/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
    assert!(!reached.load(Ordering::SeqCst), "handler must not run");
}

#[actix_web::test]
async fn expired_token_is_401() {
    let app = protected_app!(TEST_SECRET);

    let token = mint_token(
        TEST_SECRET,
        &json!({"sub": "user-123", "exp": unix_now() - 3600}),
    );

    let req = test::TestRequest::get()
        .uri("/protected/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_web::test]
async fn token_without_subject_is_401() {
    let app = protected_app!(TEST_SECRET);

    for claims in [json!({"exp": unix_now() + 3600}), json!({"sub": ""})] {
        let token = mint_token(TEST_SECRET, &claims);

        let req = test::TestRequest::get()
            .uri("/protected/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 401, "claims {claims}");
    }
}

#[actix_web::test]
async fn unset_secret_fails_closed() {
    // No secret configured: every token is rejected, even one signed with
    // an empty secret.
    let app = protected_app!("");

    for signing_secret in [TEST_SECRET, ""] {
        let token = mint_token(signing_secret, &json!({"sub": "user-123"}));

        let req = test::TestRequest::get()
            .uri("/protected/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 401);
    }
}
