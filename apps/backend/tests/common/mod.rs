#![allow(dead_code)]

use actix_web::web;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use vasta::{AppState, SecurityConfig, StripeClient};

/// Secret shared by the tests that mint their own tokens.
pub const TEST_SECRET: &str = "super-secure-test-secret-123";

/// Db-less application state with the given verification secret.
pub fn test_state(secret: &str) -> web::Data<AppState> {
    web::Data::new(AppState::without_db(
        SecurityConfig::new(secret.as_bytes()),
        StripeClient::unconfigured(),
    ))
}

/// Sign an HS256 token over arbitrary claims, standing in for the external
/// identity provider.
pub fn mint_token(secret: &str, claims: &serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
