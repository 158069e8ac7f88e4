use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Serialize;

use crate::auth::AuthError;
use crate::error::AppError;

/// The verified identity of the caller, inserted into request extensions by
/// the `RequireAuth` middleware.
///
/// This is the typed replacement for stuffing a `user_id` string into a
/// generic per-request map: handlers declare an `AuthUser` parameter and get
/// the subject claim, or a 401 if the route was reached without the
/// middleware having run.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    /// Subject claim from the verified token, exposed unchanged.
    pub sub: String,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(AppError::unauthorized(AuthError::MissingCredential)),
        )
    }
}
