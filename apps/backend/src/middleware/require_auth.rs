//! Bearer-token authentication middleware.
//!
//! Wraps protected scopes. Extracts the `Authorization: Bearer <token>`
//! credential, verifies it against the configured secret and stores the
//! resulting [`AuthUser`] in request extensions. Any failure short-circuits
//! the pipeline with a 401; the downstream handler is never invoked.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;

use crate::auth::jwt::verify_access_token;
use crate::auth::AuthError;
use crate::error::AppError;
use crate::extractors::auth_user::AuthUser;
use crate::state::app_state::AppState;

pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware { service }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match extract_bearer_from_header(req.headers().get(header::AUTHORIZATION)) {
            Ok(token) => token,
            Err(reason) => {
                warn!(path = req.path(), %reason, "request rejected by auth gate");
                return Box::pin(async move { Err(AppError::unauthorized(reason).into()) });
            }
        };

        let app_state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(AppError::internal("AppState not available".to_string()).into())
                });
            }
        };

        match verify_access_token(&token, &app_state.security) {
            Ok(claims) => {
                // Store the verified identity BEFORE calling the service so
                // extractors can read it.
                req.extensions_mut().insert(AuthUser { sub: claims.sub });

                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(reason) => {
                warn!(path = req.path(), %reason, "request rejected by auth gate");
                Box::pin(async move { Err(AppError::unauthorized(reason).into()) })
            }
        }
    }
}

/// Pull the token out of `Bearer <token>`. Exactly one space, non-empty
/// token, nothing else accepted.
fn extract_bearer_from_header(
    header_value: Option<&header::HeaderValue>,
) -> Result<String, AuthError> {
    let auth_value = header_value.ok_or(AuthError::MissingCredential)?;

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    if auth_str.trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AuthError::MalformedCredential);
    }

    Ok(parts[1].to_string())
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::HeaderValue;

    use super::extract_bearer_from_header;
    use crate::auth::AuthError;

    #[test]
    fn missing_header() {
        assert_eq!(
            extract_bearer_from_header(None),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn empty_header_counts_as_missing() {
        let value = HeaderValue::from_static("");
        assert_eq!(
            extract_bearer_from_header(Some(&value)),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn wrong_scheme_or_shape() {
        for raw in ["Token abc", "Bearer", "Bearer a b", "Basic abc", "abc"] {
            let value = HeaderValue::from_static(raw);
            assert_eq!(
                extract_bearer_from_header(Some(&value)),
                Err(AuthError::MalformedCredential),
                "header {raw:?}"
            );
        }
    }

    #[test]
    fn well_formed_bearer() {
        let value = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(
            extract_bearer_from_header(Some(&value)),
            Ok("abc.def.ghi".to_string())
        );
    }
}
