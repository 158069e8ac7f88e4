use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

/// JSON body for every error response: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: AuthError },
    #[error("Forbidden")]
    Forbidden,
    #[error("Forbidden: acting user not found")]
    ForbiddenUserNotFound,
    #[error("Not found: {detail}")]
    NotFound { code: &'static str, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: &'static str, detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Upstream error: {detail}")]
    Upstream { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Stable machine-readable code, used in logs only (the response body
    /// carries just a message).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            AppError::NotFound { code, .. } => code,
            AppError::BadRequest { code, .. } => code,
            AppError::Conflict { code, .. } => code,
            AppError::Db { .. } => "DB_ERROR",
            AppError::DbUnavailable => "DB_UNAVAILABLE",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL",
        }
    }

    /// Message exposed to the caller. Authentication failures are collapsed
    /// to a single generic message; the precise reason stays on the error
    /// value for logging and tests.
    fn detail(&self) -> String {
        match self {
            AppError::Unauthorized { .. } => "Unauthorized".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::ForbiddenUserNotFound => "Access denied".to_string(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Db { .. } => "Database error".to_string(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
            AppError::Upstream { detail } => detail.clone(),
            AppError::Config { .. } => "Server misconfiguration".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ForbiddenUserNotFound => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized(reason: AuthError) -> Self {
        Self::Unauthorized { reason }
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn forbidden_user_not_found() -> Self {
        Self::ForbiddenUserNotFound
    }

    pub fn not_found(code: &'static str, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn bad_request(code: &'static str, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn conflict(code: &'static str, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }

    pub fn upstream(detail: String) -> Self {
        Self::Upstream { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }
}

impl From<AuthError> for AppError {
    fn from(reason: AuthError) -> Self {
        AppError::Unauthorized { reason }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("{e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "request rejected");
        }

        HttpResponse::build(status).json(ErrorBody {
            error: self.detail(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;

    #[test]
    fn unauthorized_maps_to_401_with_generic_body() {
        for reason in [
            AuthError::MissingCredential,
            AuthError::MalformedCredential,
            AuthError::InvalidSignature,
            AuthError::ExpiredCredential,
            AuthError::MissingSubjectClaim,
            AuthError::SecretNotConfigured,
        ] {
            let err = AppError::unauthorized(reason);
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.detail(), "Unauthorized");
        }
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::forbidden().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::not_found("OFFER_NOT_FOUND", "no".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::bad_request("BAD_REQUEST", "no".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::db("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::upstream("stripe down".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn db_error_body_does_not_leak_detail() {
        let err = AppError::db("connection refused on 10.0.0.3".into());
        assert_eq!(err.detail(), "Database error");
    }
}
