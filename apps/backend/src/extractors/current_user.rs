use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::auth::AuthError;
use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::auth_user::AuthUser;
use crate::repos::users;
use crate::state::app_state::AppState;

/// The acting user's database record, resolved from the verified subject
/// claim. Carries the tenant scope every protected handler filters by.
///
/// Requests whose token verifies but whose subject has no synced user row
/// are rejected with 403.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub tenant_id: i64,
    pub sub: String,
    pub email: String,
    pub role: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Stored by the RequireAuth middleware.
            let auth = req
                .extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(AppError::unauthorized(AuthError::MissingCredential))?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available".to_string()))?;

            let db = require_db(app_state)?;
            let user = users::find_by_sub(db, &auth.sub)
                .await?
                .ok_or_else(AppError::forbidden_user_not_found)?;

            Ok(CurrentUser {
                id: user.id,
                tenant_id: user.tenant_id,
                sub: user.sub,
                email: user.email,
                role: user.role,
            })
        })
    }
}
