use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::entities::users as user_entity;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::users;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<user_entity::Model> for UserResponse {
    fn from(value: user_entity::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

async fn list_users(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let rows = users::list_for_tenant(db, current_user.tenant_id).await?;

    Ok(HttpResponse::Ok().json(rows.into_iter().map(UserResponse::from).collect::<Vec<_>>()))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// External identity of the invited user.
    pub sub: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

async fn create_user(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();

    if payload.sub.trim().is_empty() {
        return Err(AppError::bad_request(
            "INVALID_SUB",
            "External identity cannot be empty".to_string(),
        ));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request(
            "INVALID_NAME",
            "Name cannot be empty".to_string(),
        ));
    }
    if !payload.email.contains('@') {
        return Err(AppError::bad_request(
            "INVALID_EMAIL",
            "Email is not valid".to_string(),
        ));
    }

    let db = require_db(&app_state)?;

    if users::find_by_sub(db, &payload.sub).await?.is_some() {
        return Err(AppError::conflict(
            "USER_EXISTS",
            "A user with this identity already exists".to_string(),
        ));
    }

    let user = users::create(
        db,
        users::CreateUser {
            tenant_id: current_user.tenant_id,
            sub: payload.sub,
            name: payload.name,
            email: payload.email,
            role: payload.role.unwrap_or_else(|| "admin".to_string()),
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    );
}
