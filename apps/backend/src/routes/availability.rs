use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::entities::service_availabilities;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::{availability, offers};
use crate::state::app_state::AppState;

const MINUTES_PER_DAY: i32 = 24 * 60;

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub id: i64,
    pub offer_id: i64,
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub duration_minutes: i32,
    pub active: bool,
}

impl From<service_availabilities::Model> for AvailabilityResponse {
    fn from(value: service_availabilities::Model) -> Self {
        Self {
            id: value.id,
            offer_id: value.offer_id,
            weekday: value.weekday,
            start_minute: value.start_minute,
            end_minute: value.end_minute,
            duration_minutes: value.duration_minutes,
            active: value.active,
        }
    }
}

async fn list_availabilities(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let rows = availability::list_for_tenant(db, current_user.tenant_id).await?;

    Ok(HttpResponse::Ok().json(
        rows.into_iter()
            .map(AvailabilityResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub offer_id: i64,
    /// 0 (Sunday) through 6 (Saturday).
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub duration_minutes: i32,
}

async fn create_availability(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateAvailabilityRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();

    if !(0..=6).contains(&payload.weekday) {
        return Err(AppError::bad_request(
            "INVALID_WEEKDAY",
            "Weekday must be 0 (Sunday) through 6 (Saturday)".to_string(),
        ));
    }
    if payload.start_minute < 0
        || payload.end_minute > MINUTES_PER_DAY
        || payload.start_minute >= payload.end_minute
    {
        return Err(AppError::bad_request(
            "INVALID_WINDOW",
            "Window must satisfy 0 <= start < end <= 1440".to_string(),
        ));
    }
    if payload.duration_minutes <= 0 {
        return Err(AppError::bad_request(
            "INVALID_DURATION",
            "Duration must be positive".to_string(),
        ));
    }

    let db = require_db(&app_state)?;

    offers::find_for_tenant(db, current_user.tenant_id, payload.offer_id)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(
                "INVALID_OFFER",
                format!("No offer {} in this tenant", payload.offer_id),
            )
        })?;

    let window = availability::create(
        db,
        availability::CreateAvailability {
            tenant_id: current_user.tenant_id,
            offer_id: payload.offer_id,
            weekday: payload.weekday,
            start_minute: payload.start_minute,
            end_minute: payload.end_minute,
            duration_minutes: payload.duration_minutes,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(AvailabilityResponse::from(window)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/service_availabilities")
            .route(web::get().to(list_availabilities))
            .route(web::post().to(create_availability)),
    );
}
