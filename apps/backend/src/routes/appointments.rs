use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Time};

use crate::db::require_db;
use crate::entities::appointments as appointment_entity;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::{appointments, availability, offers};
use crate::services::slots::{self, AvailabilityWindow, BookedInterval, Slot};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: i64,
    pub offer_id: i64,
    pub profile_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub duration_minutes: i32,
    pub status: String,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
}

impl From<appointment_entity::Model> for AppointmentResponse {
    fn from(value: appointment_entity::Model) -> Self {
        Self {
            id: value.id,
            offer_id: value.offer_id,
            profile_id: value.profile_id,
            starts_at: value.starts_at,
            duration_minutes: value.duration_minutes,
            status: value.status,
            client_name: value.client_name,
            client_email: value.client_email,
        }
    }
}

async fn list_appointments(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let rows = appointments::list_for_tenant(db, current_user.tenant_id).await?;

    Ok(HttpResponse::Ok().json(
        rows.into_iter()
            .map(AppointmentResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub offer_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    pub duration_minutes: i32,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
}

async fn create_appointment(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();

    if payload.duration_minutes <= 0 {
        return Err(AppError::bad_request(
            "INVALID_DURATION",
            "Duration must be positive".to_string(),
        ));
    }

    let db = require_db(&app_state)?;

    let offer = offers::find_for_tenant(db, current_user.tenant_id, payload.offer_id)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(
                "INVALID_OFFER",
                format!("No offer {} in this tenant", payload.offer_id),
            )
        })?;

    let appointment = appointments::create(
        db,
        appointments::CreateAppointment {
            tenant_id: current_user.tenant_id,
            offer_id: offer.id,
            profile_id: offer.profile_id,
            starts_at: payload.starts_at,
            duration_minutes: payload.duration_minutes,
            client_name: payload.client_name,
            client_email: payload.client_email,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(AppointmentResponse::from(appointment)))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub offer_id: i64,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Serialize)]
struct SlotsResponse {
    offer_id: i64,
    date: String,
    slots: Vec<Slot>,
}

/// Free slots for a bookable offer on one day: the offer's availability
/// windows minus whatever is already booked.
async fn get_slots(
    query: web::Query<SlotsQuery>,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(&query.date, &format).map_err(|_| {
        AppError::bad_request(
            "INVALID_DATE",
            format!("Date {:?} is not YYYY-MM-DD", query.date),
        )
    })?;

    let db = require_db(&app_state)?;

    let offer = offers::find_for_tenant(db, current_user.tenant_id, query.offer_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found("OFFER_NOT_FOUND", format!("No offer {}", query.offer_id))
        })?;

    let windows: Vec<AvailabilityWindow> = availability::list_active_for_offer(db, offer.id)
        .await?
        .into_iter()
        .map(|w| AvailabilityWindow {
            weekday: w.weekday,
            start_minute: w.start_minute,
            end_minute: w.end_minute,
            duration_minutes: w.duration_minutes,
        })
        .collect();

    let day_start = date.with_time(Time::MIDNIGHT).assume_utc();
    let booked: Vec<BookedInterval> =
        appointments::list_booked_for_offer(db, offer.id, day_start, day_start + Duration::days(1))
            .await?
            .into_iter()
            .map(|a| BookedInterval {
                starts_at: a.starts_at,
                duration_minutes: a.duration_minutes,
            })
            .collect();

    let slots = slots::free_slots(date, &windows, &booked);

    Ok(HttpResponse::Ok().json(SlotsResponse {
        offer_id: offer.id,
        date: query.date.clone(),
        slots,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/appointments")
            .route(web::get().to(list_appointments))
            .route(web::post().to(create_appointment)),
    );
    cfg.route("/slots", web::get().to(get_slots));
}
