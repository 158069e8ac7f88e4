use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::offers;
use crate::services::billing;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub offer_id: i64,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Serialize)]
struct CreateCheckoutResponse {
    session_id: String,
    url: Option<String>,
    checkout_id: i64,
}

/// One-off payment Checkout for an offer. A pending checkout row is
/// recorded; the webhook marks it paid.
async fn create_checkout(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateCheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let db = require_db(&app_state)?;

    let offer = offers::find_for_tenant(db, current_user.tenant_id, payload.offer_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found("OFFER_NOT_FOUND", format!("No offer {}", payload.offer_id))
        })?;

    if !offer.active {
        return Err(AppError::bad_request(
            "OFFER_INACTIVE",
            "Offer is not active".to_string(),
        ));
    }

    let (checkout, session) = billing::create_offer_checkout(
        db,
        &app_state.stripe,
        current_user.tenant_id,
        &offer,
        payload.success_url,
        payload.cancel_url,
    )
    .await?;

    Ok(HttpResponse::Created().json(CreateCheckoutResponse {
        session_id: session.id,
        url: session.url,
        checkout_id: checkout.id,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkouts", web::post().to(create_checkout));
}
