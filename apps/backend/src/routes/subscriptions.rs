use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::tenants;
use crate::services::billing::{self, BillingInterval};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanCheckoutRequest {
    pub plan_code: String,
    #[serde(default = "default_interval")]
    pub interval: BillingInterval,
    pub success_url: String,
    pub cancel_url: String,
}

fn default_interval() -> BillingInterval {
    BillingInterval::Monthly
}

#[derive(Debug, Serialize)]
struct PlanCheckoutResponse {
    session_id: String,
    url: Option<String>,
}

/// Start a Checkout session that upgrades the tenant's plan. The actual
/// plan change lands later via webhook.
async fn create_plan_checkout(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<PlanCheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let db = require_db(&app_state)?;

    let tenant = tenants::find_by_id(db, current_user.tenant_id)
        .await?
        .ok_or_else(AppError::forbidden)?;

    let session = billing::create_plan_checkout(
        &app_state.stripe,
        &tenant,
        &current_user.email,
        &payload.plan_code,
        payload.interval,
        payload.success_url,
        payload.cancel_url,
    )
    .await?;

    Ok(HttpResponse::Created().json(PlanCheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/subscriptions/checkout",
        web::post().to(create_plan_checkout),
    );
}
