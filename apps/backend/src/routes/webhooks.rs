use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::infra::stripe;
use crate::services::billing::{self, StripeEvent};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct WebhookAck {
    received: bool,
}

/// Stripe webhook endpoint. The body must stay raw bytes until the
/// signature is checked; only then is the event parsed and applied.
async fn stripe_webhook(
    req: HttpRequest,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let signature = req
        .headers()
        .get(stripe::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::bad_request(
                "WEBHOOK_SIGNATURE_MISSING",
                "Missing Stripe-Signature header".to_string(),
            )
        })?;

    let now = OffsetDateTime::now_utc().unix_timestamp();
    app_state
        .stripe
        .verify_webhook_signature(&body, signature, now)?;

    let event: StripeEvent = serde_json::from_slice(&body).map_err(|e| {
        AppError::bad_request("WEBHOOK_PAYLOAD_INVALID", format!("Unparsable event: {e}"))
    })?;

    info!(event = %event.id, event_type = %event.event_type, "webhook received");

    let stripe_client = app_state.stripe.clone();
    with_txn(&app_state, move |txn| {
        Box::pin(async move { billing::apply_webhook_event(txn, &stripe_client, &event).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(WebhookAck { received: true }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhooks/stripe", web::post().to(stripe_webhook));
}
