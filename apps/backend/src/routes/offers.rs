use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::OffsetDateTime;

use crate::config::plans;
use crate::db::{require_db, txn::with_txn};
use crate::entities::offers as offer_entity;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::{offers, profiles, tenants};
use crate::state::app_state::AppState;

const OFFER_KINDS: [&str; 2] = ["digital_product", "bookable_service"];

#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub id: i64,
    pub profile_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub kind: String,
    pub active: bool,
    pub position: Option<i32>,
    pub metadata: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<offer_entity::Model> for OfferResponse {
    fn from(value: offer_entity::Model) -> Self {
        Self {
            id: value.id,
            profile_id: value.profile_id,
            title: value.title,
            description: value.description,
            price_cents: value.price_cents,
            currency: value.currency,
            kind: value.kind,
            active: value.active,
            position: value.position,
            metadata: value.metadata,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

async fn list_offers(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let rows = offers::list_for_tenant(db, current_user.tenant_id).await?;

    Ok(HttpResponse::Ok().json(rows.into_iter().map(OfferResponse::from).collect::<Vec<_>>()))
}

async fn get_offer(
    path: web::Path<i64>,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let offer_id = path.into_inner();
    let db = require_db(&app_state)?;

    let offer = offers::find_for_tenant(db, current_user.tenant_id, offer_id)
        .await?
        .ok_or_else(|| AppError::not_found("OFFER_NOT_FOUND", format!("No offer {offer_id}")))?;

    Ok(HttpResponse::Ok().json(OfferResponse::from(offer)))
}

#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub profile_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i32,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

async fn create_offer(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateOfferRequest>,
) -> Result<HttpResponse, AppError> {
    let CreateOfferRequest {
        profile_id,
        title,
        description,
        price_cents,
        currency,
        kind,
        position,
        metadata,
    } = body.into_inner();

    if title.trim().is_empty() {
        return Err(AppError::bad_request(
            "INVALID_TITLE",
            "Title cannot be empty".to_string(),
        ));
    }
    if price_cents < 0 {
        return Err(AppError::bad_request(
            "INVALID_PRICE",
            "Price cannot be negative".to_string(),
        ));
    }

    let kind = kind.unwrap_or_else(|| "digital_product".to_string());
    if !OFFER_KINDS.contains(&kind.as_str()) {
        return Err(AppError::bad_request(
            "INVALID_KIND",
            format!("Kind must be one of {OFFER_KINDS:?}"),
        ));
    }

    let tenant_id = current_user.tenant_id;

    let offer = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            // The offer quota comes from the tenant's current plan.
            let tenant = tenants::find_by_id(txn, tenant_id)
                .await?
                .ok_or_else(AppError::forbidden)?;

            if let Some(limit) = plans::offer_limit(&tenant.current_plan_code) {
                let count = offers::count_for_tenant(txn, tenant_id).await?;
                if count >= u64::from(limit) {
                    return Err(AppError::conflict(
                        "OFFER_LIMIT_REACHED",
                        format!(
                            "The {} plan allows {limit} offers; upgrade to add more",
                            tenant.current_plan_code
                        ),
                    ));
                }
            }

            profiles::find_for_tenant(txn, tenant_id, profile_id)
                .await?
                .ok_or_else(|| {
                    AppError::bad_request(
                        "INVALID_PROFILE",
                        format!("No profile {profile_id} in this tenant"),
                    )
                })?;

            offers::create(
                txn,
                offers::CreateOffer {
                    tenant_id,
                    profile_id,
                    title,
                    description,
                    price_cents,
                    currency: currency.unwrap_or_else(|| "BRL".to_string()),
                    kind,
                    position,
                    metadata: metadata.unwrap_or_else(|| serde_json::json!({})),
                },
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(OfferResponse::from(offer)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOfferRequest {
    #[serde(default)]
    pub title: Option<String>,
    // Option<Option<_>> distinguishes "not provided" from "set to null"
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price_cents: Option<i32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default, with = "double_option")]
    pub position: Option<Option<i32>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

async fn update_offer(
    path: web::Path<i64>,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<UpdateOfferRequest>,
) -> Result<HttpResponse, AppError> {
    let offer_id = path.into_inner();
    let payload = body.into_inner();

    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(AppError::bad_request(
                "INVALID_TITLE",
                "Title cannot be empty".to_string(),
            ));
        }
    }
    if let Some(price_cents) = payload.price_cents {
        if price_cents < 0 {
            return Err(AppError::bad_request(
                "INVALID_PRICE",
                "Price cannot be negative".to_string(),
            ));
        }
    }
    if let Some(kind) = &payload.kind {
        if !OFFER_KINDS.contains(&kind.as_str()) {
            return Err(AppError::bad_request(
                "INVALID_KIND",
                format!("Kind must be one of {OFFER_KINDS:?}"),
            ));
        }
    }

    let tenant_id = current_user.tenant_id;

    let offer = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let offer = offers::find_for_tenant(txn, tenant_id, offer_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found("OFFER_NOT_FOUND", format!("No offer {offer_id}"))
                })?;

            offers::update(
                txn,
                offer,
                offers::UpdateOffer {
                    title: payload.title,
                    description: payload.description,
                    price_cents: payload.price_cents,
                    currency: payload.currency,
                    kind: payload.kind,
                    active: payload.active,
                    position: payload.position,
                    metadata: payload.metadata,
                },
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(OfferResponse::from(offer)))
}

async fn delete_offer(
    path: web::Path<i64>,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let offer_id = path.into_inner();
    let tenant_id = current_user.tenant_id;

    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let offer = offers::find_for_tenant(txn, tenant_id, offer_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found("OFFER_NOT_FOUND", format!("No offer {offer_id}"))
                })?;

            offers::delete(txn, offer).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/offers")
            .route(web::get().to(list_offers))
            .route(web::post().to(create_offer)),
    );
    cfg.service(
        web::resource("/offers/{id}")
            .route(web::get().to(get_offer))
            .route(web::put().to(update_offer))
            .route(web::delete().to(delete_offer)),
    );
}
