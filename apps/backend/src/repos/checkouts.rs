use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use time::OffsetDateTime;

use crate::entities::checkouts;
use crate::error::AppError;

pub struct CreateCheckout {
    pub tenant_id: i64,
    pub offer_id: i64,
    pub stripe_session_id: String,
    pub amount_cents: i32,
    pub currency: String,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CreateCheckout,
) -> Result<checkouts::Model, AppError> {
    let now = OffsetDateTime::now_utc();

    let checkout = checkouts::ActiveModel {
        tenant_id: Set(input.tenant_id),
        offer_id: Set(input.offer_id),
        stripe_session_id: Set(input.stripe_session_id),
        stripe_payment_intent_id: Set(None),
        status: Set("pending".to_string()),
        amount_cents: Set(input.amount_cents),
        currency: Set(input.currency),
        raw_data: Set(serde_json::json!({})),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(checkout.insert(conn).await?)
}

pub async fn find_by_session_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: &str,
) -> Result<Option<checkouts::Model>, AppError> {
    let checkout = checkouts::Entity::find()
        .filter(checkouts::Column::StripeSessionId.eq(session_id))
        .one(conn)
        .await?;
    Ok(checkout)
}

pub async fn mark_paid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    checkout: checkouts::Model,
    payment_intent_id: Option<String>,
    raw_data: serde_json::Value,
) -> Result<checkouts::Model, AppError> {
    let mut active = checkout.into_active_model();
    active.status = Set("paid".to_string());
    active.stripe_payment_intent_id = Set(payment_intent_id);
    active.raw_data = Set(raw_data);
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}
