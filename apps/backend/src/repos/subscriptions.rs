use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use time::OffsetDateTime;

use crate::entities::subscriptions;
use crate::error::AppError;

pub async fn find_by_external_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    external_id: &str,
) -> Result<Option<subscriptions::Model>, AppError> {
    let subscription = subscriptions::Entity::find()
        .filter(subscriptions::Column::ExternalId.eq(external_id))
        .one(conn)
        .await?;
    Ok(subscription)
}

pub struct SubscriptionUpdate {
    pub tenant_id: i64,
    pub external_id: String,
    pub plan_code: String,
    pub status: String,
    pub current_period_end: Option<OffsetDateTime>,
    pub raw_data: serde_json::Value,
}

/// Insert or refresh the local mirror of a provider subscription, keyed by
/// its external id. Webhook deliveries are not ordered, so the whole row is
/// rewritten each time.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    update: SubscriptionUpdate,
) -> Result<subscriptions::Model, AppError> {
    let now = OffsetDateTime::now_utc();

    match find_by_external_id(conn, &update.external_id).await? {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.plan_code = Set(update.plan_code);
            active.status = Set(update.status);
            active.current_period_end = Set(update.current_period_end);
            active.raw_data = Set(update.raw_data);
            active.updated_at = Set(now);
            Ok(active.update(conn).await?)
        }
        None => {
            let subscription = subscriptions::ActiveModel {
                tenant_id: Set(update.tenant_id),
                external_id: Set(update.external_id),
                plan_code: Set(update.plan_code),
                status: Set(update.status),
                current_period_end: Set(update.current_period_end),
                raw_data: Set(update.raw_data),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            Ok(subscription.insert(conn).await?)
        }
    }
}
