use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::service_availabilities;
use crate::error::AppError;

pub async fn list_for_tenant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
) -> Result<Vec<service_availabilities::Model>, AppError> {
    let rows = service_availabilities::Entity::find()
        .filter(service_availabilities::Column::TenantId.eq(tenant_id))
        .order_by_asc(service_availabilities::Column::Weekday)
        .order_by_asc(service_availabilities::Column::StartMinute)
        .all(conn)
        .await?;
    Ok(rows)
}

pub async fn list_active_for_offer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offer_id: i64,
) -> Result<Vec<service_availabilities::Model>, AppError> {
    let rows = service_availabilities::Entity::find()
        .filter(service_availabilities::Column::OfferId.eq(offer_id))
        .filter(service_availabilities::Column::Active.eq(true))
        .order_by_asc(service_availabilities::Column::StartMinute)
        .all(conn)
        .await?;
    Ok(rows)
}

pub struct CreateAvailability {
    pub tenant_id: i64,
    pub offer_id: i64,
    pub weekday: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub duration_minutes: i32,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CreateAvailability,
) -> Result<service_availabilities::Model, AppError> {
    let now = OffsetDateTime::now_utc();

    let window = service_availabilities::ActiveModel {
        tenant_id: Set(input.tenant_id),
        offer_id: Set(input.offer_id),
        weekday: Set(input.weekday),
        start_minute: Set(input.start_minute),
        end_minute: Set(input.end_minute),
        duration_minutes: Set(input.duration_minutes),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(window.insert(conn).await?)
}
