use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::appointments;
use crate::error::AppError;

pub async fn list_for_tenant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
) -> Result<Vec<appointments::Model>, AppError> {
    let rows = appointments::Entity::find()
        .filter(appointments::Column::TenantId.eq(tenant_id))
        .order_by_asc(appointments::Column::StartsAt)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Non-canceled appointments for an offer inside `[from, to)`. Input for
/// slot computation.
pub async fn list_booked_for_offer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offer_id: i64,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Result<Vec<appointments::Model>, AppError> {
    let rows = appointments::Entity::find()
        .filter(appointments::Column::OfferId.eq(offer_id))
        .filter(appointments::Column::Status.ne("canceled"))
        .filter(appointments::Column::StartsAt.gte(from))
        .filter(appointments::Column::StartsAt.lt(to))
        .order_by_asc(appointments::Column::StartsAt)
        .all(conn)
        .await?;
    Ok(rows)
}

pub struct CreateAppointment {
    pub tenant_id: i64,
    pub offer_id: i64,
    pub profile_id: i64,
    pub starts_at: OffsetDateTime,
    pub duration_minutes: i32,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CreateAppointment,
) -> Result<appointments::Model, AppError> {
    let now = OffsetDateTime::now_utc();

    let appointment = appointments::ActiveModel {
        tenant_id: Set(input.tenant_id),
        offer_id: Set(input.offer_id),
        profile_id: Set(input.profile_id),
        starts_at: Set(input.starts_at),
        duration_minutes: Set(input.duration_minutes),
        status: Set("scheduled".to_string()),
        client_name: Set(input.client_name),
        client_email: Set(input.client_email),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(appointment.insert(conn).await?)
}
