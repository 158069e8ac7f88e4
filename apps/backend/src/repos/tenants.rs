use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use time::OffsetDateTime;

use crate::entities::tenants;
use crate::error::AppError;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
) -> Result<Option<tenants::Model>, AppError> {
    Ok(tenants::Entity::find_by_id(tenant_id).one(conn).await?)
}

pub async fn find_by_stripe_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: &str,
) -> Result<Option<tenants::Model>, AppError> {
    let tenant = tenants::Entity::find()
        .filter(tenants::Column::StripeCustomerId.eq(customer_id))
        .one(conn)
        .await?;
    Ok(tenant)
}

/// Sync the tenant's plan and billing status from the billing provider.
pub async fn set_plan<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant: tenants::Model,
    plan_code: &str,
    billing_status: &str,
) -> Result<tenants::Model, AppError> {
    let mut active = tenant.into_active_model();
    active.current_plan_code = Set(plan_code.to_string());
    active.billing_status = Set(billing_status.to_string());
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}

pub async fn set_stripe_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant: tenants::Model,
    customer_id: &str,
) -> Result<tenants::Model, AppError> {
    let mut active = tenant.into_active_model();
    active.stripe_customer_id = Set(Some(customer_id.to_string()));
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}
