use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::profiles;
use crate::error::AppError;

pub async fn slug_taken<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: &str,
) -> Result<bool, AppError> {
    let count = profiles::Entity::find()
        .filter(profiles::Column::Slug.eq(slug))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn find_for_tenant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
    profile_id: i64,
) -> Result<Option<profiles::Model>, AppError> {
    let profile = profiles::Entity::find_by_id(profile_id)
        .filter(profiles::Column::TenantId.eq(tenant_id))
        .one(conn)
        .await?;
    Ok(profile)
}
