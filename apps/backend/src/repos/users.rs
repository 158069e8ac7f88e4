use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::users;
use crate::error::AppError;

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<users::Model>, AppError> {
    let user = users::Entity::find()
        .filter(users::Column::Sub.eq(sub))
        .one(conn)
        .await?;
    Ok(user)
}

pub async fn list_for_tenant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
) -> Result<Vec<users::Model>, AppError> {
    let rows = users::Entity::find()
        .filter(users::Column::TenantId.eq(tenant_id))
        .order_by_asc(users::Column::Id)
        .all(conn)
        .await?;
    Ok(rows)
}

pub struct CreateUser {
    pub tenant_id: i64,
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CreateUser,
) -> Result<users::Model, AppError> {
    let now = OffsetDateTime::now_utc();

    let user = users::ActiveModel {
        tenant_id: Set(input.tenant_id),
        sub: Set(input.sub),
        name: Set(input.name),
        email: Set(input.email),
        role: Set(input.role),
        status: Set("active".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(user.insert(conn).await?)
}
