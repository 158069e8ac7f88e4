use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::offers;
use crate::error::AppError;

pub async fn list_for_tenant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
) -> Result<Vec<offers::Model>, AppError> {
    let rows = offers::Entity::find()
        .filter(offers::Column::TenantId.eq(tenant_id))
        .order_by_asc(offers::Column::Position)
        .order_by_asc(offers::Column::Id)
        .all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_for_tenant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
    offer_id: i64,
) -> Result<Option<offers::Model>, AppError> {
    let offer = offers::Entity::find_by_id(offer_id)
        .filter(offers::Column::TenantId.eq(tenant_id))
        .one(conn)
        .await?;
    Ok(offer)
}

pub async fn count_for_tenant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tenant_id: i64,
) -> Result<u64, AppError> {
    let count = offers::Entity::find()
        .filter(offers::Column::TenantId.eq(tenant_id))
        .count(conn)
        .await?;
    Ok(count)
}

pub struct CreateOffer {
    pub tenant_id: i64,
    pub profile_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub kind: String,
    pub position: Option<i32>,
    pub metadata: serde_json::Value,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CreateOffer,
) -> Result<offers::Model, AppError> {
    let now = OffsetDateTime::now_utc();

    let offer = offers::ActiveModel {
        tenant_id: Set(input.tenant_id),
        profile_id: Set(input.profile_id),
        title: Set(input.title),
        description: Set(input.description),
        price_cents: Set(input.price_cents),
        currency: Set(input.currency),
        kind: Set(input.kind),
        active: Set(true),
        position: Set(input.position),
        metadata: Set(input.metadata),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(offer.insert(conn).await?)
}

/// Partial update. Single-`Option` fields are "absent = keep"; the nested
/// `Option<Option<_>>` fields distinguish "set to null" from "keep".
#[derive(Debug, Default)]
pub struct UpdateOffer {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<i32>,
    pub currency: Option<String>,
    pub kind: Option<String>,
    pub active: Option<bool>,
    pub position: Option<Option<i32>>,
    pub metadata: Option<serde_json::Value>,
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offer: offers::Model,
    changes: UpdateOffer,
) -> Result<offers::Model, AppError> {
    let mut active = offer.into_active_model();

    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(price_cents) = changes.price_cents {
        active.price_cents = Set(price_cents);
    }
    if let Some(currency) = changes.currency {
        active.currency = Set(currency);
    }
    if let Some(kind) = changes.kind {
        active.kind = Set(kind);
    }
    if let Some(is_active) = changes.active {
        active.active = Set(is_active);
    }
    if let Some(position) = changes.position {
        active.position = Set(position);
    }
    if let Some(metadata) = changes.metadata {
        active.metadata = Set(metadata);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    Ok(active.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offer: offers::Model,
) -> Result<(), AppError> {
    offer.delete(conn).await?;
    Ok(())
}
