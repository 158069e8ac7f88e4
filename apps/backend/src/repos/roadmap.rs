use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::{feature_votes, roadmap_features};
use crate::error::AppError;

/// Features ordered by vote count, most voted first.
pub async fn list_features<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<roadmap_features::Model>, AppError> {
    let rows = roadmap_features::Entity::find()
        .order_by_desc(roadmap_features::Column::VotesCount)
        .order_by_desc(roadmap_features::Column::CreatedAt)
        .all(conn)
        .await?;
    Ok(rows)
}

pub async fn total_votes<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, AppError> {
    let count = feature_votes::Entity::find().count(conn).await?;
    Ok(count)
}

pub async fn find_feature<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    feature_id: Uuid,
) -> Result<Option<roadmap_features::Model>, AppError> {
    Ok(roadmap_features::Entity::find_by_id(feature_id).one(conn).await?)
}

/// Toggle `user_id`'s vote on a feature and keep the denormalized
/// `votes_count` in step. Returns whether the vote now exists. Run inside a
/// transaction.
pub async fn toggle_vote<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    feature: roadmap_features::Model,
    user_id: &str,
) -> Result<bool, AppError> {
    let existing = feature_votes::Entity::find_by_id((feature.id, user_id.to_string()))
        .one(conn)
        .await?;

    let votes = feature.votes_count;

    match existing {
        Some(vote) => {
            vote.delete(conn).await?;

            let mut active = feature.into_active_model();
            active.votes_count = Set((votes - 1).max(0));
            active.updated_at = Set(OffsetDateTime::now_utc());
            active.update(conn).await?;

            Ok(false)
        }
        None => {
            let vote = feature_votes::ActiveModel {
                feature_id: Set(feature.id),
                user_id: Set(user_id.to_string()),
                created_at: Set(OffsetDateTime::now_utc()),
            };
            vote.insert(conn).await?;

            let mut active = feature.into_active_model();
            active.votes_count = Set(votes + 1);
            active.updated_at = Set(OffsetDateTime::now_utc());
            active.update(conn).await?;

            Ok(true)
        }
    }
}
