use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roadmap_features")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// "planned", "in_progress" or "live".
    pub status: String,
    pub votes_count: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feature_votes::Entity")]
    FeatureVotes,
}

impl Related<super::feature_votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeatureVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
