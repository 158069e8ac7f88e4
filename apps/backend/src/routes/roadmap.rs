use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{require_db, txn::with_txn};
use crate::entities::roadmap_features;
use crate::error::AppError;
use crate::extractors::auth_user::AuthUser;
use crate::repos::roadmap;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct FeatureResponse {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    votes_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<roadmap_features::Model> for FeatureResponse {
    fn from(value: roadmap_features::Model) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            status: value.status,
            votes_count: value.votes_count,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct RoadmapResponse {
    features: Vec<FeatureResponse>,
    total_votes: u64,
}

/// Public roadmap listing, most voted first.
async fn get_roadmap(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;

    let features = roadmap::list_features(db).await?;
    let total_votes = roadmap::total_votes(db).await?;

    Ok(HttpResponse::Ok().json(RoadmapResponse {
        features: features.into_iter().map(FeatureResponse::from).collect(),
        total_votes,
    }))
}

#[derive(Debug, Serialize)]
struct VoteResponse {
    voted: bool,
}

/// Toggle the acting user's vote on a feature. The vote is keyed by the
/// verified subject, so no user-table sync is required to vote.
async fn vote_feature(
    path: web::Path<Uuid>,
    auth: AuthUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let feature_id = path.into_inner();
    let sub = auth.sub;

    let voted = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let feature = roadmap::find_feature(txn, feature_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found("FEATURE_NOT_FOUND", format!("No feature {feature_id}"))
                })?;

            roadmap::toggle_vote(txn, feature, &sub).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(VoteResponse { voted }))
}

pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/roadmap", web::get().to(get_roadmap));
}

pub fn configure_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/roadmap/{id}/vote", web::post().to(vote_feature));
}
