use actix_web::{web, HttpResponse};
use lazy_regex::regex;
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::profiles;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckUsernameQuery {
    pub username: String,
}

#[derive(Debug, Serialize)]
struct CheckUsernameResponse {
    username: String,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

/// Slug availability for the public profile URL. Lowercase alphanumerics
/// and single hyphens, 3-30 chars.
async fn check_username(
    query: web::Query<CheckUsernameQuery>,
    _current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let username = query.username.trim().to_lowercase();

    let valid = regex!(r"^[a-z0-9]+(-[a-z0-9]+)*$").is_match(&username)
        && (3..=30).contains(&username.len());

    if !valid {
        return Ok(HttpResponse::Ok().json(CheckUsernameResponse {
            username,
            available: false,
            reason: Some("invalid_format"),
        }));
    }

    let db = require_db(&app_state)?;
    let taken = profiles::slug_taken(db, &username).await?;

    Ok(HttpResponse::Ok().json(CheckUsernameResponse {
        username,
        available: !taken,
        reason: taken.then_some("taken"),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles/check_username", web::get().to(check_username));
}
