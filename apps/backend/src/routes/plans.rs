use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::config::plans::{Plan, PLANS};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct PlansResponse {
    plans: Vec<Plan>,
}

/// Public plan catalog, served straight from the static configuration.
async fn get_plans() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(PlansResponse {
        plans: PLANS.to_vec(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/plans", web::get().to(get_plans));
}
