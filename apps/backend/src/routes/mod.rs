use actix_web::web;

pub mod appointments;
pub mod availability;
pub mod checkouts;
pub mod health;
pub mod offers;
pub mod plans;
pub mod profiles;
pub mod roadmap;
pub mod subscriptions;
pub mod users;
pub mod webhooks;

use crate::middleware::require_auth::RequireAuth;

/// Wire the full route table: `/health` plus the `/api/v1` surface with its
/// public endpoints and the bearer-token-gated remainder. Used by `main` and
/// by integration tests, so both exercise the same middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Liveness: GET /health
    health::configure_routes(cfg);

    cfg.service(
        web::scope("/api/v1")
            // Public surface: plan catalog, roadmap listing, webhooks
            .configure(plans::configure_routes)
            .configure(roadmap::configure_public_routes)
            .configure(webhooks::configure_routes)
            // Everything below requires a verified bearer token
            .service(
                web::scope("")
                    .wrap(RequireAuth)
                    .configure(appointments::configure_routes)
                    .configure(availability::configure_routes)
                    .configure(checkouts::configure_routes)
                    .configure(offers::configure_routes)
                    .configure(profiles::configure_routes)
                    .configure(roadmap::configure_protected_routes)
                    .configure(subscriptions::configure_routes)
                    .configure(users::configure_routes),
            ),
    );
}
