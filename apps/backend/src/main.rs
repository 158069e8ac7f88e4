use actix_web::{web, App, HttpServer};
use vasta::config::settings::AppSettings;
use vasta::infra::state::build_state;
use vasta::infra::stripe::StripeClient;
use vasta::middleware::cors::cors_middleware;
use vasta::middleware::request_trace::RequestTrace;
use vasta::middleware::security_headers::SecurityHeaders;
use vasta::middleware::structured_logger::StructuredLogger;
use vasta::routes;
use vasta::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let settings = match AppSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    // Verification fails closed without a secret; public routes keep
    // serving, so this is a warning rather than a startup failure.
    if settings.jwt_secret.is_empty() {
        tracing::warn!("SUPABASE_JWT_SECRET is not set; every protected request will be rejected");
    }
    let security_config = SecurityConfig::new(settings.jwt_secret.as_bytes());

    let stripe = StripeClient::new(&settings.stripe_secret_key, &settings.stripe_webhook_secret);
    if !stripe.is_configured() {
        tracing::warn!("STRIPE_SECRET_KEY is not set; billing endpoints will fail");
    }

    let Some(database_url) = settings.database_url.clone() else {
        eprintln!("❌ DATABASE_URL must be set");
        std::process::exit(1);
    };

    let app_state = match build_state()
        .with_database_url(database_url)
        .with_security(security_config)
        .with_stripe(stripe)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Vasta API on http://{}:{}",
        settings.host, settings.port
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
