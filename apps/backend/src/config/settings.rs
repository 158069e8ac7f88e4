use std::env;

/// Process configuration, read from the environment exactly once in `main`.
///
/// Nothing else in the codebase reads these variables at request time; the
/// values flow into `AppState` (or the server binding) from here.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    /// Shared secret for verifying inbound bearer tokens
    /// (`SUPABASE_JWT_SECRET`). Empty means verification fails closed while
    /// public routes keep serving.
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("PORT must be a valid port number, got {raw:?}"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            host,
            port,
            jwt_secret: env::var("SUPABASE_JWT_SECRET").unwrap_or_default(),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "HOST",
            "PORT",
            "SUPABASE_JWT_SECRET",
            "DATABASE_URL",
            "STRIPE_SECRET_KEY",
            "STRIPE_WEBHOOK_SECRET",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial_test::serial]
    fn defaults_when_unset() {
        clear_env();

        let settings = AppSettings::from_env().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert!(settings.jwt_secret.is_empty());
        assert!(settings.database_url.is_none());
    }

    #[test]
    #[serial_test::serial]
    fn reads_configured_values() {
        clear_env();
        env::set_var("PORT", "3001");
        env::set_var("SUPABASE_JWT_SECRET", "s3cret");
        env::set_var("DATABASE_URL", "postgres://localhost/vasta");

        let settings = AppSettings::from_env().unwrap();
        assert_eq!(settings.port, 3001);
        assert_eq!(settings.jwt_secret, "s3cret");
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/vasta")
        );

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn invalid_port_is_an_error() {
        clear_env();
        env::set_var("PORT", "not-a-port");

        assert!(AppSettings::from_env().is_err());

        clear_env();
    }
}
