use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::infra::stripe::StripeClient;

/// Application state containing shared resources.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios).
    db: Option<DatabaseConnection>,
    /// Token verification settings.
    pub security: SecurityConfig,
    /// Billing provider client.
    pub stripe: StripeClient,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig, stripe: StripeClient) -> Self {
        Self {
            db: Some(db),
            security,
            stripe,
        }
    }

    /// State without a database connection; handlers that need one answer
    /// with `DbUnavailable`.
    pub fn without_db(security: SecurityConfig, stripe: StripeClient) -> Self {
        Self {
            db: None,
            security,
            stripe,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
