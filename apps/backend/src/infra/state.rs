use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::infra::stripe::StripeClient;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main).
pub struct StateBuilder {
    security_config: SecurityConfig,
    database_url: Option<String>,
    stripe: StripeClient,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            database_url: None,
            stripe: StripeClient::unconfigured(),
        }
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_stripe(mut self, stripe: StripeClient) -> Self {
        self.stripe = stripe;
        self
    }

    /// Connect and migrate when a database URL was given, otherwise build a
    /// db-less state.
    pub async fn build(self) -> Result<AppState, AppError> {
        match self.database_url {
            Some(url) => {
                let conn = connect_db(&url).await?;
                migration::migrate_up(&conn)
                    .await
                    .map_err(|e| AppError::db(format!("migration failed: {e}")))?;
                Ok(AppState::new(conn, self.security_config, self.stripe))
            }
            None => Ok(AppState::without_db(self.security_config, self.stripe)),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_succeeds_without_db() {
        let state = build_state().build().await.unwrap();
        assert!(state.db().is_none());
    }
}
