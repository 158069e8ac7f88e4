pub mod txn;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Canonical accessor for the database connection on `AppState`.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(AppError::db_unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::stripe::StripeClient;
    use crate::state::security_config::SecurityConfig;

    #[test]
    fn require_db_without_db() {
        let state = AppState::without_db(SecurityConfig::default(), StripeClient::unconfigured());

        match require_db(&state) {
            Err(AppError::DbUnavailable) => {}
            other => panic!("expected DbUnavailable, got {other:?}"),
        }
    }
}
