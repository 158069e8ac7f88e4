use sea_orm::{Database, DatabaseConnection};

use crate::error::AppError;

/// Connect to the database. Does not run migrations; the state builder owns
/// that step.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}
