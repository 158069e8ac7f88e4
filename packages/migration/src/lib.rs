pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

mod m20250801_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250801_000001_init::Migration)]
    }
}

/// Apply all pending migrations. Used by the state builder at startup.
pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    tracing::info!("running migrations");

    match Migrator::up(db, None).await {
        Ok(()) => {
            tracing::info!("migrations up to date");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "migration failed");
            Err(e)
        }
    }
}

/// Latest applied migration version, for the health endpoint.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT version FROM seaql_migrations ORDER BY applied_at DESC LIMIT 1".to_string(),
    );

    match db.query_one(stmt).await? {
        Some(row) => Ok(Some(row.try_get::<String>("", "version")?)),
        None => Ok(None),
    }
}
