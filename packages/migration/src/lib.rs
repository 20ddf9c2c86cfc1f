pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

mod m20250824_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250824_000001_init::Migration)]
    }
}

/// Apply all pending migrations, logging what the runner is about to do.
/// Used by the backend at startup and by integration tests.
pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    tracing::info!(pending, "applying migrations");
    Migrator::up(db, None).await?;
    tracing::info!("migrations applied");
    Ok(())
}
