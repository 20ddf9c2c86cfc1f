use sea_orm::{Database, DatabaseConnection};

use crate::error::AppError;

/// Connect to the database behind `DATABASE_URL`.
/// This function does NOT run any migrations.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Read `DATABASE_URL` from the environment.
pub fn db_url() -> Result<String, AppError> {
    std::env::var("DATABASE_URL").map_err(|_| AppError::config("DATABASE_URL must be set"))
}
