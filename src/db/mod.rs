pub mod audit;
pub mod submissions;

use sqlx::PgPool;

/// Round-trip to the database; used by the health check.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
