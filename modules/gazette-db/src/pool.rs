use gazette_core::{Config, DbResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn connect(config: &Config) -> DbResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_pool_max)
        .min_connections(config.database_pool_min)
        .acquire_timeout(config.database_connect_timeout)
        .connect(&config.database_url)
        .await?;

    crate::schema::init(&pool).await?;
    Ok(pool)
}
