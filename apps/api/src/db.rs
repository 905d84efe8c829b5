use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const CREATE_HISTORY_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS history_records (
        seq         BIGSERIAL,
        id          UUID PRIMARY KEY,
        user_id     TEXT NOT NULL,
        collection  TEXT NOT NULL,
        payload     JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_HISTORY_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS history_records_owner_idx
        ON history_records (user_id, collection, created_at DESC, seq DESC)
"#;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the history schema if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_HISTORY_TABLE).execute(pool).await?;
    sqlx::query(CREATE_HISTORY_INDEX).execute(pool).await?;
    info!("History schema ready");
    Ok(())
}
