use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

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

/// Creates the `job_descriptions` table and its length index when missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS job_descriptions (
            id              UUID PRIMARY KEY,
            content_hash    TEXT NOT NULL UNIQUE,
            full_text       TEXT NOT NULL,
            keywords        TEXT[] NOT NULL,
            char_length     INTEGER NOT NULL,
            normalized_text TEXT NOT NULL,
            created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS job_descriptions_char_length_idx ON job_descriptions (char_length)",
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
