use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::SqliteInitError;

/// Applies pending schema versions inside a transaction each.
///
/// Version 1 creates the question store, leaderboard, email subscribers and
/// local preferences.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if is_applied(pool, 1).await? {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY,
                summary TEXT NOT NULL,
                rating TEXT NOT NULL,
                context TEXT NOT NULL DEFAULT '',
                image_url TEXT,
                article_url TEXT,
                title TEXT NOT NULL UNIQUE,
                published_at TEXT,
                tags TEXT NOT NULL DEFAULT ''
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS leaderboard (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                score INTEGER NOT NULL CHECK (score >= 0),
                subject TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS email_subscribers (
                email TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_questions_published_at
                ON questions (published_at DESC);
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_leaderboard_subject_score
                ON leaderboard (subject, score DESC, created_at ASC);
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(1_i64)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(target: "storage.sqlite", version = 1, "schema migrated");

    Ok(())
}
