//! Seeding of monitored figures and watchlists from the YAML config file.

use figwatch_core::FiguresFile;
use serde_json::json;
use sqlx::PgPool;

use crate::DbError;

/// Upsert watchlists and figures from config into the database.
///
/// Returns the number of figures processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_from_config(pool: &PgPool, file: &FiguresFile) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    for watchlist in &file.watchlists {
        sqlx::query(
            "INSERT INTO watchlists (name, description, keywords) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO UPDATE SET \
                 description = EXCLUDED.description, \
                 keywords = EXCLUDED.keywords",
        )
        .bind(&watchlist.name)
        .bind(&watchlist.description)
        .bind(json!(watchlist.keywords))
        .execute(&mut *tx)
        .await?;
    }

    let mut count = 0usize;

    for figure in &file.figures {
        let figure_id: i64 = sqlx::query_scalar(
            "INSERT INTO monitored_figures (name, title, platform, platform_id, category) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (platform, platform_id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 title = EXCLUDED.title, \
                 category = EXCLUDED.category \
             RETURNING id",
        )
        .bind(&figure.name)
        .bind(&figure.title)
        .bind(&figure.platform)
        .bind(&figure.platform_id)
        .bind(&figure.category)
        .fetch_one(&mut *tx)
        .await?;

        for watchlist_name in &figure.watchlists {
            sqlx::query(
                "INSERT INTO figure_watchlists (figure_id, watchlist_id) \
                 SELECT $1, id FROM watchlists WHERE name = $2 \
                 ON CONFLICT DO NOTHING",
            )
            .bind(figure_id)
            .bind(watchlist_name)
            .execute(&mut *tx)
            .await?;
        }

        count += 1;
    }

    tx.commit().await?;

    Ok(count)
}
