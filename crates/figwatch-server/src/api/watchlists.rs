use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct WatchlistItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub keywords: Value,
    pub created_at: DateTime<Utc>,
}

pub(super) async fn list_watchlists(
    State(state): State<AppState>,
) -> Result<Json<Vec<WatchlistItem>>, ApiError> {
    let rows = figwatch_db::list_watchlists(&state.pool)
        .await
        .map_err(|e| map_db_error(&e))?;

    let data = rows
        .into_iter()
        .map(|row| WatchlistItem {
            id: row.id,
            name: row.name,
            description: row.description,
            keywords: row.keywords,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(data))
}
