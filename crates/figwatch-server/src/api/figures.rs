use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct FigureItem {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    pub platform: String,
    pub platform_id: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub(super) async fn list_figures(
    State(state): State<AppState>,
) -> Result<Json<Vec<FigureItem>>, ApiError> {
    let rows = figwatch_db::list_figures(&state.pool)
        .await
        .map_err(|e| map_db_error(&e))?;

    let data = rows
        .into_iter()
        .map(|row| FigureItem {
            id: row.id,
            name: row.name,
            title: row.title,
            platform: row.platform,
            platform_id: row.platform_id,
            category: row.category,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(data))
}
