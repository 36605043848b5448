use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{map_db_error, normalize_limit, ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct AlertItem {
    pub id: i64,
    pub alert_type: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub post_id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlertsQuery {
    pub limit: Option<i64>,
    pub alert_type: Option<String>,
}

pub(super) async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<Vec<AlertItem>>, ApiError> {
    let rows = figwatch_db::list_alerts(
        &state.pool,
        normalize_limit(query.limit),
        query.alert_type.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(&e))?;

    let data = rows
        .into_iter()
        .map(|row| AlertItem {
            id: row.id,
            alert_type: row.alert_type,
            message: row.message,
            sent_at: row.sent_at,
            post_id: row.post_id,
        })
        .collect();

    Ok(Json(data))
}
