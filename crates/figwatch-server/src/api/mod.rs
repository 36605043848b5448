mod alerts;
mod figures;
mod posts;
mod watchlists;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use figwatch_notify::BroadcastHub;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub hub: Arc<BroadcastHub>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(10).clamp(1, 200)
}

pub(super) fn map_db_error(error: &figwatch_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new("internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/figures", get(figures::list_figures))
        .route("/api/posts/latest", get(posts::list_latest_posts))
        .route("/api/alerts", get(alerts::list_alerts))
        .route("/api/watchlists", get(watchlists::list_watchlists))
        .route("/ws", get(crate::ws::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct StatusData {
    status: &'static str,
    service: &'static str,
    database: &'static str,
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    match figwatch_db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusData {
                status: "ok",
                service: "figwatch",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "status check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusData {
                    status: "degraded",
                    service: "figwatch",
                    database: "unavailable",
                }),
            )
        }
    }
}
