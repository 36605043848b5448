//! Live HTTP API tests against a real Postgres.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use figwatch_core::{FigureConfig, FiguresFile, WatchlistConfig};
use figwatch_db::NewPost;
use figwatch_notify::BroadcastHub;
use figwatch_server::{build_app, AppState};

fn app(pool: PgPool) -> axum::Router {
    build_app(AppState {
        pool,
        hub: Arc::new(BroadcastHub::new()),
    })
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn seed_one_figure(pool: &PgPool) -> i64 {
    let file = FiguresFile {
        figures: vec![FigureConfig {
            name: "Jerome Powell".to_string(),
            title: Some("Federal Reserve Chair".to_string()),
            platform: "twitter".to_string(),
            platform_id: "jpowell".to_string(),
            category: Some("political".to_string()),
            watchlists: vec!["fed".to_string()],
        }],
        watchlists: vec![WatchlistConfig {
            name: "fed".to_string(),
            description: Some("Federal Reserve officials".to_string()),
            keywords: vec!["rates".to_string(), "inflation".to_string()],
        }],
    };
    figwatch_db::seed_from_config(pool, &file).await.unwrap();
    figwatch_db::list_figures(pool).await.unwrap()[0].id
}

async fn insert_scored_post(pool: &PgPool, figure_id: i64, id: &str, score: f64) -> i64 {
    let post = figwatch_db::insert_post(
        pool,
        &NewPost {
            platform_post_id: id.to_string(),
            content: format!("post {id}"),
            figure_id,
            posted_at: Some(chrono::Utc::now()),
            likes: 0,
            retweets: 0,
            replies: 0,
        },
    )
    .await
    .unwrap();
    figwatch_db::set_impact_score(pool, post.id, score)
        .await
        .unwrap();
    post.id
}

#[sqlx::test(migrations = "../../migrations")]
async fn status_reports_ok_with_live_database(pool: PgPool) {
    let (status, body) = get_json(app(pool), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[sqlx::test(migrations = "../../migrations")]
async fn figures_endpoint_lists_seeded_figures(pool: PgPool) {
    seed_one_figure(&pool).await;

    let (status, body) = get_json(app(pool), "/api/figures").await;
    assert_eq!(status, StatusCode::OK);
    let figures = body.as_array().unwrap();
    assert_eq!(figures.len(), 1);
    assert_eq!(figures[0]["name"], "Jerome Powell");
    assert_eq!(figures[0]["platform_id"], "jpowell");
}

#[sqlx::test(migrations = "../../migrations")]
async fn latest_posts_respect_limit_and_impact_filter(pool: PgPool) {
    let figure_id = seed_one_figure(&pool).await;
    insert_scored_post(&pool, figure_id, "1", 0.2).await;
    insert_scored_post(&pool, figure_id, "2", 0.9).await;
    insert_scored_post(&pool, figure_id, "3", 0.8).await;

    let (status, body) = get_json(
        app(pool.clone()),
        "/api/posts/latest?limit=2&min_impact_score=0.5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    for post in posts {
        assert!(post["impact_score"].as_f64().unwrap() >= 0.5);
        assert_eq!(post["author"]["name"], "Jerome Powell");
    }

    // Default limit is 10 and unfiltered returns everything.
    let (_, body) = get_json(app(pool), "/api/posts/latest").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn alerts_endpoint_filters_by_type(pool: PgPool) {
    let figure_id = seed_one_figure(&pool).await;
    let post_id = insert_scored_post(&pool, figure_id, "1", 0.9).await;
    figwatch_db::insert_alert(&pool, post_id, "high_priority", "High impact post")
        .await
        .unwrap();
    figwatch_db::insert_alert(&pool, post_id, "market_impact", "Market moved")
        .await
        .unwrap();

    let (status, body) = get_json(app(pool.clone()), "/api/alerts?alert_type=high_priority").await;
    assert_eq!(status, StatusCode::OK);
    let alerts = body.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "high_priority");
    assert_eq!(alerts[0]["post_id"], post_id);

    let (_, body) = get_json(app(pool), "/api/alerts").await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn watchlists_endpoint_returns_keywords(pool: PgPool) {
    seed_one_figure(&pool).await;

    let (status, body) = get_json(app(pool), "/api/watchlists").await;
    assert_eq!(status, StatusCode::OK);
    let watchlists = body.as_array().unwrap();
    assert_eq!(watchlists.len(), 1);
    assert_eq!(watchlists[0]["name"], "fed");
    assert_eq!(watchlists[0]["keywords"], serde_json::json!(["rates", "inflation"]));
}
