use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use figwatch_analysis::{AnalyzerConfig, LlmAnalyzer, PostAnalyzer};
use figwatch_fetch::{ApiTimelineSource, PostSource, SourceConfig};
use figwatch_notify::{BroadcastHub, LogNotifier, Notifier, WebhookNotifier};
use figwatch_server::{build_app, AppState, Poller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = figwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = figwatch_db::PoolConfig::from_app_config(&config);
    let pool = figwatch_db::connect_pool(&config.database_url, pool_config).await?;
    figwatch_db::run_migrations(&pool).await?;

    let figures_path = config.figures_path.as_path();
    if figures_path.exists() {
        let figures_file = figwatch_core::load_figures(figures_path)?;
        let seeded = figwatch_db::seed_from_config(&pool, &figures_file).await?;
        tracing::info!(figures = seeded, path = %figures_path.display(), "seeded monitored figures");
    } else {
        tracing::warn!(path = %figures_path.display(), "figures config not found, skipping seed");
    }

    let source: Arc<dyn PostSource> =
        Arc::new(ApiTimelineSource::new(SourceConfig::from_app_config(&config))?);
    let analyzer: Arc<dyn PostAnalyzer> =
        Arc::new(LlmAnalyzer::new(&AnalyzerConfig::from_app_config(&config))?);
    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())?),
        None => Arc::new(LogNotifier),
    };
    let hub = Arc::new(BroadcastHub::new());

    let poller = Poller::new(
        pool.clone(),
        source,
        analyzer,
        notifier,
        Arc::clone(&hub),
        Duration::from_secs(config.poll_interval_secs),
        config.alert_threshold,
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_handle = tokio::spawn(poller.run(shutdown_rx));

    let app = build_app(AppState { pool, hub });
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    poller_handle.await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
