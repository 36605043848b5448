//! The background fetch-analyze-alert loop.
//!
//! One `Poller` owns the whole pipeline: pull timelines for every monitored
//! figure, dedup against the database, score new posts, persist, and fan out
//! alerts. Failures are isolated at the figure and post level so one bad
//! timeline never starves the rest of a cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use tokio::sync::watch;

use figwatch_analysis::{AnalysisInput, PostAnalyzer};
use figwatch_db::{FigureRow, NewAnalysis, NewPost};
use figwatch_fetch::{PostSource, RawPost};
use figwatch_notify::{format_message, BroadcastHub, Notifier, OutboundAlert};

const HIGH_PRIORITY: &str = "high_priority";

pub struct Poller {
    pool: PgPool,
    source: Arc<dyn PostSource>,
    analyzer: Arc<dyn PostAnalyzer>,
    notifier: Arc<dyn Notifier>,
    hub: Arc<BroadcastHub>,
    poll_interval: Duration,
    alert_threshold: f64,
}

impl Poller {
    #[must_use]
    pub fn new(
        pool: PgPool,
        source: Arc<dyn PostSource>,
        analyzer: Arc<dyn PostAnalyzer>,
        notifier: Arc<dyn Notifier>,
        hub: Arc<BroadcastHub>,
        poll_interval: Duration,
        alert_threshold: f64,
    ) -> Self {
        Self {
            pool,
            source,
            analyzer,
            notifier,
            hub,
            poll_interval,
            alert_threshold,
        }
    }

    /// Run cycles on a fixed interval until the shutdown channel fires.
    ///
    /// A cycle in flight finishes before the loop observes shutdown.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            "poller started"
        );

        loop {
            self.run_cycle().await;

            tokio::select! {
                () = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown.changed() => {
                    tracing::info!("poller shutting down");
                    break;
                }
            }
        }
    }

    /// One full pass over every monitored figure.
    pub async fn run_cycle(&self) {
        let figures = match figwatch_db::list_figures(&self.pool).await {
            Ok(figures) => figures,
            Err(e) => {
                tracing::error!(error = %e, "could not load monitored figures, skipping cycle");
                return;
            }
        };

        tracing::debug!(figures = figures.len(), "poll cycle started");

        for figure in &figures {
            if let Err(e) = self.process_figure(figure).await {
                tracing::error!(figure = figure.name, error = %e, "figure processing failed");
            }
        }
    }

    async fn process_figure(&self, figure: &FigureRow) -> anyhow::Result<()> {
        // Overlap the previous cycle's window; dedup absorbs refetches.
        let lookback = i64::try_from(self.poll_interval.as_secs().saturating_mul(2))
            .unwrap_or(i64::from(u32::MAX));
        let since = Utc::now() - chrono::Duration::seconds(lookback);

        let posts = self
            .source
            .fetch_posts(&figure.platform_id, Some(since))
            .await?;

        tracing::debug!(figure = figure.name, posts = posts.len(), "fetched timeline");

        for raw in &posts {
            if let Err(e) = self.process_post(figure, raw).await {
                tracing::error!(
                    figure = figure.name,
                    platform_post_id = raw.platform_post_id,
                    error = %e,
                    "post processing failed"
                );
            }
        }

        Ok(())
    }

    async fn process_post(&self, figure: &FigureRow, raw: &RawPost) -> anyhow::Result<()> {
        if figwatch_db::post_exists(&self.pool, &raw.platform_post_id).await? {
            return Ok(());
        }

        let post = figwatch_db::insert_post(
            &self.pool,
            &NewPost {
                platform_post_id: raw.platform_post_id.clone(),
                content: raw.content.clone(),
                figure_id: figure.id,
                posted_at: raw.posted_at,
                likes: i32::try_from(raw.metrics.likes).unwrap_or(i32::MAX),
                retweets: i32::try_from(raw.metrics.retweets).unwrap_or(i32::MAX),
                replies: i32::try_from(raw.metrics.replies).unwrap_or(i32::MAX),
            },
        )
        .await?;

        tracing::info!(figure = figure.name, post_id = post.id, "stored new post");

        let analysis = self
            .analyzer
            .analyze(&AnalysisInput {
                content: post.content.clone(),
                author_name: figure.name.clone(),
                author_title: figure.title.clone(),
                posted_at: post.posted_at,
            })
            .await;

        figwatch_db::set_impact_score(&self.pool, post.id, analysis.impact_score).await?;
        figwatch_db::insert_analysis(
            &self.pool,
            &NewAnalysis {
                post_id: post.id,
                sentiment_label: analysis.sentiment.label.clone(),
                sentiment_score: analysis.sentiment.score,
                summary: analysis.summary.clone(),
                context: analysis.context.clone(),
                tags: json!(analysis.tags),
            },
        )
        .await?;

        if analysis.impact_score >= self.alert_threshold {
            self.raise_alert(figure, &post.content, post.id).await?;
        }

        self.hub.broadcast(
            "new_post",
            json!({
                "id": post.id,
                "content": post.content,
                "author": figure.name,
                "impact_score": analysis.impact_score,
            }),
        );

        Ok(())
    }

    async fn raise_alert(
        &self,
        figure: &FigureRow,
        content: &str,
        post_id: i64,
    ) -> anyhow::Result<()> {
        let preview: String = content.chars().take(100).collect();
        let message = format!("High impact post from {}: {preview}...", figure.name);

        let alert =
            figwatch_db::insert_alert(&self.pool, post_id, HIGH_PRIORITY, &message).await?;
        tracing::info!(figure = figure.name, alert_id = alert.id, "high impact alert created");

        let outbound = OutboundAlert {
            id: alert.id,
            post_id: alert.post_id,
            alert_type: alert.alert_type.clone(),
            message: format_message(HIGH_PRIORITY, &figure.name, content),
        };
        if !self.notifier.notify(&outbound).await {
            tracing::warn!(alert_id = alert.id, "alert notification was not delivered");
        }

        self.hub.broadcast(
            "new_alert",
            json!({
                "id": alert.id,
                "message": alert.message,
                "alert_type": alert.alert_type,
            }),
        );

        Ok(())
    }
}
