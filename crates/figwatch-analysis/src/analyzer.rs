//! The relevance analyzer.
//!
//! `analyze` is infallible by contract: whatever the backends do — error,
//! time out, return garbage — the caller gets a fully populated
//! [`PostAnalysis`] with safe defaults, and the failure is logged here.

use async_trait::async_trait;
use tokio::join;

use crate::error::AnalysisError;
use crate::llm::ChatClient;
use crate::textgen::TextGenClient;
use crate::types::{AnalysisInput, AnalyzerConfig, PostAnalysis, Sentiment};
use crate::vocab::{filter_market_tags, MARKET_TAGS};

const DEFAULT_SCORE: f64 = 0.5;
const SENTIMENT_LABELS: [&str; 3] = ["positive", "negative", "neutral"];
const SUMMARY_MAX_CHARS: usize = 100;

/// Scores a post's market relevance.
#[async_trait]
pub trait PostAnalyzer: Send + Sync {
    /// Analyze one post. Never fails; defaults fill in for any backend
    /// failure.
    async fn analyze(&self, input: &AnalysisInput) -> PostAnalysis;
}

/// Analyzer backed by two independent inference services: a chat-completion
/// model for impact and sentiment, a text-generation model for summary,
/// tags, and context.
pub struct LlmAnalyzer {
    chat: ChatClient,
    textgen: TextGenClient,
}

impl LlmAnalyzer {
    /// Build both backend clients with the configured per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if either `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        let chat = ChatClient::new(
            &config.chat_base_url,
            &config.chat_api_key,
            &config.chat_model,
            config.request_timeout,
        )?;
        let textgen = TextGenClient::new(
            &config.textgen_base_url,
            &config.textgen_api_key,
            &config.textgen_model,
            config.request_timeout,
        )?;
        Ok(Self { chat, textgen })
    }

    async fn impact_score(&self, input: &AnalysisInput) -> f64 {
        let author = author_line(input);
        let prompt = format!(
            "Analyze the market impact of this post by {author}:\n{}\n\n\
             Rate the potential impact on financial markets from 0.0 (no impact) \
             to 1.0 (major impact). Respond with only a number between 0.0 and 1.0.",
            input.content
        );

        match self
            .chat
            .complete(
                "You are an expert in financial market analysis.",
                &prompt,
                10,
            )
            .await
        {
            Ok(completion) => parse_impact(&completion).unwrap_or_else(|| {
                tracing::warn!(
                    completion = completion.trim(),
                    "impact completion was not numeric, using default"
                );
                DEFAULT_SCORE
            }),
            Err(e) => {
                tracing::warn!(error = %e, "impact scoring failed, using default");
                DEFAULT_SCORE
            }
        }
    }

    async fn sentiment(&self, input: &AnalysisInput) -> Sentiment {
        let prompt = format!(
            "Analyze the sentiment of this text:\n{}\n\n\
             Respond with a JSON object containing 'label' (positive, negative, \
             or neutral) and 'score' (0.0 to 1.0). \
             Example: {{\"label\": \"positive\", \"score\": 0.8}}",
            input.content
        );

        match self
            .chat
            .complete("You are a sentiment analysis expert.", &prompt, 50)
            .await
        {
            Ok(completion) => parse_sentiment(&completion).unwrap_or_else(|| {
                tracing::warn!("sentiment completion was not parseable, using neutral");
                Sentiment::default()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "sentiment analysis failed, using neutral");
                Sentiment::default()
            }
        }
    }

    async fn summary(&self, input: &AnalysisInput) -> String {
        let prompt = format!("Summarize this text in 50 words or less: {}", input.content);

        match self.textgen.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "summary generation failed, truncating content");
                truncate_content(&input.content, SUMMARY_MAX_CHARS)
            }
        }
    }

    async fn tags(&self, input: &AnalysisInput) -> Vec<String> {
        let prompt = format!(
            "Analyze this post and identify relevant market-related tags from \
             these categories: {}. Return only the relevant tags as a \
             comma-separated list.\nPost: {}",
            MARKET_TAGS.join(", "),
            input.content
        );

        match self.textgen.generate(&prompt).await {
            Ok(text) => filter_market_tags(&text),
            Err(e) => {
                tracing::warn!(error = %e, "tag extraction failed, returning no tags");
                Vec::new()
            }
        }
    }

    async fn context(&self, input: &AnalysisInput) -> String {
        let author = author_line(input);
        let prompt = format!(
            "Provide relevant context for this post, considering the author's \
             role and the content:\nAuthor: {author}\nPost: {}\n\
             Include potential implications for financial markets.",
            input.content
        );

        match self.textgen.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "context generation failed, using fallback");
                fallback_context(input)
            }
        }
    }
}

#[async_trait]
impl PostAnalyzer for LlmAnalyzer {
    async fn analyze(&self, input: &AnalysisInput) -> PostAnalysis {
        // Impact and sentiment are independent; run them concurrently to
        // bound latency. Summary, tags, and context share the text-generation
        // backend and run after, sequentially.
        let (impact_score, sentiment) = join!(self.impact_score(input), self.sentiment(input));

        let summary = self.summary(input).await;
        let tags = self.tags(input).await;
        let context = self.context(input).await;

        PostAnalysis {
            sentiment,
            summary,
            tags,
            impact_score,
            context,
        }
    }
}

fn author_line(input: &AnalysisInput) -> String {
    match &input.author_title {
        Some(title) => format!("{} ({title})", input.author_name),
        None => input.author_name.clone(),
    }
}

/// Clamp a score to [0.0, 1.0].
fn clamp_unit(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Parse a bare float from a completion, clamped to [0.0, 1.0].
fn parse_impact(completion: &str) -> Option<f64> {
    completion.trim().parse::<f64>().ok().map(clamp_unit)
}

/// Parse a `{"label", "score"}` object from a completion.
///
/// Models sometimes wrap the JSON in prose or code fences, so the parse
/// falls back to the first `{`..`}` substring. Labels outside the fixed
/// vocabulary collapse to `neutral`.
fn parse_sentiment(completion: &str) -> Option<Sentiment> {
    #[derive(serde::Deserialize)]
    struct Raw {
        label: Option<String>,
        score: Option<f64>,
    }

    let trimmed = completion.trim();
    let raw: Raw = serde_json::from_str(trimmed)
        .or_else(|e| {
            let start = trimmed.find('{').ok_or(e)?;
            let end = trimmed.rfind('}').map(|i| i + 1).unwrap_or(trimmed.len());
            serde_json::from_str(&trimmed[start..end])
        })
        .ok()?;

    let label = raw
        .label
        .map(|l| l.to_lowercase())
        .filter(|l| SENTIMENT_LABELS.contains(&l.as_str()))
        .unwrap_or_else(|| "neutral".to_string());

    Some(Sentiment {
        label,
        score: clamp_unit(raw.score.unwrap_or(DEFAULT_SCORE)),
    })
}

/// Char-boundary-safe truncation with an ellipsis when content is cut.
fn truncate_content(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let mut truncated: String = content.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// `"Post by {author} on {date}"` — the context of last resort.
fn fallback_context(input: &AnalysisInput) -> String {
    match input.posted_at {
        Some(posted_at) => format!(
            "Post by {} on {}",
            input.author_name,
            posted_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => format!("Post by {}", input.author_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_is_clamped_to_unit_interval() {
        assert_eq!(parse_impact("1.7"), Some(1.0));
        assert_eq!(parse_impact("-0.3"), Some(0.0));
        assert_eq!(parse_impact(" 0.85 "), Some(0.85));
    }

    #[test]
    fn non_numeric_impact_is_none() {
        assert_eq!(parse_impact("very high"), None);
        assert_eq!(parse_impact(""), None);
    }

    #[test]
    fn sentiment_parses_plain_json() {
        let sentiment = parse_sentiment(r#"{"label": "positive", "score": 0.8}"#).unwrap();
        assert_eq!(sentiment.label, "positive");
        assert!((sentiment.score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn sentiment_parses_fenced_json() {
        let completion = "```json\n{\"label\": \"negative\", \"score\": 1.4}\n```";
        let sentiment = parse_sentiment(completion).unwrap();
        assert_eq!(sentiment.label, "negative");
        assert!((sentiment.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_label_collapses_to_neutral() {
        let sentiment = parse_sentiment(r#"{"label": "ecstatic", "score": 0.9}"#).unwrap();
        assert_eq!(sentiment.label, "neutral");
    }

    #[test]
    fn non_json_sentiment_is_none() {
        assert!(parse_sentiment("the text is quite upbeat").is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let short = truncate_content("short", 100);
        assert_eq!(short, "short");

        let long: String = "é".repeat(150);
        let truncated = truncate_content(&long, 100);
        assert_eq!(truncated.chars().count(), 103);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn fallback_context_includes_author_and_date() {
        let input = AnalysisInput {
            content: "text".to_string(),
            author_name: "Jerome Powell".to_string(),
            author_title: Some("Fed Chair".to_string()),
            posted_at: chrono::DateTime::parse_from_rfc3339("2025-06-07T10:00:00+00:00")
                .ok()
                .map(|dt| dt.with_timezone(&chrono::Utc)),
        };
        let context = fallback_context(&input);
        assert!(context.contains("Jerome Powell"));
        assert!(context.contains("2025-06-07"));
    }
}
