//! Market-relevance analysis of fetched posts.
//!
//! Two independent inference backends: a chat-completion model scores impact
//! and sentiment (issued concurrently), and a text-generation model produces
//! summary, tags, and context (sequential, shared backend). `analyze` never
//! fails — every backend failure is absorbed into safe defaults and logged.

pub mod analyzer;
pub mod error;
pub mod types;
pub mod vocab;

mod llm;
mod textgen;

pub use analyzer::{LlmAnalyzer, PostAnalyzer};
pub use error::AnalysisError;
pub use types::{AnalysisInput, AnalyzerConfig, PostAnalysis, Sentiment};
pub use vocab::{filter_market_tags, MARKET_TAGS};
