//! Post sources for figwatch.
//!
//! Fetches timelines of monitored accounts through a hosted scraping API,
//! with a bounded retry budget and an optional one-shot fallback to the
//! public syndication page when the API is down. Malformed items are
//! skipped; transient failure yields an empty batch, never an error.

pub mod client;
pub mod error;
pub mod source;
pub mod types;

mod parse;
mod parse_graphql;
mod scrape;

pub use client::{ApiTimelineSource, SourceConfig};
pub use error::FetchError;
pub use source::PostSource;
pub use types::{PostMetrics, RawPost, UserProfile};
