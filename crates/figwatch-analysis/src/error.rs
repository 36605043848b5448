use thiserror::Error;

/// Internal backend failures. Never escapes `analyze` — absorbed into
/// default-valued results at the analyzer boundary.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("empty completion from backend")]
    EmptyCompletion,
}
