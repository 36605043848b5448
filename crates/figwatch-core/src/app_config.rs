use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Wire shape the timeline API responds with. Two upstream variants exist
/// and neither supersedes the other; the active one is chosen per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{"tweets": [{id, text, created_at, ...}]}`
    Flat,
    /// Nested `data.user.result.timeline.instructions[].entries[]` envelope.
    Graphql,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub figures_path: PathBuf,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub source_base_url: String,
    pub source_api_key: String,
    pub source_page_size: u32,
    pub source_max_retries: u32,
    pub source_retry_delay_secs: u64,
    pub source_request_timeout_secs: u64,
    pub source_response_shape: ResponseShape,
    pub source_use_page_fallback: bool,
    pub source_web_base_url: String,

    pub chat_base_url: String,
    pub chat_api_key: String,
    pub chat_model: String,
    pub textgen_base_url: String,
    pub textgen_api_key: String,
    pub textgen_model: String,
    pub analyzer_request_timeout_secs: u64,

    pub notify_webhook_url: Option<String>,

    pub poll_interval_secs: u64,
    pub alert_threshold: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("figures_path", &self.figures_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("source_base_url", &self.source_base_url)
            .field("source_api_key", &"[redacted]")
            .field("source_page_size", &self.source_page_size)
            .field("source_max_retries", &self.source_max_retries)
            .field("source_retry_delay_secs", &self.source_retry_delay_secs)
            .field(
                "source_request_timeout_secs",
                &self.source_request_timeout_secs,
            )
            .field("source_response_shape", &self.source_response_shape)
            .field("source_use_page_fallback", &self.source_use_page_fallback)
            .field("source_web_base_url", &self.source_web_base_url)
            .field("chat_base_url", &self.chat_base_url)
            .field("chat_api_key", &"[redacted]")
            .field("chat_model", &self.chat_model)
            .field("textgen_base_url", &self.textgen_base_url)
            .field("textgen_api_key", &"[redacted]")
            .field("textgen_model", &self.textgen_model)
            .field(
                "analyzer_request_timeout_secs",
                &self.analyzer_request_timeout_secs,
            )
            .field(
                "notify_webhook_url",
                &self.notify_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("alert_threshold", &self.alert_threshold)
            .finish()
    }
}
