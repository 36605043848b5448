use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod figures;

pub use app_config::{AppConfig, Environment, ResponseShape};
pub use config::{load_app_config, load_app_config_from_env};
pub use figures::{load_figures, FigureConfig, FiguresFile, WatchlistConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read figures file {path}: {source}")]
    FiguresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse figures file: {0}")]
    FiguresFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
