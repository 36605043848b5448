use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// A monitored public figure as declared in the figures YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FigureConfig {
    pub name: String,
    pub title: Option<String>,
    /// Platform the account lives on: `twitter`, `truth_social`, ...
    pub platform: String,
    /// Platform-native account identifier (handle or numeric id).
    pub platform_id: String,
    /// Grouping tag: `political`, `industry_leader`, ...
    pub category: Option<String>,
    /// Names of watchlists this figure belongs to.
    #[serde(default)]
    pub watchlists: Vec<String>,
}

/// A named grouping of figures with keyword filters, read-only to the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistConfig {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FiguresFile {
    pub figures: Vec<FigureConfig>,
    #[serde(default)]
    pub watchlists: Vec<WatchlistConfig>,
}

/// Load and validate the figures configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_figures(path: &Path) -> Result<FiguresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FiguresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let figures_file: FiguresFile = serde_yaml::from_str(&content)?;

    validate_figures(&figures_file)?;

    Ok(figures_file)
}

fn validate_figures(file: &FiguresFile) -> Result<(), ConfigError> {
    let watchlist_names: HashSet<&str> = file.watchlists.iter().map(|w| w.name.as_str()).collect();

    if watchlist_names.len() != file.watchlists.len() {
        return Err(ConfigError::Validation(
            "watchlist names must be unique".to_string(),
        ));
    }

    let mut seen_identities = HashSet::new();

    for figure in &file.figures {
        if figure.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "figure name must be non-empty".to_string(),
            ));
        }

        if figure.platform_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "figure '{}' has an empty platform_id",
                figure.name
            )));
        }

        if !seen_identities.insert((figure.platform.as_str(), figure.platform_id.as_str())) {
            return Err(ConfigError::Validation(format!(
                "duplicate figure identity: {}/{}",
                figure.platform, figure.platform_id
            )));
        }

        for wl in &figure.watchlists {
            if !watchlist_names.contains(wl.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "figure '{}' references unknown watchlist '{wl}'",
                    figure.name
                )));
            }
        }
    }

    Ok(())
}
