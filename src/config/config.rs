use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::search_client::DEFAULT_MODEL;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Gemini model used for search
    pub model: String,

    /// Override the API endpoint (mainly for testing against a mock)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Suggested tickers shown on the idle screen
    pub hot_tickers: Vec<String>,

    /// Tagline under the title on the idle screen
    pub tagline: String,

    /// Maximum source citations rendered in the sources panel
    pub max_sources: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Keep session query history for Up/Down recall
    pub enable_history: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            request_timeout_secs: 30,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hot_tickers: ["AAPL", "NVDA", "TSLA", "MSFT", "AMZN"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tagline: "AI-powered US stock quotes, charts and analysis".to_string(),
            max_sources: 10,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            enable_history: true,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults when
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        crate::utils::app_paths::AppPaths::config_file()
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# MarketInsight Configuration File
# Location: ~/.config/market-insight/config.toml (Linux/macOS)
#           %APPDATA%\market-insight\config.toml (Windows)
#
# The Gemini API key is NOT stored here; set the GEMINI_API_KEY
# environment variable instead.

[api]
# Gemini model used for search
model = "gemini-2.0-flash"

# Per-request timeout in seconds
request_timeout_secs = 30

[display]
# Suggested tickers shown on the idle screen (press 1-5 to fill the input)
hot_tickers = ["AAPL", "NVDA", "TSLA", "MSFT", "AMZN"]

# Tagline under the title on the idle screen
tagline = "AI-powered US stock quotes, charts and analysis"

# Maximum source citations rendered in the sources panel
max_sources = 10

[behavior]
# Keep session query history for Up/Down recall (never written to disk)
enable_history = true
"#
        .to_string()
    }
}
