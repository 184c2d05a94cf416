use serde::{Deserialize, Serialize};

/// Connection settings for the OpenAI-compatible narrative endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub base_url: String,
    pub api_key: String,
    pub model_name: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
    pub enabled: bool,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model_name: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_secs: 120,
            enabled: true,
        }
    }
}

/// Analyzer configuration, assembled from environment variables.
/// Every field has a working default; a missing variable never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    #[serde(default)]
    pub news_api_key: Option<String>,
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default = "default_news_interval")]
    pub news_update_interval_secs: u64,
    #[serde(default = "default_market_interval")]
    pub market_update_interval_secs: u64,
    #[serde(default = "default_max_articles")]
    pub max_news_articles: usize,
    #[serde(default = "default_max_symbols")]
    pub max_market_symbols: usize,
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: f64,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_news_interval() -> u64 { 300 }
fn default_market_interval() -> u64 { 60 }
fn default_max_articles() -> usize { 50 }
fn default_max_symbols() -> usize { 20 }
fn default_risk_threshold() -> f64 { 0.7 }
fn default_confidence_threshold() -> f64 { 0.8 }
fn default_log_level() -> String { "info".to_string() }

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            news_api_key: None,
            narrative: NarrativeConfig::default(),
            news_update_interval_secs: default_news_interval(),
            market_update_interval_secs: default_market_interval(),
            max_news_articles: default_max_articles(),
            max_market_symbols: default_max_symbols(),
            risk_threshold: default_risk_threshold(),
            confidence_threshold: default_confidence_threshold(),
            log_level: default_log_level(),
        }
    }
}

impl AnalyzerSettings {
    /// Build settings from the process environment.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        settings.news_api_key = env_nonempty("NEWS_API_KEY");

        if let Some(key) = env_nonempty("OPENAI_API_KEY") {
            settings.narrative.api_key = key;
        } else {
            settings.narrative.enabled = false;
        }
        if let Some(url) = env_nonempty("OPENAI_BASE_URL") {
            settings.narrative.base_url = url;
        }
        if let Some(model) = env_nonempty("OPENAI_MODEL") {
            settings.narrative.model_name = model;
        }

        if let Some(v) = env_parse::<u64>("NEWS_UPDATE_INTERVAL") {
            settings.news_update_interval_secs = v;
        }
        if let Some(v) = env_parse::<u64>("MARKET_UPDATE_INTERVAL") {
            settings.market_update_interval_secs = v;
        }
        if let Some(v) = env_parse::<usize>("MAX_NEWS_ARTICLES") {
            settings.max_news_articles = v;
        }
        if let Some(v) = env_parse::<usize>("MAX_MARKET_SYMBOLS") {
            settings.max_market_symbols = v;
        }
        if let Some(v) = env_parse::<f64>("RISK_ASSESSMENT_THRESHOLD") {
            settings.risk_threshold = v;
        }
        if let Some(v) = env_parse::<f64>("CONFIDENCE_THRESHOLD") {
            settings.confidence_threshold = v;
        }
        if let Some(v) = env_nonempty("LOG_LEVEL") {
            settings.log_level = v.to_lowercase();
        }

        settings
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_nonempty(name).and_then(|v| v.parse().ok())
}
