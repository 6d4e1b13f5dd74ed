//! Configuration for the briefing pipeline

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Symbols offered to clients when nothing else is configured
pub const DEFAULT_STOCK_OPTIONS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA"];

/// Settings for the generation model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Maximum tokens the model may generate
    pub max_tokens: usize,

    /// Sequences that end generation early
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "samantha-mistral-instruct-7b".to_string(),
            max_tokens: 32,
            stop_sequences: vec!["\n".to_string(), "?".to_string()],
        }
    }
}

/// Configuration for the briefing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Global news budget shared by all requested stocks
    pub max_news_entries: usize,

    /// Global financial-row budget shared by all requested stocks
    pub max_financial_entries: usize,

    /// Maximum live entries in the stock cache (and the ticker memo)
    pub cache_capacity: usize,

    /// Lifetime of a cached stock bundle
    pub cache_ttl: Duration,

    /// Capacity of the scraped-page memo
    pub page_cache_capacity: usize,

    /// Transport timeout for every outbound HTTP request
    pub request_timeout: Duration,

    /// Symbols a client may pick from
    pub stock_options: Vec<String>,

    /// Generation model settings
    pub generation: GenerationConfig,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            max_news_entries: 10,
            max_financial_entries: 20,
            cache_capacity: 128,
            cache_ttl: Duration::from_secs(300), // 5 minutes
            page_cache_capacity: 128,
            request_timeout: Duration::from_secs(30),
            stock_options: DEFAULT_STOCK_OPTIONS.iter().map(ToString::to_string).collect(),
            generation: GenerationConfig::default(),
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Apply `ADVISOR_*` and `OPENAI_MODEL` environment overrides
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(value) = env_parse::<usize>("ADVISOR_MAX_NEWS_ENTRIES")? {
            self.max_news_entries = value;
        }
        if let Some(value) = env_parse::<usize>("ADVISOR_MAX_FINANCIAL_ENTRIES")? {
            self.max_financial_entries = value;
        }
        if let Some(secs) = env_parse::<u64>("ADVISOR_CACHE_TTL_SECS")? {
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Ok(options) = std::env::var("ADVISOR_STOCK_OPTIONS") {
            self.stock_options = parse_symbol_list(&options);
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.generation.model = model;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(StockError::ConfigError(
                "cache_capacity must be greater than 0".to_string(),
            ));
        }

        if self.cache_ttl.is_zero() {
            return Err(StockError::ConfigError(
                "cache_ttl must be greater than 0".to_string(),
            ));
        }

        if self.page_cache_capacity == 0 {
            return Err(StockError::ConfigError(
                "page_cache_capacity must be greater than 0".to_string(),
            ));
        }

        if self.stock_options.is_empty() {
            return Err(StockError::ConfigError(
                "stock_options must not be empty".to_string(),
            ));
        }

        if self.generation.max_tokens == 0 {
            return Err(StockError::ConfigError(
                "generation.max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether `symbol` is one of the configured options
    pub fn is_stock_option(&self, symbol: &str) -> bool {
        self.stock_options.iter().any(|s| s == symbol)
    }
}

/// Split a comma/whitespace separated symbol list, dropping blanks
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StockError::ConfigError(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(None),
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    max_news_entries: Option<usize>,
    max_financial_entries: Option<usize>,
    cache_capacity: Option<usize>,
    cache_ttl: Option<Duration>,
    page_cache_capacity: Option<usize>,
    request_timeout: Option<Duration>,
    stock_options: Option<Vec<String>>,
    generation: Option<GenerationConfig>,
    from_env: bool,
}

impl StockConfigBuilder {
    /// Set the global news budget
    pub fn max_news_entries(mut self, entries: usize) -> Self {
        self.max_news_entries = Some(entries);
        self
    }

    /// Set the global financial-row budget
    pub fn max_financial_entries(mut self, entries: usize) -> Self {
        self.max_financial_entries = Some(entries);
        self
    }

    /// Set the stock cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Set the stock cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the scraped-page memo capacity
    pub fn page_cache_capacity(mut self, capacity: usize) -> Self {
        self.page_cache_capacity = Some(capacity);
        self
    }

    /// Set the HTTP request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the selectable symbols
    pub fn stock_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stock_options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Set the generation settings
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Apply environment overrides on top of the explicit settings
    pub fn with_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let mut config = StockConfig {
            max_news_entries: self.max_news_entries.unwrap_or(defaults.max_news_entries),
            max_financial_entries: self
                .max_financial_entries
                .unwrap_or(defaults.max_financial_entries),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            page_cache_capacity: self
                .page_cache_capacity
                .unwrap_or(defaults.page_cache_capacity),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            stock_options: self.stock_options.unwrap_or(defaults.stock_options),
            generation: self.generation.unwrap_or(defaults.generation),
        };

        if self.from_env {
            config = config.with_env()?;
        }

        config.validate()?;
        Ok(config)
    }
}
