//! Configuration for the citation graph server.

use std::path::PathBuf;
use std::time::Duration;

/// Server defaults.
pub mod defaults {
    use std::time::Duration;

    /// Dataset file loaded at start-up.
    pub const DATASET_PATH: &str = "data/papers.json";

    /// HTTP port.
    pub const PORT: u16 = 8080;

    /// Graph result cache TTL (10 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(600);

    /// Maximum number of cached graph results.
    pub const CACHE_MAX_SIZE: u64 = 256;

    /// Titles longer than this are truncated on the node label.
    pub const TITLE_MAX_CHARS: usize = 50;

    /// Maximum zoom when fitting the viewport after a filter.
    pub const FIT_MAX_ZOOM: f64 = 0.5;

    /// Padding around the fitted elements.
    pub const FIT_PADDING: f64 = 100.0;

    /// Per-request timeout for HTTP handlers.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Semantic Scholar API constants used by the dataset fetcher.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Rate limit delay between requests without API key (1s = 1 req/s).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(1);

    /// Rate limit delay between requests with API key (100ms = 10 req/s).
    pub const RATE_LIMIT_DELAY_WITH_KEY: Duration = Duration::from_millis(100);

    /// Response cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum response cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Limits for growing a dataset from a root paper.
pub mod fetch {
    /// Children expanded per paper and direction.
    pub const MAX_PER_LEVEL: usize = 10;

    /// Total fetches counted towards the citation direction.
    pub const MAX_CITATION_FETCHES: usize = 200;

    /// Total fetches counted towards the reference direction.
    pub const MAX_REFERENCE_FETCHES: usize = 200;
}

/// Paper field sets for API requests.
pub mod fields {
    /// Fields needed to build one level of the nested dataset.
    pub const TREE: &[&str] = &[
        "title",
        "year",
        "authors",
        "authors.name",
        "fieldsOfStudy",
        "isOpenAccess",
        "references",
        "references.paperId",
        "citations",
        "citations.paperId",
    ];
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nested paper tree to serve.
    pub dataset_path: PathBuf,

    /// Directory with the bundled diagram client (optional).
    pub static_dir: Option<PathBuf>,

    /// HTTP port.
    pub port: u16,

    /// Graph result cache TTL.
    pub cache_ttl: Duration,

    /// Maximum number of cached graph results.
    pub cache_max_size: u64,

    /// Title truncation on node labels.
    pub title_max_chars: usize,

    /// Maximum zoom for the fit action sent after filtering.
    pub fit_max_zoom: f64,

    /// Padding for the fit action sent after filtering.
    pub fit_padding: f64,

    /// Per-request timeout for HTTP handlers.
    pub request_timeout: Duration,
}

impl Config {
    /// Create a configuration serving the given dataset.
    #[must_use]
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            static_dir: None,
            port: defaults::PORT,
            cache_ttl: defaults::CACHE_TTL,
            cache_max_size: defaults::CACHE_MAX_SIZE,
            title_max_chars: defaults::TITLE_MAX_CHARS,
            fit_max_zoom: defaults::FIT_MAX_ZOOM,
            fit_padding: defaults::FIT_PADDING,
            request_timeout: defaults::REQUEST_TIMEOUT,
        }
    }

    /// Create a test configuration without result caching.
    #[must_use]
    pub fn for_testing(dataset_path: impl Into<PathBuf>) -> Self {
        Self { cache_ttl: Duration::from_secs(0), cache_max_size: 0, ..Self::new(dataset_path) }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let dataset_path = std::env::var("CITATION_GRAPH_DATASET")
            .unwrap_or_else(|_| defaults::DATASET_PATH.to_string());

        let mut config = Self::new(dataset_path);
        config.static_dir = std::env::var("CITATION_GRAPH_STATIC_DIR").ok().map(PathBuf::from);

        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse()?;
        }

        Ok(config)
    }

    /// Whether graph results are cached.
    #[must_use]
    pub const fn caches_results(&self) -> bool {
        self.cache_max_size > 0 && !self.cache_ttl.is_zero()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(defaults::DATASET_PATH)
    }
}

/// Semantic Scholar client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay before each request.
    pub rate_limit_delay: Duration,

    /// Response cache TTL.
    pub cache_ttl: Duration,

    /// Maximum response cache size.
    pub cache_max_size: u64,
}

impl ClientConfig {
    /// Create a new client configuration with optional API key.
    ///
    /// The rate limit delay is adjusted based on API key presence.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        let has_key = api_key.is_some();
        Self {
            api_key,
            graph_api_url: api::GRAPH_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: if has_key {
                api::RATE_LIMIT_DELAY_WITH_KEY
            } else {
                api::RATE_LIMIT_DELAY
            },
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
        }
    }

    /// Create a test configuration with a custom URL for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            graph_api_url: format!("{}/graph/v1", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            cache_ttl: Duration::from_secs(0),          // No caching in tests
            cache_max_size: 0,
        }
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}
