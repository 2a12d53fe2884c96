use romfetch_core::ProviderError;

/// Errors from talking to the ScreenScraper API.
#[derive(Debug, thiserror::Error)]
pub enum ScreenScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by ScreenScraper API")]
    RateLimit,

    #[error("daily quota exceeded")]
    QuotaExceeded,

    #[error("game not found in ScreenScraper database")]
    NotFound,

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("ScreenScraper server is closed: {0}")]
    ServerClosed(String),

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("API error: {0}")]
    Api(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ScreenScraperError> for ProviderError {
    fn from(err: ScreenScraperError) -> Self {
        match err {
            ScreenScraperError::NotFound => ProviderError::NotFound,
            ScreenScraperError::RateLimit => ProviderError::RateLimited,
            ScreenScraperError::QuotaExceeded => ProviderError::QuotaExceeded,
            ScreenScraperError::InvalidCredentials(msg) => ProviderError::InvalidCredentials(msg),
            ScreenScraperError::Config(msg) => ProviderError::Other(msg),
            ScreenScraperError::Http(_)
            | ScreenScraperError::ServerClosed(_)
            | ScreenScraperError::Server { .. }
            | ScreenScraperError::Api(_) => ProviderError::Transient(err.to_string()),
        }
    }
}
