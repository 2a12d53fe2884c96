use thiserror::Error;

/// Errors from resolving a file path into a [`RomIdentity`](crate::RomIdentity).
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// The file could not be opened or stat'ed.
    #[error("unreadable file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not something a provider can identify.
    #[error("unrecognized file {path}: {reason}")]
    Unrecognized { path: String, reason: String },
}

impl IdentifyError {
    pub fn unrecognized(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unrecognized {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by a [`MetadataProvider`](crate::MetadataProvider).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Definitive miss: the provider has no entry for this file.
    #[error("game not found")]
    NotFound,

    /// Network failure, timeout, 5xx or an unparsable response.
    #[error("transient provider error: {0}")]
    Transient(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("daily quota exceeded")]
    QuotaExceeded,

    /// The provider's resources were released by a profile switch or close.
    #[error("provider {0} is closed")]
    Closed(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Whether another attempt of the same lookup could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::RateLimited | Self::Io(_))
    }
}

/// Errors from materializing artwork to a local file.
#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Download(String),

    #[error("image decode failed: {0}")]
    Decode(String),

    /// Nothing to materialize.
    #[error("no artwork available")]
    Unavailable,
}

/// Profile construction failure, reported synchronously to `init`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown profile id {0}")]
    UnknownProfile(i32),

    #[error("missing configuration: {0}")]
    Missing(String),

    #[error("{resource} unavailable: {reason}")]
    Resource {
        resource: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub fn missing(msg: impl Into<String>) -> Self {
        Self::Missing(msg.into())
    }

    pub fn resource(resource: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Resource {
            resource,
            reason: reason.to_string(),
        }
    }
}
