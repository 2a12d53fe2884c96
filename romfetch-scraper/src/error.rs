use romfetch_core::{IdentifyError, ProviderError};

use crate::store::FailureKind;

/// Why a single scrape ended without a result.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Identify(#[from] IdentifyError),

    /// Arcade lookups only accept archive files.
    #[error("unsupported format '.{extension}' for an arcade lookup")]
    UnsupportedFormat { extension: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no active profile")]
    NoProfile,

    #[error("scrape task failed: {0}")]
    Task(String),
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Identify(IdentifyError::Unreadable { .. }) => FailureKind::Unreadable,
            Self::Identify(IdentifyError::Unrecognized { .. }) => FailureKind::Unrecognized,
            Self::UnsupportedFormat { .. } => FailureKind::UnsupportedFormat,
            Self::Provider(_) => FailureKind::Provider,
            Self::NoProfile => FailureKind::NoProfile,
            Self::Task(_) => FailureKind::Internal,
        }
    }
}
