use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ArtworkError;

/// Artwork reference attached to a provider's game.
///
/// Every variant can be materialized to a local file. The two remote
/// variants also have a URL that can be handed to the host as-is when
/// materialization is not requested or fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Artwork {
    #[default]
    None,
    /// A file already on disk (e.g. a local snapshot directory).
    LocalFile(PathBuf),
    /// Plain HTTP image URL.
    Http(String),
    /// ScreenScraper media URL, already carrying its resize parameters.
    ScreenScraper(String),
}

impl Artwork {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// URL that may be exposed to the host without a local copy.
    pub fn remote_url(&self) -> Option<&str> {
        match self {
            Self::Http(url) | Self::ScreenScraper(url) => Some(url),
            Self::None | Self::LocalFile(_) => None,
        }
    }
}

/// The kinds of artwork a provider may offer for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtworkVariant {
    /// Front box art
    BoxArt,
    Thumbnail,
    Medium,
    Screenshot,
}

impl ArtworkVariant {
    /// Arcade selection order: first variant present wins.
    pub const ARCADE_PRIORITY: [ArtworkVariant; 3] = [
        ArtworkVariant::Thumbnail,
        ArtworkVariant::Medium,
        ArtworkVariant::Screenshot,
    ];
}

/// Writes an [`Artwork`] to a local file, resized to fit `width`×`height`.
#[async_trait]
pub trait ArtworkSaver: Send + Sync {
    async fn save(
        &self,
        artwork: &Artwork,
        dest: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ArtworkError>;
}
