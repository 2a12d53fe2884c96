//! Resolution of a single file against a provider set.
//!
//! ```text
//! identify ─┬─ error ──────────────────────────────► Err(Identify)
//!           ├─ arcade + not an archive ────────────► Err(UnsupportedFormat)
//!           └─ lookup (attempt 1..=4)
//!                ├─ found ──► record + artwork ────► Ok([record])
//!                ├─ no match ──────────────────────► Ok([])
//!                ├─ retryable error, attempts left ► lookup again
//!                └─ any other error ───────────────► Err(Provider)
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use romfetch_core::{
    Artwork, ArtworkSaver, ArtworkVariant, LookupOptions, Platform, ProviderGame, ProviderSet,
    RomIdentifier, RomIdentity, arcade_context,
};

use crate::document::GameRecord;
use crate::error::ScrapeError;

/// Lookup attempts per request, including the first.
pub const MAX_ATTEMPTS: u32 = 4;

/// Artwork is resized to fit this square.
pub const ARTWORK_SIZE: u32 = 400;

const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each later one.
    /// Zero retries immediately.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            backoff: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn with_backoff(backoff: Duration) -> Self {
        Self {
            backoff,
            ..Self::default()
        }
    }

    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        if self.backoff.is_zero() {
            return Duration::ZERO;
        }
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub path: PathBuf,
    pub platform_hint: String,
    /// Where to save artwork; `None` leaves remote artwork as a URL.
    pub image_dest: Option<PathBuf>,
}

impl ScrapeRequest {
    pub fn new(path: impl Into<PathBuf>, platform_hint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            platform_hint: platform_hint.into(),
            image_dest: None,
        }
    }

    pub fn with_image_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.image_dest = Some(dest.into());
        self
    }

    pub fn arcade(&self) -> bool {
        arcade_context(&self.platform_hint)
    }

    pub fn platform(&self) -> Option<Platform> {
        Platform::from_hint(&self.platform_hint)
    }
}

/// Artwork as it ends up in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    None,
    Local(PathBuf),
    Remote(String),
}

impl Materialized {
    fn apply(self, record: &mut GameRecord) {
        match self {
            Self::None => {}
            Self::Local(path) => record.image_path = path.to_string_lossy().into_owned(),
            Self::Remote(url) => record.image_url = url,
        }
    }
}

/// Save `artwork` to `dest` if one is given, falling back to its URL.
///
/// Local artwork with no destination, or a failed save of local artwork,
/// yields [`Materialized::None`].
pub async fn materialize(
    saver: &dyn ArtworkSaver,
    artwork: &Artwork,
    dest: Option<&Path>,
) -> Materialized {
    if artwork.is_none() {
        return Materialized::None;
    }
    if let Some(dest) = dest {
        match saver.save(artwork, dest, ARTWORK_SIZE, ARTWORK_SIZE).await {
            Ok(()) => return Materialized::Local(dest.to_path_buf()),
            Err(e) => log::warn!("could not save artwork to {}: {}", dest.display(), e),
        }
    }
    match artwork.remote_url() {
        Some(url) => Materialized::Remote(url.to_string()),
        None => Materialized::None,
    }
}

/// Box art for consoles; the first of thumbnail, medium, screenshot for arcade.
pub fn select_artwork(game: &ProviderGame, arcade: bool) -> Option<&Artwork> {
    if !arcade {
        return game.artwork(ArtworkVariant::BoxArt);
    }
    ArtworkVariant::ARCADE_PRIORITY
        .iter()
        .find_map(|variant| game.artwork(*variant))
}

pub fn format_players(players: u32) -> Option<String> {
    (players > 0).then(|| players.to_string())
}

/// Runs one resolution request end to end.
#[derive(Clone)]
pub struct Scraper {
    identifier: Arc<dyn RomIdentifier>,
    saver: Arc<dyn ArtworkSaver>,
    retry: RetryPolicy,
    lookup: LookupOptions,
}

impl Scraper {
    pub fn new(identifier: Arc<dyn RomIdentifier>, saver: Arc<dyn ArtworkSaver>) -> Self {
        Self {
            identifier,
            saver,
            retry: RetryPolicy::default(),
            lookup: LookupOptions::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_lookup(mut self, lookup: LookupOptions) -> Self {
        self.lookup = lookup;
        self
    }

    pub async fn scrape(
        &self,
        providers: &ProviderSet,
        request: &ScrapeRequest,
    ) -> Result<Vec<GameRecord>, ScrapeError> {
        let arcade = request.arcade();
        let rom = self.identify(request).await?;

        if arcade && !rom.is_arcade_archive() {
            return Err(ScrapeError::UnsupportedFormat {
                extension: rom.extension,
            });
        }

        let mut attempt = 1;
        let game = loop {
            match providers.lookup(&rom, arcade, self.lookup).await {
                Ok(Some(game)) => break game,
                Ok(None) => {
                    log::debug!("{}: no match", rom.file_name);
                    return Ok(Vec::new());
                }
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    log::warn!(
                        "{}: lookup attempt {}/{} failed: {}",
                        rom.file_name,
                        attempt,
                        self.retry.max_attempts,
                        e
                    );
                    let delay = self.retry.delay(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        log::info!("{}: matched '{}' via {}", rom.file_name, game.title, game.source);
        let record = self
            .build_record(&game, arcade, request.image_dest.as_deref())
            .await;
        Ok(vec![record])
    }

    async fn identify(&self, request: &ScrapeRequest) -> Result<RomIdentity, ScrapeError> {
        let identifier = Arc::clone(&self.identifier);
        let path = request.path.clone();
        let platform = request.platform();
        let identity = tokio::task::spawn_blocking(move || identifier.identify(&path, platform))
            .await
            .map_err(|e| ScrapeError::Task(e.to_string()))??;
        Ok(identity)
    }

    async fn build_record(
        &self,
        game: &ProviderGame,
        arcade: bool,
        image_dest: Option<&Path>,
    ) -> GameRecord {
        let mut record = GameRecord {
            title: game.title.clone(),
            overview: game.overview.clone(),
            rating: game.rating,
            release_date: game.release_date.clone(),
            developer: game.developer.clone(),
            publisher: game.publisher.clone(),
            genre: game.genre.clone(),
            players: format_players(game.players),
            crc_match: !game.not_found,
            ..Default::default()
        };
        if let Some(artwork) = select_artwork(game, arcade) {
            materialize(self.saver.as_ref(), artwork, image_dest)
                .await
                .apply(&mut record);
        }
        record
    }
}

#[cfg(test)]
#[path = "tests/scrape_tests.rs"]
mod tests;
