use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use romfetch_core::{
    Artwork, ArtworkVariant, MetadataProvider, ProviderError, ProviderGame, RomIdentity,
    parse_players,
};
use romfetch_lib::{CachedIdentity, HashCache, RomHasher};

use super::client::ScreenScraperClient;
use super::error::ScreenScraperError;
use super::systems;
use super::types::GameInfo;
use crate::{OutboundGate, Preferences};

/// Artwork edge length requested from the media CDN.
const MEDIA_MAX_SIZE: u32 = 400;

/// ScreenScraper media types behind each artwork variant.
const CONSOLE_MEDIA: &[(ArtworkVariant, &str)] = &[
    (ArtworkVariant::BoxArt, "box-2D"),
    (ArtworkVariant::Screenshot, "ss"),
];
const ARCADE_MEDIA: &[(ArtworkVariant, &str)] = &[
    (ArtworkVariant::Thumbnail, "sstitle"),
    (ArtworkVariant::Medium, "marquee"),
    (ArtworkVariant::Screenshot, "ss"),
];

/// Console lookups by content hash.
///
/// A previously identified hash is looked up directly by game id.
pub struct ScreenScraperProvider {
    client: Arc<ScreenScraperClient>,
    gate: OutboundGate,
    hasher: Arc<RomHasher>,
    cache: Arc<HashCache>,
    prefs: Preferences,
}

impl ScreenScraperProvider {
    pub const NAME: &'static str = "screenscraper";

    pub fn new(
        client: Arc<ScreenScraperClient>,
        gate: OutboundGate,
        hasher: Arc<RomHasher>,
        cache: Arc<HashCache>,
        prefs: Preferences,
    ) -> Self {
        Self {
            client,
            gate,
            hasher,
            cache,
            prefs,
        }
    }
}

#[async_trait]
impl MetadataProvider for ScreenScraperProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn close(&self) {
        self.gate.close();
    }

    async fn lookup(&self, rom: &RomIdentity) -> Result<ProviderGame, ProviderError> {
        let hashes = self.hasher.hash_file_async(rom.path()).await?;

        let mut params = HashMap::new();
        match self.cache.get(Self::NAME, &hashes.sha1) {
            Some(hit) => {
                log::debug!("{}: cached game id {}", rom.file_name, hit.game_id);
                params.insert("gameid", hit.game_id);
            }
            None => {
                params.insert("crc", hashes.crc32.to_uppercase());
                params.insert("md5", hashes.md5.clone());
                params.insert("sha1", hashes.sha1.clone());
                params.insert("romtype", "rom".to_string());
                params.insert("romnom", rom.file_name.clone());
                params.insert("romtaille", rom.size.to_string());
                if let Some(platform) = rom.platform {
                    params.insert("systemeid", systems::system_id(platform).to_string());
                }
            }
        }

        let response = {
            let _permit = self.gate.acquire().await?;
            self.client.lookup_game(params).await?
        };
        let info = response.response.jeu;

        let game = to_provider_game(&info, Self::NAME, &self.prefs, CONSOLE_MEDIA);
        let identity = CachedIdentity {
            game_id: info.id.clone(),
            title: game.title.clone(),
        };
        if let Err(e) = self.cache.insert_async(Self::NAME, &hashes.sha1, identity).await {
            log::warn!("failed to record {} in hash cache: {}", rom.file_name, e);
        }
        Ok(game)
    }
}

/// Arcade lookups by archive name against the arcade and Neo Geo systems.
pub struct ScreenScraperArcadeProvider {
    client: Arc<ScreenScraperClient>,
    gate: OutboundGate,
    prefs: Preferences,
}

impl ScreenScraperArcadeProvider {
    pub const NAME: &'static str = "screenscraper-arcade";

    pub fn new(client: Arc<ScreenScraperClient>, gate: OutboundGate, prefs: Preferences) -> Self {
        Self {
            client,
            gate,
            prefs,
        }
    }
}

#[async_trait]
impl MetadataProvider for ScreenScraperArcadeProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn close(&self) {
        self.gate.close();
    }

    async fn lookup(&self, rom: &RomIdentity) -> Result<ProviderGame, ProviderError> {
        for system in systems::arcade_system_ids(rom.platform) {
            let mut params = HashMap::new();
            params.insert("romtype", "rom".to_string());
            params.insert("romnom", rom.file_name.clone());
            params.insert("systemeid", system.to_string());

            let result = {
                let _permit = self.gate.acquire().await?;
                self.client.lookup_game(params).await
            };
            match result {
                Ok(response) => {
                    return Ok(to_provider_game(
                        &response.response.jeu,
                        Self::NAME,
                        &self.prefs,
                        ARCADE_MEDIA,
                    ));
                }
                Err(ScreenScraperError::NotFound) => {
                    log::debug!("{} not in system {}", rom.file_name, system);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ProviderError::NotFound)
    }
}

/// Convert a ScreenScraper game into a provider game.
pub(crate) fn to_provider_game(
    info: &GameInfo,
    source: &'static str,
    prefs: &Preferences,
    media: &[(ArtworkVariant, &str)],
) -> ProviderGame {
    let text = |t: Option<&super::types::IdText>| t.map(|t| t.text.clone()).unwrap_or_default();

    let mut game = ProviderGame {
        id: info.id.clone(),
        source,
        title: info
            .name_for_regions(&prefs.regions)
            .unwrap_or_default()
            .to_string(),
        overview: info
            .synopsis_for_languages(&prefs.languages)
            .unwrap_or_default()
            .to_string(),
        rating: info.rating_normalized().unwrap_or(0.0),
        release_date: info
            .date_for_regions(&prefs.regions)
            .unwrap_or_default()
            .to_string(),
        developer: text(info.developpeur.as_ref()),
        publisher: text(info.editeur.as_ref()),
        genre: info
            .genre_for_languages(&prefs.languages)
            .unwrap_or_default(),
        players: info
            .joueurs
            .as_ref()
            .map(|j| parse_players(&j.text))
            .unwrap_or(0),
        ..Default::default()
    };

    for &(variant, media_type) in media {
        if let Some(m) = info.media_for_regions(media_type, &prefs.regions) {
            game = game.with_artwork(variant, Artwork::ScreenScraper(sized_media_url(&m.url)));
        }
    }
    game
}

/// Ask the media CDN for a pre-shrunk image.
pub(crate) fn sized_media_url(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}maxwidth={MEDIA_MAX_SIZE}&maxheight={MEDIA_MAX_SIZE}")
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;
