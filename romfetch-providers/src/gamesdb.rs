//! TheGamesDB (thegamesdb.net) provider for the open-db profile.
//!
//! Files are matched by cleaned title; a hash seen before goes straight to
//! `Games/ByGameID`. Genre ids are resolved with a genre table fetched once
//! per client. The client is shared with the id-table sources in
//! [`crate::idtable`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use romfetch_core::{
    Artwork, ArtworkVariant, MetadataProvider, Platform, ProviderError, ProviderGame, RomIdentity,
};
use romfetch_lib::{CachedIdentity, HashCache, RomHasher};
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::OutboundGate;

const BASE_URL: &str = "https://api.thegamesdb.net/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const GAME_FIELDS: &str = "players,genres,overview";

#[derive(Debug, Deserialize)]
struct GamesResponse {
    data: GamesData,
    #[serde(default)]
    include: Option<Include>,
    #[serde(default)]
    remaining_monthly_allowance: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GamesData {
    #[serde(default)]
    games: Vec<TgdbGame>,
}

#[derive(Debug, Deserialize)]
struct TgdbGame {
    id: u64,
    game_title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    players: Option<u32>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genres: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
struct Include {
    #[serde(default)]
    boxart: Option<BoxartInclude>,
}

#[derive(Debug, Deserialize)]
struct BoxartInclude {
    base_url: BaseUrls,
    #[serde(default)]
    data: HashMap<String, Vec<BoxartImage>>,
}

#[derive(Debug, Deserialize)]
struct BaseUrls {
    original: String,
}

#[derive(Debug, Deserialize)]
struct BoxartImage {
    #[serde(default)]
    side: Option<String>,
    filename: String,
}

#[derive(Debug, Deserialize)]
struct GenresResponse {
    data: GenresData,
}

#[derive(Debug, Deserialize)]
struct GenresData {
    genres: HashMap<String, GenreEntry>,
}

#[derive(Debug, Deserialize)]
struct GenreEntry {
    id: u64,
    name: String,
}

/// HTTP access to TheGamesDB, shared by every open-db provider of a
/// profile so they draw on one set of permits and one genre table.
pub struct TheGamesDbClient {
    http: reqwest::Client,
    api_key: String,
    gate: OutboundGate,
    genres: OnceCell<HashMap<u64, String>>,
}

impl TheGamesDbClient {
    pub fn new(api_key: String, gate: OutboundGate) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key,
            gate,
            genres: OnceCell::new(),
        })
    }

    /// Refuse further requests. Idempotent.
    pub fn close(&self) {
        self.gate.close();
    }

    async fn get_text(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<String, ProviderError> {
        let _permit = self.gate.acquire().await?;
        let resp = self
            .http
            .get(format!("{}/{}", BASE_URL, endpoint))
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::transient(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::InvalidCredentials(format!(
                "TheGamesDB rejected the API key (HTTP {})",
                status.as_u16()
            )));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::transient(format!(
                "TheGamesDB returned HTTP {}",
                status.as_u16()
            )));
        }
        resp.text()
            .await
            .map_err(|e| ProviderError::transient(e.to_string()))
    }

    async fn fetch_games(
        &self,
        endpoint: &str,
        mut query: Vec<(&str, String)>,
    ) -> Result<GamesResponse, ProviderError> {
        query.push(("fields", GAME_FIELDS.to_string()));
        query.push(("include", "boxart".to_string()));
        let text = self.get_text(endpoint, &query).await?;
        let response: GamesResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::transient(format!("bad TheGamesDB response: {e}")))?;
        if let Some(left) = response.remaining_monthly_allowance {
            log::debug!("thegamesdb allowance left: {}", left);
            if left <= 0 {
                return Err(ProviderError::QuotaExceeded);
            }
        }
        Ok(response)
    }

    async fn genre_names(&self) -> Result<&HashMap<u64, String>, ProviderError> {
        self.genres
            .get_or_try_init(|| async {
                let text = self.get_text("Genres", &[]).await?;
                let response: GenresResponse = serde_json::from_str(&text)
                    .map_err(|e| ProviderError::transient(format!("bad genre list: {e}")))?;
                Ok::<_, ProviderError>(
                    response
                        .data
                        .genres
                        .into_values()
                        .map(|g| (g.id, g.name))
                        .collect(),
                )
            })
            .await
    }

    /// Fetch one game by its TheGamesDB id, credited to `source`.
    pub async fn game_by_id(
        &self,
        id: u64,
        source: &'static str,
    ) -> Result<ProviderGame, ProviderError> {
        let response = self.fetch_games("Games/ByGameID", vec![("id", id.to_string())]).await?;
        let index = response
            .data
            .games
            .iter()
            .position(|g| g.id == id)
            .ok_or(ProviderError::NotFound)?;
        self.provider_game(&response, index, source).await
    }

    async fn provider_game(
        &self,
        response: &GamesResponse,
        index: usize,
        source: &'static str,
    ) -> Result<ProviderGame, ProviderError> {
        let chosen = &response.data.games[index];
        let genre = match &chosen.genres {
            Some(ids) if !ids.is_empty() => {
                let names = self.genre_names().await?;
                ids.iter()
                    .filter_map(|id| names.get(id).map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
            _ => String::new(),
        };

        let mut game = ProviderGame {
            id: chosen.id.to_string(),
            source,
            title: chosen.game_title.clone(),
            overview: chosen.overview.clone().unwrap_or_default(),
            release_date: chosen.release_date.clone().unwrap_or_default(),
            genre,
            players: chosen.players.unwrap_or(0),
            ..Default::default()
        };
        if let Some(url) = front_boxart(response.include.as_ref(), chosen.id) {
            game = game.with_artwork(ArtworkVariant::BoxArt, Artwork::Http(url));
        }
        Ok(game)
    }
}

pub struct TheGamesDbProvider {
    client: Arc<TheGamesDbClient>,
    hasher: Arc<RomHasher>,
    cache: Arc<HashCache>,
}

impl TheGamesDbProvider {
    pub const NAME: &'static str = "thegamesdb";

    pub fn new(
        client: Arc<TheGamesDbClient>,
        hasher: Arc<RomHasher>,
        cache: Arc<HashCache>,
    ) -> Self {
        Self {
            client,
            hasher,
            cache,
        }
    }
}

#[async_trait]
impl MetadataProvider for TheGamesDbProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn close(&self) {
        self.client.close();
    }

    async fn lookup(&self, rom: &RomIdentity) -> Result<ProviderGame, ProviderError> {
        let hashes = self.hasher.hash_file_async(rom.path()).await?;
        let cached = self.cache.get(Self::NAME, &hashes.sha1);

        let (response, wanted) = match &cached {
            Some(hit) => {
                let query = vec![("id", hit.game_id.clone())];
                let response = self.client.fetch_games("Games/ByGameID", query).await?;
                (response, hit.title.clone())
            }
            None => {
                let title = clean_title(&rom.stem);
                if title.is_empty() {
                    return Err(ProviderError::NotFound);
                }
                let mut query = vec![("name", title.clone())];
                if let Some(id) = rom.platform.map(platform_id) {
                    query.push(("filter[platform]", id.to_string()));
                }
                let response = self.client.fetch_games("Games/ByGameName", query).await?;
                (response, title)
            }
        };

        let Some(index) = pick_game(&response.data.games, &wanted) else {
            return Err(ProviderError::NotFound);
        };
        let game = self.client.provider_game(&response, index, Self::NAME).await?;

        if cached.is_none() {
            let identity = CachedIdentity {
                game_id: game.id.clone(),
                title: game.title.clone(),
            };
            if let Err(e) = self.cache.insert_async(Self::NAME, &hashes.sha1, identity).await {
                log::warn!("failed to record {} in hash cache: {}", rom.file_name, e);
            }
        }
        Ok(game)
    }
}

/// Strip dump tags and region/revision groups from a file stem:
/// `"Super Mario World (USA) [!]"` → `"Super Mario World"`.
pub fn clean_title(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut depth = 0usize;
    for c in stem.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(if c == '_' { ' ' } else { c }),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Exact (case-insensitive) title match, else the first result.
fn pick_game(games: &[TgdbGame], title: &str) -> Option<usize> {
    if games.is_empty() {
        return None;
    }
    Some(
        games
            .iter()
            .position(|g| g.game_title.eq_ignore_ascii_case(title))
            .unwrap_or(0),
    )
}

fn front_boxart(include: Option<&Include>, game_id: u64) -> Option<String> {
    let boxart = include?.boxart.as_ref()?;
    let images = boxart.data.get(&game_id.to_string())?;
    let image = images
        .iter()
        .find(|i| i.side.as_deref() == Some("front"))
        .or_else(|| images.first())?;
    Some(format!("{}{}", boxart.base_url.original, image.filename))
}

/// TheGamesDB platform id.
pub fn platform_id(platform: Platform) -> u32 {
    match platform {
        Platform::Nes => 7,
        Platform::Snes => 6,
        Platform::N64 => 3,
        Platform::GameBoy => 4,
        Platform::GameBoyColor => 41,
        Platform::Gba => 5,
        Platform::Ds => 8,
        Platform::GameCube => 2,
        Platform::Sg1000 => 4949,
        Platform::MasterSystem => 35,
        Platform::Genesis => 18,
        Platform::SegaCd => 21,
        Platform::Sega32x => 33,
        Platform::Saturn => 17,
        Platform::Dreamcast => 16,
        Platform::GameGear => 20,
        Platform::Ps1 => 10,
        Platform::Ps2 => 11,
        Platform::Psp => 13,
        Platform::TurboGrafx16 => 34,
        Platform::Atari2600 => 22,
        Platform::Atari7800 => 27,
        Platform::Lynx => 4924,
        Platform::NeoGeoPocket => 4922,
        Platform::WonderSwan => 4925,
        Platform::ColecoVision => 31,
        Platform::Msx => 4929,
        Platform::Arcade => 23,
        Platform::NeoGeo => 24,
    }
}

#[cfg(test)]
#[path = "tests/gamesdb_tests.rs"]
mod tests;
