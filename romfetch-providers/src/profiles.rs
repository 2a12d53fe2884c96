//! Assembles the provider set for each profile from the settings file.

use std::sync::Arc;
use std::time::Duration;

use romfetch_core::{ConfigError, MetadataProvider, Profile, ProfileFactory, ProviderSet};
use romfetch_lib::{HashCache, RomHasher, Settings};

use crate::gamesdb::{TheGamesDbClient, TheGamesDbProvider};
use crate::gate::OutboundGate;
use crate::idtable::{GameIdTable, IdSource, IdTableProvider};
use crate::mame::MameDbProvider;
use crate::screenscraper::{
    Credentials, ScreenScraperArcadeProvider, ScreenScraperClient, ScreenScraperProvider,
};
use crate::Preferences;

/// One outstanding ScreenScraper request per profile.
const SCREENSCRAPER_PERMITS: usize = 1;
const THEGAMESDB_PERMITS: usize = 2;

pub struct DefaultProfileFactory {
    settings: Settings,
}

impl DefaultProfileFactory {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn gate(&self, permits: usize) -> OutboundGate {
        OutboundGate::new(
            permits,
            Duration::from_secs(self.settings.permit_timeout_secs),
        )
    }

    /// Hasher for one profile, plus the process-wide hash cache every
    /// profile shares.
    fn shared(&self) -> Result<(Arc<RomHasher>, Arc<HashCache>), ConfigError> {
        let cache = HashCache::shared(&self.settings.cache_dir)
            .map_err(|e| ConfigError::resource("hash cache", e))?;
        Ok((Arc::new(RomHasher::new()), cache))
    }

    fn screenscraper(&self) -> Result<ProviderSet, ConfigError> {
        let (hasher, cache) = self.shared()?;
        let creds = Credentials::load().map_err(|e| ConfigError::missing(e.to_string()))?;
        let client = Arc::new(
            ScreenScraperClient::new(creds)
                .map_err(|e| ConfigError::resource("screenscraper client", e))?,
        );
        let gate = self.gate(SCREENSCRAPER_PERMITS);
        let prefs = Preferences::from_settings(&self.settings);

        let console: Arc<dyn MetadataProvider> = Arc::new(ScreenScraperProvider::new(
            Arc::clone(&client),
            gate.clone(),
            hasher,
            cache,
            prefs.clone(),
        ));
        let arcade: Arc<dyn MetadataProvider> =
            Arc::new(ScreenScraperArcadeProvider::new(client, gate, prefs));
        Ok(ProviderSet::new(vec![console], vec![arcade]))
    }

    fn open_db(&self) -> Result<ProviderSet, ConfigError> {
        let api_key = self
            .settings
            .thegamesdb
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("[thegamesdb] api_key in settings.toml"))?;
        let (hasher, cache) = self.shared()?;
        let table = GameIdTable::load(&self.settings.id_table_path())
            .map_err(|e| ConfigError::resource("thegamesdb id table", e))?;
        let client = TheGamesDbClient::new(api_key, self.gate(THEGAMESDB_PERMITS))
            .map_err(|e| ConfigError::resource("thegamesdb client", e))?;
        let (client, table) = (Arc::new(client), Arc::new(table));

        let gamesdb: Arc<dyn MetadataProvider> =
            Arc::new(TheGamesDbProvider::new(Arc::clone(&client), hasher, cache));
        let mut console = vec![gamesdb];
        for source in IdSource::ALL {
            console.push(Arc::new(IdTableProvider::new(
                source,
                Arc::clone(&client),
                Arc::clone(&table),
            )));
        }
        Ok(ProviderSet::new(console, vec![]))
    }

    fn arcade_db(&self) -> Result<ProviderSet, ConfigError> {
        let path = self.settings.mame_db_path();
        let provider =
            MameDbProvider::open(&path).map_err(|e| ConfigError::resource("MAME database", e))?;

        let arcade: Arc<dyn MetadataProvider> = Arc::new(provider);
        Ok(ProviderSet::new(vec![], vec![arcade]))
    }
}

impl ProfileFactory for DefaultProfileFactory {
    fn build(&self, profile: Profile) -> Result<ProviderSet, ConfigError> {
        log::info!("building provider set for profile {}", profile);
        let set = match profile {
            Profile::ScreenScraper => self.screenscraper(),
            Profile::OpenDb => self.open_db(),
            Profile::ArcadeDb => self.arcade_db(),
        }?;
        log::debug!("profile {}: {:?}", profile, set);
        Ok(set)
    }
}

#[cfg(test)]
#[path = "tests/profiles_tests.rs"]
mod tests;
