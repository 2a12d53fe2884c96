//! Secondary open-db sources: ScummVM games, Daphne laserdisc games and
//! Neo Geo romsets.
//!
//! None of these have content TheGamesDB can match by title, so each one
//! maps the file stem to a TheGamesDB game id through a local table and then
//! fetches that game by id. The table is a TOML file with one section per
//! source, keys compared case-insensitively:
//!
//! ```toml
//! [scummvm]
//! monkey = 1234
//!
//! [neogeo]
//! mslug = 5678
//! ```

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use romfetch_core::{MetadataProvider, ProviderError, ProviderGame, RomIdentity};
use thiserror::Error;

use crate::gamesdb::TheGamesDbClient;

#[derive(Debug, Error)]
pub enum IdTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid id table {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSource {
    ScummVm,
    Daphne,
    NeoGeo,
}

impl IdSource {
    /// Registration order behind TheGamesDB.
    pub const ALL: [IdSource; 3] = [IdSource::ScummVm, IdSource::Daphne, IdSource::NeoGeo];

    pub fn name(self) -> &'static str {
        match self {
            IdSource::ScummVm => "scummvm",
            IdSource::Daphne => "daphne",
            IdSource::NeoGeo => "neogeo",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            IdSource::ScummVm => &["svm", "scummvm"],
            IdSource::Daphne => &["daphne"],
            IdSource::NeoGeo => &["zip"],
        }
    }

    fn claims(self, rom: &RomIdentity) -> bool {
        self.extensions().contains(&rom.extension.as_str())
    }
}

/// Stem → TheGamesDB id, per source.
#[derive(Debug, Default)]
pub struct GameIdTable {
    sources: HashMap<String, HashMap<String, u64>>,
}

impl GameIdTable {
    /// Load from `path`; a missing file gives an empty table.
    pub fn load(path: &Path) -> Result<Self, IdTableError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no id table at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let table = Self::parse(&contents).map_err(|source| IdTableError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("loaded {} ids from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let raw: HashMap<String, HashMap<String, u64>> = toml::from_str(contents)?;
        let sources = raw
            .into_iter()
            .map(|(source, ids)| {
                let ids = ids.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();
                (source.to_lowercase(), ids)
            })
            .collect();
        Ok(Self { sources })
    }

    pub fn get(&self, source: IdSource, stem: &str) -> Option<u64> {
        self.sources
            .get(source.name())?
            .get(&stem.trim().to_lowercase())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.sources.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One id-table source backed by the profile's TheGamesDB client.
pub struct IdTableProvider {
    source: IdSource,
    client: Arc<TheGamesDbClient>,
    table: Arc<GameIdTable>,
}

impl IdTableProvider {
    pub fn new(source: IdSource, client: Arc<TheGamesDbClient>, table: Arc<GameIdTable>) -> Self {
        Self {
            source,
            client,
            table,
        }
    }

    /// The game id for `rom`, if this source handles its extension and the
    /// table knows its stem.
    pub fn resolve(&self, rom: &RomIdentity) -> Option<u64> {
        if !self.source.claims(rom) {
            return None;
        }
        self.table.get(self.source, &rom.stem)
    }
}

#[async_trait]
impl MetadataProvider for IdTableProvider {
    fn name(&self) -> &'static str {
        self.source.name()
    }

    fn close(&self) {
        self.client.close();
    }

    async fn lookup(&self, rom: &RomIdentity) -> Result<ProviderGame, ProviderError> {
        let Some(id) = self.resolve(rom) else {
            return Err(ProviderError::NotFound);
        };
        log::debug!("{}: {} is game id {}", self.name(), rom.file_name, id);
        self.client.game_by_id(id, self.source.name()).await
    }
}

#[cfg(test)]
#[path = "tests/idtable_tests.rs"]
mod tests;
