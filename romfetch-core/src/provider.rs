use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::game::ProviderGame;
use crate::identity::RomIdentity;

/// A source of game metadata (remote API or local database).
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short identifier used in logs and cache keys.
    fn name(&self) -> &'static str;

    /// Identify `rom` and return its metadata.
    ///
    /// A definitive miss is `Err(ProviderError::NotFound)`.
    async fn lookup(&self, rom: &RomIdentity) -> Result<ProviderGame, ProviderError>;

    /// Release stateful resources (open databases, file handles).
    fn close(&self) {}
}

/// Options for one provider-set lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions {
    /// Return a placeholder titled with the file stem when nobody matches.
    pub add_not_found: bool,
}

/// The ordered providers of one profile.
///
/// Order is priority: the first provider to identify a file wins.
#[derive(Default)]
pub struct ProviderSet {
    pub console: Vec<Arc<dyn MetadataProvider>>,
    pub arcade: Vec<Arc<dyn MetadataProvider>>,
}

impl ProviderSet {
    pub fn new(
        console: Vec<Arc<dyn MetadataProvider>>,
        arcade: Vec<Arc<dyn MetadataProvider>>,
    ) -> Self {
        Self { console, arcade }
    }

    pub fn providers(&self, arcade: bool) -> &[Arc<dyn MetadataProvider>] {
        if arcade { &self.arcade } else { &self.console }
    }

    /// Ask each provider of the requested context in order.
    ///
    /// A provider's `NotFound` moves on to the next provider; any other
    /// error aborts the lookup. `Ok(None)` means nobody knew the file.
    pub async fn lookup(
        &self,
        rom: &RomIdentity,
        arcade: bool,
        options: LookupOptions,
    ) -> Result<Option<ProviderGame>, ProviderError> {
        for provider in self.providers(arcade) {
            match provider.lookup(rom).await {
                Ok(game) => return Ok(Some(game)),
                Err(ProviderError::NotFound) => continue,
                Err(e) => return Err(e),
            }
        }
        if options.add_not_found {
            return Ok(Some(ProviderGame::placeholder(rom.stem.clone())));
        }
        Ok(None)
    }

    /// Release every provider's resources. Shared providers are closed once
    /// per list they appear in; `close` must be idempotent.
    pub fn close(&self) {
        for provider in self.console.iter().chain(self.arcade.iter()) {
            provider.close();
        }
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |list: &[Arc<dyn MetadataProvider>]| {
            list.iter().map(|p| p.name()).collect::<Vec<_>>()
        };
        f.debug_struct("ProviderSet")
            .field("console", &names(&self.console))
            .field("arcade", &names(&self.arcade))
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;
