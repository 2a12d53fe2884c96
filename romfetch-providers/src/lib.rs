//! Concrete metadata providers, the image-based artwork saver and the
//! factory that assembles them into per-profile provider sets.

pub mod artwork;
pub mod gamesdb;
pub mod gate;
pub mod idtable;
pub mod mame;
pub mod profiles;
pub mod screenscraper;

pub use artwork::ImageSaver;
pub use gamesdb::{TheGamesDbClient, TheGamesDbProvider};
pub use gate::OutboundGate;
pub use idtable::{GameIdTable, IdSource, IdTableProvider};
pub use mame::{MameDbProvider, MameError};
pub use profiles::DefaultProfileFactory;
pub use screenscraper::{ScreenScraperArcadeProvider, ScreenScraperProvider};

/// Regional and language preferences applied when a provider returns
/// several localized values.
#[derive(Debug, Clone)]
pub struct Preferences {
    /// Region codes, most preferred first.
    pub regions: Vec<String>,
    /// Language codes, most preferred first.
    pub languages: Vec<String>,
}

impl Preferences {
    pub fn from_settings(settings: &romfetch_lib::Settings) -> Self {
        Self {
            regions: settings.regions.clone(),
            languages: settings.languages.clone(),
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from_settings(&romfetch_lib::Settings::default())
    }
}
