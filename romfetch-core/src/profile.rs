use crate::error::ConfigError;
use crate::provider::ProviderSet;

/// Which provider set is active. At most one profile is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// ScreenScraper community database (console + arcade).
    ScreenScraper,
    /// TheGamesDB open database (console only).
    OpenDb,
    /// Local MAME metadata database (arcade only).
    ArcadeDb,
}

impl Profile {
    /// Numeric id used across the host boundary.
    pub fn id(&self) -> i32 {
        match self {
            Self::ScreenScraper => 0,
            Self::OpenDb => 1,
            Self::ArcadeDb => 2,
        }
    }

    pub fn from_id(id: i32) -> Option<Profile> {
        match id {
            0 => Some(Self::ScreenScraper),
            1 => Some(Self::OpenDb),
            2 => Some(Self::ArcadeDb),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ScreenScraper => "screenscraper",
            Self::OpenDb => "open-db",
            Self::ArcadeDb => "arcade-db",
        }
    }

    pub fn all() -> &'static [Profile] {
        &[Self::ScreenScraper, Self::OpenDb, Self::ArcadeDb]
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Builds the provider set for a profile.
///
/// Construction is synchronous and may fail; a failure must leave no
/// partially-built resources behind.
pub trait ProfileFactory: Send + Sync {
    fn build(&self, profile: Profile) -> Result<ProviderSet, ConfigError>;
}
