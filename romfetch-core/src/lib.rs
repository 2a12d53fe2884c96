//! Domain types and collaborator traits shared by every romfetch crate.

pub mod artwork;
pub mod error;
pub mod game;
pub mod identity;
pub mod platform;
pub mod profile;
pub mod provider;

pub use artwork::{Artwork, ArtworkSaver, ArtworkVariant};
pub use error::{ArtworkError, ConfigError, IdentifyError, ProviderError};
pub use game::{ProviderGame, parse_players};
pub use identity::{ARCADE_ARCHIVE_EXTENSIONS, RomIdentifier, RomIdentity};
pub use platform::{Platform, PlatformParseError, arcade_context};
pub use profile::{Profile, ProfileFactory};
pub use provider::{LookupOptions, MetadataProvider, ProviderSet};
