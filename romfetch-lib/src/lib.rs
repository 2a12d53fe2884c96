//! Shared utilities used by the providers and the scraper: content hashing,
//! the hash→identity cache, file identification and the settings file.

pub mod hash_cache;
pub mod hasher;
pub mod rom;
pub mod settings;

pub use hash_cache::{CacheError, CachedIdentity, HashCache};
pub use hasher::{FileHashes, RomHasher, hash_reader};
pub use rom::FileRomIdentifier;
pub use settings::{Settings, SettingsError, TheGamesDbSettings, config_dir, settings_path};
