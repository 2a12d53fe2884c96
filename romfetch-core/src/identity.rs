use std::path::{Path, PathBuf};

use crate::error::IdentifyError;
use crate::platform::Platform;

/// Archive extensions accepted for arcade-context requests.
pub const ARCADE_ARCHIVE_EXTENSIONS: &[&str] = &["zip", "7z"];

/// What is known about a ROM file before any provider sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomIdentity {
    /// Path as given by the caller
    pub path: PathBuf,
    /// File name with extension
    pub file_name: String,
    /// File name without extension
    pub stem: String,
    /// Lowercase extension without the leading dot
    pub extension: String,
    /// File size in bytes
    pub size: u64,
    /// Resolved platform hint, if the hint named a known platform
    pub platform: Option<Platform>,
}

impl RomIdentity {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the extension is one of the arcade archive formats.
    pub fn is_arcade_archive(&self) -> bool {
        ARCADE_ARCHIVE_EXTENSIONS.contains(&self.extension.as_str())
    }
}

/// Resolves a path into a [`RomIdentity`].
///
/// Implementations do blocking I/O; async callers should run them on the
/// blocking pool.
pub trait RomIdentifier: Send + Sync {
    fn identify(&self, path: &Path, platform: Option<Platform>)
    -> Result<RomIdentity, IdentifyError>;
}
