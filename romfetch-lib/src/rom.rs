use std::path::Path;

use romfetch_core::{IdentifyError, Platform, RomIdentifier, RomIdentity};

/// Identifies ROMs from file-system metadata alone.
///
/// Content hashing is left to the providers that need it, so identifying a
/// file is a single `stat`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileRomIdentifier;

impl FileRomIdentifier {
    pub fn new() -> Self {
        Self
    }
}

impl RomIdentifier for FileRomIdentifier {
    fn identify(
        &self,
        path: &Path,
        platform: Option<Platform>,
    ) -> Result<RomIdentity, IdentifyError> {
        let display = path.display().to_string();
        let meta = std::fs::metadata(path).map_err(|source| IdentifyError::Unreadable {
            path: display.clone(),
            source,
        })?;
        if meta.is_dir() {
            return Err(IdentifyError::Unreadable {
                path: display,
                source: std::io::Error::other("is a directory"),
            });
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| IdentifyError::unrecognized(&display, "no file name"))?;
        let extension = match path.extension() {
            Some(ext) if !ext.is_empty() => ext.to_string_lossy().to_lowercase(),
            _ => return Err(IdentifyError::unrecognized(&display, "no file extension")),
        };
        if meta.len() == 0 {
            return Err(IdentifyError::unrecognized(&display, "empty file"));
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());

        Ok(RomIdentity {
            path: path.to_path_buf(),
            file_name,
            stem,
            extension,
            size: meta.len(),
            platform,
        })
    }
}

#[cfg(test)]
#[path = "tests/rom_tests.rs"]
mod tests;
