use std::path::PathBuf;

use serde::Deserialize;

use super::error::ScreenScraperError;

// XOR-obfuscated developer credentials written by build.rs.
include!(concat!(env!("OUT_DIR"), "/embedded_dev_info.rs"));

const DEFAULT_SOFT_NAME: &str = "romfetch";

fn deobfuscate(data: &[u8]) -> Option<String> {
    let decoded: Vec<u8> = data
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ DEV_INFO_KEY[i % DEV_INFO_KEY.len()])
        .collect();
    String::from_utf8(decoded).ok()
}

fn embedded_dev_id() -> Option<String> {
    EMBEDDED_DEV_ID.and_then(deobfuscate)
}

fn embedded_dev_password() -> Option<String> {
    EMBEDDED_DEV_PASSWORD.and_then(deobfuscate)
}

/// Credentials for the ScreenScraper API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub dev_id: String,
    pub dev_password: String,
    pub soft_name: String,
    pub user_id: Option<String>,
    pub user_password: Option<String>,
}

/// `credentials.toml` layout.
#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    screenscraper: Option<FileCredentials>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct FileCredentials {
    pub dev_id: Option<String>,
    pub dev_password: Option<String>,
    pub soft_name: Option<String>,
    pub user_id: Option<String>,
    pub user_password: Option<String>,
}

impl Credentials {
    /// Resolve credentials: env vars > credentials file > embedded at build time.
    pub fn load() -> Result<Self, ScreenScraperError> {
        Self::resolve(|var| std::env::var(var).ok(), load_file().unwrap_or_default())
    }

    pub(crate) fn resolve(
        env: impl Fn(&str) -> Option<String>,
        file: FileCredentials,
    ) -> Result<Self, ScreenScraperError> {
        let dev_id = env("SCREENSCRAPER_DEVID")
            .or(file.dev_id)
            .or_else(embedded_dev_id)
            .ok_or_else(|| {
                ScreenScraperError::Config(
                    "missing dev_id; set SCREENSCRAPER_DEVID or add it to credentials.toml"
                        .to_string(),
                )
            })?;
        let dev_password = env("SCREENSCRAPER_DEVPASSWORD")
            .or(file.dev_password)
            .or_else(embedded_dev_password)
            .ok_or_else(|| {
                ScreenScraperError::Config(
                    "missing dev_password; set SCREENSCRAPER_DEVPASSWORD or add it to credentials.toml"
                        .to_string(),
                )
            })?;
        let soft_name = env("SCREENSCRAPER_SOFTNAME")
            .or(file.soft_name)
            .unwrap_or_else(|| DEFAULT_SOFT_NAME.to_string());

        Ok(Self {
            dev_id,
            dev_password,
            soft_name,
            user_id: env("SCREENSCRAPER_SSID").or(file.user_id),
            user_password: env("SCREENSCRAPER_SSPASSWORD").or(file.user_password),
        })
    }
}

/// `~/.config/romfetch/credentials.toml`
pub fn config_path() -> PathBuf {
    romfetch_lib::config_dir().join("credentials.toml")
}

fn load_file() -> Option<FileCredentials> {
    let path = config_path();
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<CredentialsFile>(&content) {
        Ok(file) => file.screenscraper,
        Err(e) => {
            log::warn!("ignoring unreadable {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;
