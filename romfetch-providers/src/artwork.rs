use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use romfetch_core::{Artwork, ArtworkError, ArtworkSaver};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Materializes artwork by downloading or reading it, shrinking it to fit
/// the requested box and writing it to the destination path.
pub struct ImageSaver {
    http: reqwest::Client,
}

impl ImageSaver {
    pub fn new() -> Result<Self, ArtworkError> {
        let http = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| ArtworkError::Download(e.to_string()))?;
        Ok(Self { http })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ArtworkError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ArtworkError::Download(e.to_string()))?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ArtworkError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ArtworkSaver for ImageSaver {
    async fn save(
        &self,
        artwork: &Artwork,
        dest: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ArtworkError> {
        let source = match artwork {
            Artwork::None => return Err(ArtworkError::Unavailable),
            Artwork::LocalFile(path) => Source::File(path.clone()),
            Artwork::Http(url) | Artwork::ScreenScraper(url) => {
                Source::Bytes(self.download(url).await?)
            }
        };

        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let bytes = match source {
                Source::File(path) => std::fs::read(path)?,
                Source::Bytes(bytes) => bytes,
            };
            write_resized(&bytes, &dest, width, height)
        })
        .await
        .map_err(|e| ArtworkError::Io(std::io::Error::other(e)))?
    }
}

enum Source {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Decode `bytes`, shrink to fit `width`×`height` keeping the aspect ratio,
/// and write to `dest` in the format its extension names (PNG otherwise).
pub fn write_resized(
    bytes: &[u8],
    dest: &Path,
    width: u32,
    height: u32,
) -> Result<(), ArtworkError> {
    let img = image::load_from_memory(bytes).map_err(|e| ArtworkError::Decode(e.to_string()))?;
    let img = if img.width() > width || img.height() > height {
        img.resize(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    let format = ImageFormat::from_path(dest).unwrap_or(ImageFormat::Png);
    let img = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(dest, format)
        .map_err(|e| ArtworkError::Decode(format!("failed to encode {}: {e}", dest.display())))
}

#[cfg(test)]
#[path = "tests/artwork_tests.rs"]
mod tests;
