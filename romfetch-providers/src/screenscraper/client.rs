use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use super::credentials::Credentials;
use super::error::ScreenScraperError;
use super::types::JeuInfosResponse;

const BASE_URL: &str = "https://api.screenscraper.fr/api2";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1200);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Rate-limited HTTP client for `jeuInfos.php`.
pub struct ScreenScraperClient {
    http: reqwest::Client,
    creds: Credentials,
    last_request: Mutex<Instant>,
}

impl ScreenScraperClient {
    pub fn new(creds: Credentials) -> Result<Self, ScreenScraperError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            creds,
            last_request: Mutex::new(Instant::now() - MIN_REQUEST_INTERVAL),
        })
    }

    /// Look up a game with the given query parameters.
    pub async fn lookup_game(
        &self,
        params: HashMap<&'static str, String>,
    ) -> Result<JeuInfosResponse, ScreenScraperError> {
        let mut all_params = self.base_params();
        all_params.extend(params);

        self.rate_limit().await;

        let resp = self
            .http
            .get(format!("{}/jeuInfos.php", BASE_URL))
            .query(&all_params)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        let response = parse_jeu_infos(status, &text)?;
        if let Some(ref user) = response.response.ssuser {
            log::debug!(
                "screenscraper quota: {}/{}",
                user.requests_today(),
                user.max_requests_per_day()
            );
        }
        Ok(response)
    }

    /// Wait until MIN_REQUEST_INTERVAL has passed since the last request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
        }
        *last = Instant::now();
    }

    fn base_params(&self) -> HashMap<&'static str, String> {
        let mut params = HashMap::new();
        params.insert("devid", self.creds.dev_id.clone());
        params.insert("devpassword", self.creds.dev_password.clone());
        params.insert("softname", self.creds.soft_name.clone());
        params.insert("output", "json".to_string());
        if let Some(ref id) = self.creds.user_id {
            params.insert("ssid", id.clone());
        }
        if let Some(ref pw) = self.creds.user_password {
            params.insert("sspassword", pw.clone());
        }
        params
    }
}

/// Classify a `jeuInfos.php` response.
///
/// ScreenScraper answers most failures with HTTP 200 and a plain-text
/// message, so the body is checked before it is parsed.
pub fn parse_jeu_infos(
    status: reqwest::StatusCode,
    text: &str,
) -> Result<JeuInfosResponse, ScreenScraperError> {
    use reqwest::StatusCode;

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ScreenScraperError::InvalidCredentials(
            "credentials rejected".to_string(),
        ));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ScreenScraperError::RateLimit);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ScreenScraperError::NotFound);
    }
    if status.is_server_error() {
        return Err(ScreenScraperError::Server {
            status: status.as_u16(),
        });
    }

    if text.contains("Le quota de scrape journalier") {
        return Err(ScreenScraperError::QuotaExceeded);
    }
    if text.contains("API fermé") || text.contains("API closed") {
        return Err(ScreenScraperError::ServerClosed(
            "API is temporarily closed".to_string(),
        ));
    }
    if text.trim().is_empty() || text.contains("Erreur") || text.contains("Jeu non trouvé") {
        return Err(ScreenScraperError::NotFound);
    }

    serde_json::from_str(text).map_err(|e| {
        let head: String = text.chars().take(200).collect();
        ScreenScraperError::Api(format!("failed to parse game info: {e}. Response: {head}"))
    })
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
