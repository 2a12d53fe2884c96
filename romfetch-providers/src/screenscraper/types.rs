use serde::Deserialize;

/// Top-level response wrapper from jeuInfos.php.
#[derive(Debug, Deserialize)]
pub struct JeuInfosResponse {
    pub response: JeuInfosData,
}

#[derive(Debug, Deserialize)]
pub struct JeuInfosData {
    #[serde(default)]
    pub ssuser: Option<UserQuota>,
    pub jeu: GameInfo,
}

/// Game info. Localized fields are arrays tagged with a region or language.
#[derive(Debug, Deserialize, Clone)]
pub struct GameInfo {
    pub id: String,
    #[serde(default)]
    pub noms: Vec<RegionText>,
    #[serde(default)]
    pub synopsis: Vec<LangueText>,
    #[serde(default)]
    pub dates: Vec<RegionText>,
    #[serde(default)]
    pub medias: Vec<Media>,
    #[serde(default)]
    pub editeur: Option<IdText>,
    #[serde(default)]
    pub developpeur: Option<IdText>,
    #[serde(default)]
    pub joueurs: Option<IdText>,
    #[serde(default)]
    pub note: Option<IdText>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl GameInfo {
    /// Name for the first preferred region present, then the "ss" name,
    /// then whatever comes first.
    pub fn name_for_regions(&self, preferred: &[String]) -> Option<&str> {
        preferred
            .iter()
            .find_map(|r| self.noms.iter().find(|n| &n.region == r))
            .or_else(|| self.noms.iter().find(|n| n.region == "ss"))
            .or_else(|| self.noms.first())
            .map(|n| n.text.as_str())
    }

    pub fn synopsis_for_languages(&self, preferred: &[String]) -> Option<&str> {
        preferred
            .iter()
            .find_map(|l| self.synopsis.iter().find(|s| &s.langue == l))
            .map(|s| s.text.as_str())
    }

    pub fn date_for_regions(&self, preferred: &[String]) -> Option<&str> {
        preferred
            .iter()
            .find_map(|r| self.dates.iter().find(|d| &d.region == r))
            .or_else(|| self.dates.first())
            .map(|d| d.text.as_str())
    }

    /// Media of `media_type` for the first preferred region, falling back
    /// to any region.
    pub fn media_for_regions(&self, media_type: &str, preferred: &[String]) -> Option<&Media> {
        let matches: Vec<&Media> = self
            .medias
            .iter()
            .filter(|m| m.media_type == media_type)
            .collect();
        preferred
            .iter()
            .find_map(|r| matches.iter().find(|m| &m.region == r))
            .or_else(|| matches.first())
            .copied()
    }

    /// Genre names in the first preferred language that has any, comma-joined.
    pub fn genre_for_languages(&self, preferred: &[String]) -> Option<String> {
        preferred.iter().find_map(|lang| {
            let names: Vec<&str> = self
                .genres
                .iter()
                .filter_map(|g| g.noms.iter().find(|n| &n.langue == lang))
                .map(|n| n.text.as_str())
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        })
    }

    /// Rating as 0.0-1.0 (ScreenScraper uses a 0-20 scale).
    pub fn rating_normalized(&self) -> Option<f64> {
        self.note.as_ref().and_then(|n| {
            n.text
                .trim()
                .parse::<f64>()
                .ok()
                .map(|v| (v / 20.0).clamp(0.0, 1.0))
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionText {
    pub region: String,
    pub text: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LangueText {
    pub langue: String,
    pub text: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdText {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Media {
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Genre {
    pub id: String,
    #[serde(default)]
    pub noms: Vec<LangueText>,
}

/// Quota info embedded in lookup responses.
#[derive(Debug, Deserialize, Clone)]
pub struct UserQuota {
    #[serde(default)]
    pub requeststoday: Option<String>,
    #[serde(default)]
    pub maxrequestsperday: Option<String>,
}

impl UserQuota {
    pub fn requests_today(&self) -> u32 {
        self.requeststoday
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    pub fn max_requests_per_day(&self) -> u32 {
        self.maxrequestsperday
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20000)
    }
}
