use std::collections::HashMap;

use crate::artwork::{Artwork, ArtworkVariant};

/// A game as returned by a metadata provider, before normalization.
#[derive(Debug, Clone, Default)]
pub struct ProviderGame {
    /// Provider-specific game id
    pub id: String,
    /// Name of the provider that produced this game
    pub source: &'static str,
    pub title: String,
    pub overview: String,
    /// Rating from 0.0 to 1.0, 0.0 when unrated
    pub rating: f64,
    pub release_date: String,
    pub developer: String,
    pub publisher: String,
    pub genre: String,
    /// Maximum number of players, 0 when unknown
    pub players: u32,
    pub artwork: HashMap<ArtworkVariant, Artwork>,
    /// Placeholder built from the file name because no provider knew the game.
    pub not_found: bool,
}

impl ProviderGame {
    /// Placeholder record for a file nobody identified.
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            source: "placeholder",
            title: title.into(),
            not_found: true,
            ..Default::default()
        }
    }

    pub fn with_artwork(mut self, variant: ArtworkVariant, artwork: Artwork) -> Self {
        if !artwork.is_none() {
            self.artwork.insert(variant, artwork);
        }
        self
    }

    pub fn artwork(&self, variant: ArtworkVariant) -> Option<&Artwork> {
        self.artwork.get(&variant)
    }
}

/// Parse a provider's free-form player count ("1", "1-4", "2 players").
///
/// Returns the largest number found, or 0.
pub fn parse_players(text: &str) -> u32 {
    text.split(|c: char| !c.is_ascii_digit())
        .filter_map(|part| part.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "tests/game_tests.rs"]
mod tests;
