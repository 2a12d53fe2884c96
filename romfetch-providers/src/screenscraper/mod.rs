//! ScreenScraper (screenscraper.fr) providers.
//!
//! One client is shared by the console provider (hash lookups) and the
//! arcade provider (archive-name lookups); both go through the profile's
//! outbound gate.

pub mod client;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod systems;
pub mod types;

pub use client::ScreenScraperClient;
pub use credentials::Credentials;
pub use error::ScreenScraperError;
pub use provider::{ScreenScraperArcadeProvider, ScreenScraperProvider};
