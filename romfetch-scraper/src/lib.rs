//! Asynchronous, ticket-based scrape orchestration.
//!
//! A caller submits a file path and gets a ticket back at once; the scrape
//! runs on the tokio runtime against the active profile's providers and its
//! serialized result is collected later, exactly once, by polling the
//! ticket.

pub mod dispatch;
pub mod document;
pub mod error;
pub mod global;
pub mod registry;
pub mod scrape;
pub mod service;
pub mod store;

pub use dispatch::{Dispatcher, Ticket};
pub use document::{DocumentError, GameRecord, to_document};
pub use error::ScrapeError;
pub use registry::{ProfileSnapshot, ProviderRegistry};
pub use scrape::{
    ARTWORK_SIZE, MAX_ATTEMPTS, Materialized, RetryPolicy, ScrapeRequest, Scraper, format_players,
    materialize, select_artwork,
};
pub use service::{ScrapeService, ServiceConfig};
pub use store::{Completed, FailureKind, JobOutcome, PollStatus, ResultStore};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
