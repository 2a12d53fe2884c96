//! The ticket-based scrape service.
//!
//! Ties the registry, dispatcher, orchestrator and result store together.
//! Nothing here returns a scrape error to the submitter: a failed job
//! deposits an empty payload, logs the reason and keeps a [`JobOutcome`]
//! for callers that ask through [`ScrapeService::poll_outcome`].
//!
//! [`JobOutcome`]: crate::store::JobOutcome

use std::sync::Arc;
use std::time::Duration;

use romfetch_core::{
    ArtworkSaver, ConfigError, LookupOptions, Profile, ProfileFactory, RomIdentifier,
};
use romfetch_lib::Settings;
use tokio::runtime::Handle;

use crate::dispatch::{Dispatcher, Ticket};
use crate::document::{GameRecord, to_document};
use crate::error::ScrapeError;
use crate::registry::ProviderRegistry;
use crate::scrape::{RetryPolicy, ScrapeRequest, Scraper};
use crate::store::{Completed, FailureKind, PollStatus, ResultStore};

#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    /// Scrapes allowed to run at once; later ones queue.
    pub max_in_flight: usize,
    pub retry: RetryPolicy,
    pub lookup: LookupOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            retry: RetryPolicy::default(),
            lookup: LookupOptions::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_in_flight: settings.max_in_flight(),
            retry: RetryPolicy::with_backoff(Duration::from_millis(settings.retry_backoff_ms)),
            lookup: LookupOptions {
                add_not_found: settings.add_not_found,
            },
        }
    }
}

pub struct ScrapeService {
    registry: Arc<ProviderRegistry>,
    scraper: Arc<Scraper>,
    dispatcher: Dispatcher,
}

impl ScrapeService {
    pub fn new(
        handle: Handle,
        factory: Arc<dyn ProfileFactory>,
        identifier: Arc<dyn RomIdentifier>,
        saver: Arc<dyn ArtworkSaver>,
        config: ServiceConfig,
    ) -> Self {
        let scraper = Scraper::new(identifier, saver)
            .with_retry(config.retry)
            .with_lookup(config.lookup);
        Self {
            registry: Arc::new(ProviderRegistry::new(factory)),
            scraper: Arc::new(scraper),
            dispatcher: Dispatcher::new(
                handle,
                Arc::new(ResultStore::new()),
                config.max_in_flight,
            ),
        }
    }

    /// Activate the profile with the given id. Idempotent.
    pub fn init(&self, profile_id: i32) -> Result<(), ConfigError> {
        let profile = Profile::from_id(profile_id).ok_or(ConfigError::UnknownProfile(profile_id))?;
        self.registry.select(profile)
    }

    pub fn close(&self) {
        self.registry.close();
    }

    pub fn active_profile(&self) -> Option<Profile> {
        self.registry.active_profile()
    }

    /// Queue a scrape and return its ticket without waiting for it.
    pub fn submit(&self, request: ScrapeRequest) -> Ticket {
        let registry = Arc::clone(&self.registry);
        let scraper = Arc::clone(&self.scraper);
        self.dispatcher
            .submit(move |ticket| async move { run(ticket, &registry, &scraper, &request).await })
    }

    /// `(payload, true)` once the job is done, read at most once;
    /// `("", false)` while pending or for an unknown ticket.
    pub fn poll_result(&self, ticket: Ticket) -> (String, bool) {
        match self.dispatcher.store().poll(ticket) {
            Some(payload) => (payload, true),
            None => (String::new(), false),
        }
    }

    pub fn poll_status(&self, ticket: Ticket) -> PollStatus {
        self.dispatcher.store().status(ticket)
    }

    /// Like [`poll_result`](Self::poll_result) but keeps the outcome.
    pub fn poll_outcome(&self, ticket: Ticket) -> Option<Completed> {
        self.dispatcher.store().take(ticket)
    }
}

async fn run(
    ticket: Ticket,
    registry: &ProviderRegistry,
    scraper: &Scraper,
    request: &ScrapeRequest,
) -> Completed {
    let records = match scrape_job(registry, scraper, request).await {
        Ok(records) => records,
        Err(e) => {
            log::error!("ticket {}: {}: {}", ticket, request.path.display(), e);
            return Completed::failed(e.kind(), e.to_string());
        }
    };

    match to_document(&records) {
        Ok(payload) => Completed::records(payload, records.len()),
        Err(e) => {
            log::error!(
                "ticket {}: {}: could not serialize result: {}",
                ticket,
                request.path.display(),
                e
            );
            Completed::failed(FailureKind::Serialization, e.to_string())
        }
    }
}

/// Scrape against the profile active right now.
async fn scrape_job(
    registry: &ProviderRegistry,
    scraper: &Scraper,
    request: &ScrapeRequest,
) -> Result<Vec<GameRecord>, ScrapeError> {
    let snapshot = registry.snapshot().ok_or(ScrapeError::NoProfile)?;
    scraper.scrape(snapshot.providers(), request).await
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
