//! Process-wide entry points for hosts that want plain functions.
//!
//! The first call starts a multi-thread tokio runtime, installs
//! `env_logger` (default level `warn`, overridden by `RUST_LOG`) and loads
//! `~/.config/romfetch/settings.toml`. Everything after that goes through
//! one shared [`ScrapeService`].

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use romfetch_core::ArtworkError;
use romfetch_lib::{FileRomIdentifier, Settings};
use romfetch_providers::{DefaultProfileFactory, ImageSaver};
use tokio::runtime::Runtime;

use crate::dispatch::Ticket;
use crate::scrape::ScrapeRequest;
use crate::service::{ScrapeService, ServiceConfig};

/// Returned by [`submit_request`] when the service could not start.
pub const NO_TICKET: Ticket = -1;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not start the async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("could not create the artwork saver: {0}")]
    Artwork(#[from] ArtworkError),
}

struct Global {
    // Owns the worker threads the service spawns onto.
    _runtime: Runtime,
    service: ScrapeService,
}

static GLOBAL: OnceLock<Option<Global>> = OnceLock::new();

fn global() -> Option<&'static ScrapeService> {
    GLOBAL
        .get_or_init(|| match start() {
            Ok(global) => Some(global),
            Err(e) => {
                log::error!("romfetch could not start: {}", e);
                None
            }
        })
        .as_ref()
        .map(|g| &g.service)
}

fn start() -> Result<Global, StartupError> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let settings = Settings::load().unwrap_or_else(|e| {
        log::warn!("using default settings: {}", e);
        Settings::default()
    });
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("romfetch-worker")
        .build()?;
    let saver = ImageSaver::new()?;
    let config = ServiceConfig::from_settings(&settings);

    let service = ScrapeService::new(
        runtime.handle().clone(),
        Arc::new(DefaultProfileFactory::new(settings)),
        Arc::new(FileRomIdentifier::new()),
        Arc::new(saver),
        config,
    );
    Ok(Global {
        _runtime: runtime,
        service,
    })
}

/// Activate profile `profile_id` (0 screenscraper, 1 open-db, 2 arcade-db).
pub fn init(profile_id: i32) -> bool {
    let Some(service) = global() else {
        return false;
    };
    match service.init(profile_id) {
        Ok(()) => true,
        Err(e) => {
            log::error!("init({}) failed: {}", profile_id, e);
            false
        }
    }
}

pub fn close() {
    if let Some(service) = global() {
        service.close();
    }
}

/// Queue a scrape of `path`. An empty `image_dest` keeps artwork remote.
pub fn submit_request(path: &str, platform_hint: &str, image_dest: &str) -> Ticket {
    let Some(service) = global() else {
        return NO_TICKET;
    };
    let mut request = ScrapeRequest::new(path, platform_hint);
    if !image_dest.is_empty() {
        request = request.with_image_dest(PathBuf::from(image_dest));
    }
    service.submit(request)
}

/// `(document, true)` once the ticket's job is done; read at most once.
pub fn poll_result(ticket: Ticket) -> (String, bool) {
    match global() {
        Some(service) => service.poll_result(ticket),
        None => (String::new(), false),
    }
}
