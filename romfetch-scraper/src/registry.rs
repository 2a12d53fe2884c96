//! Active profile and its provider set.
//!
//! The active set lives behind an `Arc<ProfileSnapshot>`. A scrape clones
//! the `Arc` when it starts and keeps using that set even if the profile is
//! switched underneath it. A retired set's providers are closed when the
//! last clone goes away, which is immediately when nothing is in flight.
//!
//! A switch builds the new set before touching the active slot, so a failed
//! build leaves the previous profile in place.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use romfetch_core::{ConfigError, Profile, ProfileFactory, ProviderSet};

/// One built provider set, tagged with the switch that produced it.
#[derive(Debug)]
pub struct ProfileSnapshot {
    profile: Profile,
    generation: u64,
    providers: ProviderSet,
}

impl ProfileSnapshot {
    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }
}

impl Drop for ProfileSnapshot {
    fn drop(&mut self) {
        log::debug!(
            "closing providers of profile {} (generation {})",
            self.profile,
            self.generation
        );
        self.providers.close();
    }
}

pub struct ProviderRegistry {
    factory: Arc<dyn ProfileFactory>,
    active: RwLock<Option<Arc<ProfileSnapshot>>>,
    /// Serializes switches; holds the last generation handed out.
    switch: Mutex<u64>,
}

impl ProviderRegistry {
    pub fn new(factory: Arc<dyn ProfileFactory>) -> Self {
        Self {
            factory,
            active: RwLock::new(None),
            switch: Mutex::new(0),
        }
    }

    /// Make `profile` active. Selecting the active profile again is a no-op.
    pub fn select(&self, profile: Profile) -> Result<(), ConfigError> {
        let mut generation = self.switch.lock().unwrap_or_else(PoisonError::into_inner);
        if self.active_profile() == Some(profile) {
            log::debug!("profile {} already active", profile);
            return Ok(());
        }

        let providers = self.factory.build(profile).inspect_err(|e| {
            log::warn!("could not build profile {}: {}", profile, e);
        })?;

        *generation += 1;
        let snapshot = Arc::new(ProfileSnapshot {
            profile,
            generation: *generation,
            providers,
        });
        log::info!("profile {} active (generation {})", profile, *generation);

        let previous = self
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(snapshot);
        if let Some(previous) = previous {
            retire(previous);
        }
        Ok(())
    }

    /// The set a new scrape should run against.
    pub fn snapshot(&self) -> Option<Arc<ProfileSnapshot>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn active_profile(&self) -> Option<Profile> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.profile)
    }

    /// Clear the active profile and release its providers.
    pub fn close(&self) {
        let _switch = self.switch.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = self
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match previous {
            Some(previous) => retire(previous),
            None => log::debug!("close with no active profile"),
        }
    }
}

fn retire(previous: Arc<ProfileSnapshot>) {
    let in_flight = Arc::strong_count(&previous) - 1;
    if in_flight > 0 {
        log::debug!(
            "profile {} retired with {} scrape(s) in flight",
            previous.profile,
            in_flight
        );
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
