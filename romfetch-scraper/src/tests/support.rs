//! Hand-written fakes shared by the unit and integration tests.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use romfetch_core::{
    Artwork, ArtworkError, ArtworkSaver, ConfigError, MetadataProvider, Profile, ProfileFactory,
    ProviderError, ProviderGame, ProviderSet, RomIdentity,
};

/// One scripted provider answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Found(ProviderGame),
    Miss,
    Transient,
    Fatal,
}

impl Reply {
    fn into_result(self) -> Result<ProviderGame, ProviderError> {
        match self {
            Reply::Found(game) => Ok(game),
            Reply::Miss => Err(ProviderError::NotFound),
            Reply::Transient => Err(ProviderError::transient("connection reset")),
            Reply::Fatal => Err(ProviderError::InvalidCredentials("bad password".into())),
        }
    }
}

/// Provider that replays a script, then repeats a fallback reply.
pub struct FakeProvider {
    name: &'static str,
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: AtomicUsize,
    closes: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(name: &'static str, fallback: Reply) -> Arc<Self> {
        Self::scripted(name, Vec::new(), fallback)
    }

    pub fn scripted(name: &'static str, script: Vec<Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// File names of every identity looked up so far.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn lookup(&self, rom: &RomIdentity) -> Result<ProviderGame, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(rom.file_name.clone());
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.into_result()
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn game(title: &str) -> ProviderGame {
    ProviderGame {
        id: "1".to_string(),
        source: "fake",
        title: title.to_string(),
        ..Default::default()
    }
}

pub fn dyns(providers: &[&Arc<FakeProvider>]) -> Vec<Arc<dyn MetadataProvider>> {
    providers
        .iter()
        .map(|p| Arc::clone(*p) as Arc<dyn MetadataProvider>)
        .collect()
}

/// Saver that writes a marker file instead of decoding images.
#[derive(Default)]
pub struct FakeSaver {
    fail: bool,
    saves: Mutex<Vec<(Artwork, PathBuf)>>,
}

impl FakeSaver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn saves(&self) -> Vec<(Artwork, PathBuf)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtworkSaver for FakeSaver {
    async fn save(
        &self,
        artwork: &Artwork,
        dest: &Path,
        _width: u32,
        _height: u32,
    ) -> Result<(), ArtworkError> {
        self.saves
            .lock()
            .unwrap()
            .push((artwork.clone(), dest.to_path_buf()));
        if artwork.is_none() {
            return Err(ArtworkError::Unavailable);
        }
        if self.fail {
            return Err(ArtworkError::Download("connection refused".into()));
        }
        std::fs::write(dest, b"fake image")?;
        Ok(())
    }
}

/// Factory handing out the same providers for every profile.
pub struct FakeFactory {
    console: Vec<Arc<FakeProvider>>,
    arcade: Vec<Arc<FakeProvider>>,
    failing: Mutex<HashSet<Profile>>,
    builds: AtomicUsize,
}

impl FakeFactory {
    pub fn new(console: Vec<Arc<FakeProvider>>, arcade: Vec<Arc<FakeProvider>>) -> Arc<Self> {
        Arc::new(Self {
            console,
            arcade,
            failing: Mutex::new(HashSet::new()),
            builds: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new(), Vec::new())
    }

    /// Make every later build of `profile` fail.
    pub fn fail(&self, profile: Profile) {
        self.failing.lock().unwrap().insert(profile);
    }

    pub fn heal(&self, profile: Profile) {
        self.failing.lock().unwrap().remove(&profile);
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl ProfileFactory for FakeFactory {
    fn build(&self, profile: Profile) -> Result<ProviderSet, ConfigError> {
        if self.failing.lock().unwrap().contains(&profile) {
            return Err(ConfigError::missing(format!("{} is unavailable", profile)));
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        let console: Vec<&Arc<FakeProvider>> = self.console.iter().collect();
        let arcade: Vec<&Arc<FakeProvider>> = self.arcade.iter().collect();
        Ok(ProviderSet::new(dyns(&console), dyns(&arcade)))
    }
}

/// Write a small non-empty file named `name` under `dir`.
pub fn rom_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"ROMDATA-0123456789").unwrap();
    path
}
