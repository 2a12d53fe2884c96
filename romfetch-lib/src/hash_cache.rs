//! Disk-backed hash → game identity cache.
//!
//! Providers record each positive identification keyed by provider name and
//! the ROM's SHA1, so later lookups of the same content can go straight to
//! the provider's game id. Stored as `hash-cache.json` in the cache
//! directory. [`HashCache::shared`] hands every profile built in this
//! process the same instance for a directory, so a retired profile still
//! finishing a scrape writes into the same map as its successor.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use serde::{Deserialize, Serialize};

/// Cache format version. Bump when the entry layout changes; files with a
/// different version are discarded on open.
const CACHE_VERSION: u32 = 1;

const CACHE_FILE: &str = "hash-cache.json";

/// Live caches by file path.
static OPEN_CACHES: OnceLock<Mutex<HashMap<PathBuf, Weak<HashCache>>>> = OnceLock::new();

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a provider resolved a hash to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedIdentity {
    pub game_id: String,
    pub title: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    version: u32,
    /// provider name → sha1 → identity
    #[serde(default)]
    providers: HashMap<String, HashMap<String, CachedIdentity>>,
}

pub struct HashCache {
    path: PathBuf,
    data: Mutex<CacheFile>,
    /// Held for the whole read-merge-write; `data` is only locked briefly
    /// inside it.
    writer: Mutex<()>,
}

impl HashCache {
    /// Open (or create) the cache in `dir`.
    ///
    /// A corrupt file or one written by another cache version is replaced
    /// with an empty cache; only I/O failures on the directory are errors.
    /// Prefer [`HashCache::shared`] unless a private instance is wanted.
    pub fn open(dir: &Path) -> Result<Self, CacheError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(CACHE_FILE);

        let data = match read_file(&path) {
            Ok(Some(file)) if file.version == CACHE_VERSION => file,
            Ok(Some(file)) => {
                log::info!(
                    "hash cache version {} != {}, starting fresh",
                    file.version,
                    CACHE_VERSION
                );
                CacheFile::empty()
            }
            Ok(None) => CacheFile::empty(),
            Err(CacheError::Json(e)) => {
                log::warn!("discarding corrupt hash cache {}: {}", path.display(), e);
                CacheFile::empty()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
            writer: Mutex::new(()),
        })
    }

    /// The process-wide cache for `dir`, opened on first use and kept
    /// while any handle is alive.
    pub fn shared(dir: &Path) -> Result<Arc<Self>, CacheError> {
        fs::create_dir_all(dir)?;
        let key = fs::canonicalize(dir)?.join(CACHE_FILE);

        let mut open = OPEN_CACHES
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cache) = open.get(&key).and_then(Weak::upgrade) {
            return Ok(cache);
        }
        open.retain(|_, cache| cache.strong_count() > 0);

        let cache = Arc::new(Self::open(dir)?);
        open.insert(key, Arc::downgrade(&cache));
        log::debug!("opened hash cache {}", cache.path.display());
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, provider: &str, sha1: &str) -> Option<CachedIdentity> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.providers.get(provider)?.get(sha1).cloned()
    }

    /// Record an identification and persist the cache.
    ///
    /// Blocks on file I/O; async callers use [`HashCache::insert_async`].
    pub fn insert(
        &self,
        provider: &str,
        sha1: &str,
        identity: CachedIdentity,
    ) -> Result<(), CacheError> {
        {
            let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
            let previous = data
                .providers
                .entry(provider.to_string())
                .or_default()
                .insert(sha1.to_string(), identity.clone());
            if previous.as_ref() == Some(&identity) {
                return Ok(());
            }
        }
        self.persist()
    }

    /// [`HashCache::insert`] on the blocking pool.
    pub async fn insert_async(
        self: &Arc<Self>,
        provider: &str,
        sha1: &str,
        identity: CachedIdentity,
    ) -> Result<(), CacheError> {
        let cache = Arc::clone(self);
        let provider = provider.to_string();
        let sha1 = sha1.to_string();
        tokio::task::spawn_blocking(move || cache.insert(&provider, &sha1, identity))
            .await
            .map_err(std::io::Error::other)?
    }

    pub fn len(&self) -> usize {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.providers.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold in entries another writer put on disk, then write atomically
    /// through a temp file unique to this write.
    fn persist(&self) -> Result<(), CacheError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let on_disk = match read_file(&self.path) {
            Ok(Some(file)) if file.version == CACHE_VERSION => Some(file),
            Ok(_) | Err(CacheError::Json(_)) => None,
            Err(e) => return Err(e),
        };
        let json = {
            let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(file) = on_disk {
                data.absorb(file);
            }
            serde_json::to_string(&*data)?
        };

        let tmp = self.path.with_file_name(format!(
            "{}.{}.{}.tmp",
            CACHE_FILE,
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(e) = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl CacheFile {
    fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            providers: HashMap::new(),
        }
    }

    /// Take entries from `other` this copy lacks; existing entries win.
    fn absorb(&mut self, other: CacheFile) {
        for (provider, entries) in other.providers {
            let mine = self.providers.entry(provider).or_default();
            for (sha1, identity) in entries {
                mine.entry(sha1).or_insert(identity);
            }
        }
    }
}

/// `None` when the file does not exist.
fn read_file(path: &Path) -> Result<Option<CacheFile>, CacheError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "tests/hash_cache_tests.rs"]
mod tests;
