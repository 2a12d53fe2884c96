//! Content hashing shared by every provider of a profile.
//!
//! Files are hashed once per (path, size, mtime); later requests for the
//! same unchanged file are served from memory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use sha1::Digest;

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Memo entries kept before the memo is cleared.
const MEMO_LIMIT: usize = 4096;

/// Hashes of a ROM's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHashes {
    /// CRC32, lowercase hex, 8 digits
    pub crc32: String,
    /// MD5, lowercase hex
    pub md5: String,
    /// SHA1, lowercase hex
    pub sha1: String,
    /// Number of bytes hashed
    pub data_size: u64,
}

/// Compute CRC32, MD5 and SHA1 of a reader in a single pass.
pub fn hash_reader(reader: &mut dyn Read) -> io::Result<FileHashes> {
    let mut crc = crc32fast::Hasher::new();
    let mut sha = sha1::Sha1::new();
    let mut md5_ctx = md5::Context::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut data_size: u64 = 0;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        crc.update(&buf[..n]);
        sha.update(&buf[..n]);
        md5_ctx.consume(&buf[..n]);
        data_size += n as u64;
    }

    Ok(FileHashes {
        crc32: format!("{:08x}", crc.finalize()),
        md5: format!("{:x}", md5_ctx.compute()),
        sha1: format!("{:x}", sha.finalize()),
        data_size,
    })
}

struct MemoEntry {
    size: u64,
    modified: Option<SystemTime>,
    hashes: FileHashes,
}

/// File hasher with an in-memory memo.
///
/// `.zip` files are hashed by the content of their first file entry so a
/// zipped console ROM matches the same database entry as the bare ROM.
#[derive(Default)]
pub struct RomHasher {
    memo: Mutex<HashMap<PathBuf, MemoEntry>>,
}

impl RomHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a file, blocking the current thread.
    pub fn hash_file(&self, path: &Path) -> io::Result<FileHashes> {
        let meta = std::fs::metadata(path)?;
        let modified = meta.modified().ok();

        {
            let memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = memo.get(path) {
                if entry.size == meta.len() && entry.modified == modified {
                    return Ok(entry.hashes.clone());
                }
            }
        }

        let hashes = if is_zip(path) {
            hash_first_zip_entry(path)?
        } else {
            hash_reader(&mut File::open(path)?)?
        };

        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        if memo.len() >= MEMO_LIMIT {
            log::debug!("hash memo reached {} entries, clearing", MEMO_LIMIT);
            memo.clear();
        }
        memo.insert(
            path.to_path_buf(),
            MemoEntry {
                size: meta.len(),
                modified,
                hashes: hashes.clone(),
            },
        );
        Ok(hashes)
    }

    /// Hash a file on the blocking pool.
    pub async fn hash_file_async(self: &Arc<Self>, path: &Path) -> io::Result<FileHashes> {
        let hasher = Arc::clone(self);
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || hasher.hash_file(&path))
            .await
            .map_err(io::Error::other)?
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

fn hash_first_zip_entry(path: &Path) -> io::Result<FileHashes> {
    let mut archive = zip::ZipArchive::new(File::open(path)?).map_err(io::Error::other)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(io::Error::other)?;
        if entry.is_dir() {
            continue;
        }
        return hash_reader(&mut entry);
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{} contains no files", path.display()),
    ))
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;
