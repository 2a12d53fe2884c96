//! Local MAME metadata database for the arcade-db profile.
//!
//! A SQLite file with one row per romset, keyed by the archive stem
//! (`pacman.zip` → `pacman`). The connection is the only provider resource
//! that needs explicit release; after [`MetadataProvider::close`] every
//! lookup fails with `ProviderError::Closed`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use romfetch_core::{
    Artwork, ArtworkVariant, MetadataProvider, ProviderError, ProviderGame, RomIdentity,
};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MameError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS games (
    name          TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    overview      TEXT NOT NULL DEFAULT '',
    rating        REAL NOT NULL DEFAULT 0,
    release_date  TEXT NOT NULL DEFAULT '',
    developer     TEXT NOT NULL DEFAULT '',
    publisher     TEXT NOT NULL DEFAULT '',
    genre         TEXT NOT NULL DEFAULT '',
    players       INTEGER NOT NULL DEFAULT 0,
    title_image   TEXT NOT NULL DEFAULT '',
    marquee_image TEXT NOT NULL DEFAULT '',
    snap_image    TEXT NOT NULL DEFAULT ''
);
";

/// Create the schema if it does not exist yet. Idempotent.
pub fn create_schema(conn: &Connection) -> Result<(), MameError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Open or create the database at `path`.
pub fn open_database(path: &Path) -> Result<Connection, MameError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    create_schema(&conn)?;
    Ok(conn)
}

pub struct MameDbProvider {
    path: PathBuf,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl MameDbProvider {
    pub const NAME: &'static str = "mame";

    pub fn open(path: &Path) -> Result<Self, MameError> {
        let conn = open_database(path)?;
        log::debug!("opened MAME database {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.conn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[async_trait]
impl MetadataProvider for MameDbProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn lookup(&self, rom: &RomIdentity) -> Result<ProviderGame, ProviderError> {
        let conn = Arc::clone(&self.conn);
        let name = rom.stem.to_lowercase();
        let base = self.path.parent().map(Path::to_path_buf).unwrap_or_default();

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            let conn = guard.as_ref().ok_or(ProviderError::Closed(Self::NAME))?;
            query_game(conn, &name, &base)
        })
        .await
        .map_err(|e| ProviderError::other(format!("MAME lookup task failed: {e}")))?
    }

    fn close(&self) {
        let taken = self
            .conn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(conn) = taken {
            if let Err((_, e)) = conn.close() {
                log::warn!("error closing MAME database {}: {}", self.path.display(), e);
            } else {
                log::debug!("closed MAME database {}", self.path.display());
            }
        }
    }
}

fn query_game(conn: &Connection, name: &str, base: &Path) -> Result<ProviderGame, ProviderError> {
    let row = conn
        .query_row(
            "SELECT title, overview, rating, release_date, developer, publisher, genre,
                    players, title_image, marquee_image, snap_image
             FROM games WHERE name = ?1",
            params![name],
            |row| {
                Ok((
                    ProviderGame {
                        id: name.to_string(),
                        source: MameDbProvider::NAME,
                        title: row.get(0)?,
                        overview: row.get(1)?,
                        rating: row.get(2)?,
                        release_date: row.get(3)?,
                        developer: row.get(4)?,
                        publisher: row.get(5)?,
                        genre: row.get(6)?,
                        players: row.get(7)?,
                        ..Default::default()
                    },
                    [
                        (ArtworkVariant::Thumbnail, row.get::<_, String>(8)?),
                        (ArtworkVariant::Medium, row.get::<_, String>(9)?),
                        (ArtworkVariant::Screenshot, row.get::<_, String>(10)?),
                    ],
                ))
            },
        )
        .optional()
        .map_err(|e| ProviderError::other(format!("MAME query failed: {e}")))?;

    let Some((mut game, images)) = row else {
        return Err(ProviderError::NotFound);
    };
    for (variant, value) in images {
        game = game.with_artwork(variant, image_reference(&value, base));
    }
    Ok(game)
}

/// URLs stay remote; anything else is a path relative to the database.
fn image_reference(value: &str, base: &Path) -> Artwork {
    let value = value.trim();
    if value.is_empty() {
        Artwork::None
    } else if value.starts_with("http://") || value.starts_with("https://") {
        Artwork::Http(value.to_string())
    } else {
        Artwork::LocalFile(base.join(value))
    }
}

#[cfg(test)]
#[path = "tests/mame_tests.rs"]
mod tests;
