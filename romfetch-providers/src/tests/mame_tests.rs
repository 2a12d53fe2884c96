use super::*;

fn rom(file_name: &str) -> RomIdentity {
    let path = PathBuf::from("/roms/arcade").join(file_name);
    RomIdentity {
        stem: path.file_stem().unwrap().to_string_lossy().into_owned(),
        extension: "zip".to_string(),
        file_name: file_name.to_string(),
        path,
        size: 4096,
        platform: None,
    }
}

fn seeded_db(dir: &Path) -> PathBuf {
    let path = dir.join("mame.db");
    let conn = open_database(&path).unwrap();
    conn.execute(
        "INSERT INTO games (name, title, rating, developer, players, title_image, snap_image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            "pacman",
            "Pac-Man",
            0.8,
            "Namco",
            2,
            "https://example.com/titles/pacman.png",
            "snaps/pacman.png"
        ],
    )
    .unwrap();
    path
}

#[tokio::test]
async fn finds_romset_by_archive_stem() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MameDbProvider::open(&seeded_db(dir.path())).unwrap();

    let game = provider.lookup(&rom("pacman.zip")).await.unwrap();

    assert_eq!(game.title, "Pac-Man");
    assert_eq!(game.developer, "Namco");
    assert_eq!(game.players, 2);
    assert_eq!(game.source, "mame");
    assert_eq!(
        game.artwork(ArtworkVariant::Thumbnail),
        Some(&Artwork::Http(
            "https://example.com/titles/pacman.png".to_string()
        ))
    );
    assert_eq!(game.artwork(ArtworkVariant::Medium), None);
    assert_eq!(
        game.artwork(ArtworkVariant::Screenshot),
        Some(&Artwork::LocalFile(dir.path().join("snaps/pacman.png")))
    );
}

#[tokio::test]
async fn stem_match_ignores_case() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MameDbProvider::open(&seeded_db(dir.path())).unwrap();
    assert!(provider.lookup(&rom("PACMAN.zip")).await.is_ok());
}

#[tokio::test]
async fn unknown_romset_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MameDbProvider::open(&seeded_db(dir.path())).unwrap();
    let err = provider.lookup(&rom("galaga.zip")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn lookup_after_close_fails() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MameDbProvider::open(&seeded_db(dir.path())).unwrap();

    provider.close();
    provider.close();

    assert!(provider.is_closed());
    let err = provider.lookup(&rom("pacman.zip")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Closed("mame")));
    assert!(!err.is_retryable());
}

#[test]
fn opening_creates_an_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mame.db");
    let provider = MameDbProvider::open(&path).unwrap();
    assert!(path.exists());
    assert!(!provider.is_closed());
}
