use super::*;

fn identity(id: &str) -> CachedIdentity {
    CachedIdentity {
        game_id: id.to_string(),
        title: format!("Game {}", id),
    }
}

#[test]
fn insert_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let cache = HashCache::open(dir.path()).unwrap();
    assert!(cache.is_empty());

    cache.insert("ss", "abc123", identity("42")).unwrap();

    assert_eq!(cache.get("ss", "abc123"), Some(identity("42")));
    assert_eq!(cache.get("thegamesdb", "abc123"), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let cache = HashCache::open(dir.path()).unwrap();
        cache.insert("ss", "abc123", identity("42")).unwrap();
    }
    let reopened = HashCache::open(dir.path()).unwrap();
    assert_eq!(reopened.get("ss", "abc123"), Some(identity("42")));
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CACHE_FILE), "{ not json").unwrap();

    let cache = HashCache::open(dir.path()).unwrap();
    assert!(cache.is_empty());
}

#[test]
fn other_version_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let stale = r#"{"version":999,"providers":{"ss":{"abc":{"game_id":"1","title":"Old"}}}}"#;
    std::fs::write(dir.path().join(CACHE_FILE), stale).unwrap();

    let cache = HashCache::open(dir.path()).unwrap();
    assert_eq!(cache.get("ss", "abc"), None);
}

#[test]
fn creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let cache = HashCache::open(&nested).unwrap();
    cache.insert("mame", "ff", identity("pacman")).unwrap();
    assert!(nested.join(CACHE_FILE).exists());
}

#[test]
fn shared_returns_one_instance_per_directory() {
    let dir = tempfile::tempdir().unwrap();
    let first = HashCache::shared(dir.path()).unwrap();
    let second = HashCache::shared(&dir.path().join(".")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    first.insert("ss", "abc123", identity("42")).unwrap();
    assert_eq!(second.get("ss", "abc123"), Some(identity("42")));

    let other = tempfile::tempdir().unwrap();
    let elsewhere = HashCache::shared(other.path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &elsewhere));
    assert!(elsewhere.is_empty());
}

#[test]
fn older_handle_keeps_entries_written_by_newer_one() {
    let dir = tempfile::tempdir().unwrap();
    let old = HashCache::open(dir.path()).unwrap();
    let new = HashCache::open(dir.path()).unwrap();

    new.insert("thegamesdb", "aaa", identity("1")).unwrap();
    old.insert("screenscraper", "bbb", identity("2")).unwrap();

    let reopened = HashCache::open(dir.path()).unwrap();
    assert_eq!(reopened.get("thegamesdb", "aaa"), Some(identity("1")));
    assert_eq!(reopened.get("screenscraper", "bbb"), Some(identity("2")));
    assert_eq!(old.get("thegamesdb", "aaa"), Some(identity("1")));
}

#[test]
fn writes_leave_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let cache = HashCache::open(dir.path()).unwrap();
    cache.insert("ss", "a", identity("1")).unwrap();
    cache.insert("ss", "b", identity("2")).unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec![CACHE_FILE.to_string()]);
}

#[tokio::test]
async fn insert_async_persists() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(HashCache::open(dir.path()).unwrap());

    cache
        .insert_async("thegamesdb", "abc", identity("136"))
        .await
        .unwrap();

    assert_eq!(cache.get("thegamesdb", "abc"), Some(identity("136")));
    let reopened = HashCache::open(dir.path()).unwrap();
    assert_eq!(reopened.get("thegamesdb", "abc"), Some(identity("136")));
}
