use super::*;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.max_in_flight, 8);
    assert_eq!(settings.retry_backoff_ms, 0);
    assert!(!settings.add_not_found);
    assert_eq!(settings.regions[0], "us");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "max_in_flight = 2\nadd_not_found = true\n\n[thegamesdb]\napi_key = \"k\"\n",
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.max_in_flight, 2);
    assert!(settings.add_not_found);
    assert_eq!(settings.thegamesdb.api_key.as_deref(), Some("k"));
    assert_eq!(settings.permit_timeout_secs, 60);
    assert_eq!(settings.languages, vec!["en".to_string()]);
}

#[test]
fn invalid_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "max_in_flight = \"lots\"").unwrap();

    assert!(matches!(
        Settings::load_from(&path),
        Err(SettingsError::Parse { .. })
    ));
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let settings = Settings {
        cache_dir: dir.path().join("cache"),
        retry_backoff_ms: 250,
        ..Settings::default()
    };

    settings.save_to(&path).unwrap();
    assert_eq!(Settings::load_from(&path).unwrap(), settings);
}

#[test]
fn mame_db_defaults_under_cache_dir() {
    let settings = Settings {
        cache_dir: PathBuf::from("/tmp/rf"),
        ..Settings::default()
    };
    assert_eq!(settings.mame_db_path(), PathBuf::from("/tmp/rf/mame.db"));
}

#[test]
fn zero_in_flight_is_clamped() {
    let settings = Settings {
        max_in_flight: 0,
        ..Settings::default()
    };
    assert_eq!(settings.max_in_flight(), 1);
}

#[test]
fn id_table_defaults_under_cache_dir() {
    let mut settings = Settings {
        cache_dir: PathBuf::from("/tmp/rf"),
        ..Settings::default()
    };
    assert_eq!(
        settings.id_table_path(),
        PathBuf::from("/tmp/rf/thegamesdb-ids.toml")
    );

    settings.thegamesdb.id_table = Some(PathBuf::from("/data/ids.toml"));
    assert_eq!(settings.id_table_path(), PathBuf::from("/data/ids.toml"));
}
