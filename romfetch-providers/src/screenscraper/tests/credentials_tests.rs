use super::*;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var| map.get(var).cloned()
}

#[test]
fn env_overrides_file() {
    let file = FileCredentials {
        dev_id: Some("file-id".into()),
        dev_password: Some("file-pw".into()),
        user_id: Some("file-user".into()),
        ..Default::default()
    };
    let creds = Credentials::resolve(
        env_from(&[("SCREENSCRAPER_DEVID", "env-id"), ("SCREENSCRAPER_SSID", "env-user")]),
        file,
    )
    .unwrap();

    assert_eq!(creds.dev_id, "env-id");
    assert_eq!(creds.dev_password, "file-pw");
    assert_eq!(creds.user_id.as_deref(), Some("env-user"));
    assert_eq!(creds.user_password, None);
}

#[test]
fn soft_name_defaults() {
    let creds = Credentials::resolve(
        env_from(&[
            ("SCREENSCRAPER_DEVID", "id"),
            ("SCREENSCRAPER_DEVPASSWORD", "pw"),
        ]),
        FileCredentials::default(),
    )
    .unwrap();
    assert_eq!(creds.soft_name, "romfetch");
}

#[test]
fn missing_dev_info_is_a_config_error() {
    if EMBEDDED_DEV_ID.is_some() {
        return;
    }
    let err = Credentials::resolve(env_from(&[]), FileCredentials::default()).unwrap_err();
    assert!(matches!(err, ScreenScraperError::Config(_)));
}

#[test]
fn deobfuscate_reverses_xor() {
    let encoded: Vec<u8> = b"secret"
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ DEV_INFO_KEY[i % DEV_INFO_KEY.len()])
        .collect();
    assert_eq!(deobfuscate(&encoded).as_deref(), Some("secret"));
}
