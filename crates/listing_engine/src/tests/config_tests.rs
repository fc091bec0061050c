use std::{
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("listing_engine_settings_{suffix}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key: &str| pairs.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/listings.toml"), env_from(&[]));
    assert_eq!(settings, EngineSettings::default());
    assert_eq!(settings.page_size, 20);
    assert_eq!(settings.sort, "createdAt,DESC");
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "base_url = \"https://catalog.example.com\"\n\
         page_size = 50\n\
         request_timeout_secs = \"10\"\n",
    );
    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.base_url, "https://catalog.example.com");
    assert_eq!(settings.page_size, 50);
    assert_eq!(settings.request_timeout_secs, 10);
    assert_eq!(settings.sort, "createdAt,DESC");
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn environment_wins_over_file() {
    let path = temp_settings_file("base_url = \"https://file.example.com\"\npage_size = 50\n");
    let settings = load_settings_from(
        &path,
        env_from(&[
            ("LISTINGS_BASE_URL", "https://legacy.example.com"),
            ("APP__BASE_URL", "https://env.example.com"),
            ("APP__PAGE_SIZE", "10"),
            ("APP__SORT", "price,ASC"),
        ]),
    );
    assert_eq!(settings.base_url, "https://env.example.com");
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.sort, "price,ASC");
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn unparseable_numbers_are_ignored() {
    let settings = load_settings_from(
        Path::new("/nonexistent/listings.toml"),
        env_from(&[("APP__PAGE_SIZE", "lots"), ("APP__REQUEST_TIMEOUT_SECS", "-1")]),
    );
    assert_eq!(settings.page_size, 20);
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn base_url_is_validated_and_trimmed() {
    assert_eq!(
        prepare_base_url(" https://catalog.example.com/ ").expect("valid"),
        "https://catalog.example.com"
    );
    assert!(prepare_base_url("catalog.example.com").is_err());
    assert!(prepare_base_url("ftp://catalog.example.com").is_err());
}
