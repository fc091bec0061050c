use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "listings.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    pub base_url: String,
    pub page_size: u32,
    pub sort: String,
    pub request_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            page_size: 20,
            sort: "createdAt,DESC".into(),
            request_timeout_secs: 30,
        }
    }
}

/// Defaults, then `listings.toml` in the working directory, then the environment.
pub fn load_settings() -> EngineSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> EngineSettings {
    let mut settings = EngineSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            if let Some(v) = file_cfg.get("base_url").and_then(toml::Value::as_str) {
                settings.base_url = v.to_string();
            }
            if let Some(v) = file_cfg.get("page_size").and_then(toml_u64) {
                settings.page_size = u32::try_from(v).unwrap_or(settings.page_size);
            }
            if let Some(v) = file_cfg.get("sort").and_then(toml::Value::as_str) {
                settings.sort = v.to_string();
            }
            if let Some(v) = file_cfg.get("request_timeout_secs").and_then(toml_u64) {
                settings.request_timeout_secs = v;
            }
        }
    }

    if let Some(v) = env("LISTINGS_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.page_size = parsed;
        }
    }

    if let Some(v) = env("APP__SORT") {
        settings.sort = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

/// Validates the configured service root and strips any trailing slash so endpoint
/// paths can be appended directly.
pub fn prepare_base_url(raw_base_url: &str) -> anyhow::Result<String> {
    let trimmed = raw_base_url.trim();
    let parsed = Url::parse(trimmed)
        .with_context(|| format!("invalid catalog base url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("catalog base url '{trimmed}' must use http or https");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Integer settings may be written either as numbers or as quoted strings.
fn toml_u64(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(v) => u64::try_from(*v).ok(),
        toml::Value::String(v) => v.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
