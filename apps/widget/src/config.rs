use std::{collections::HashMap, fs, path::Path};

use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "widget.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_endpoint: String,
    pub jwt: Option<String>,
    pub storage_scheme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: "http://localhost:8060/api".into(),
            jwt: None,
            storage_scheme: widget_core::DEFAULT_STORAGE_SCHEME.into(),
        }
    }
}

/// Defaults, then `config_path` if it exists, then the process environment.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(%error, "ignoring unreadable widget config");
            return;
        }
    };

    if let Some(v) = file_cfg.get("api_endpoint") {
        settings.api_endpoint = v.clone();
    }
    if let Some(v) = file_cfg.get("jwt") {
        settings.jwt = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("storage_scheme") {
        settings.storage_scheme = v.clone();
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("API_ENDPOINT") {
        settings.api_endpoint = v;
    }
    if let Some(v) = lookup("APP__API_ENDPOINT") {
        settings.api_endpoint = v;
    }

    if let Some(v) = lookup("APP__JWT") {
        settings.jwt = Some(v);
    }

    if let Some(v) = lookup("APP__STORAGE_SCHEME") {
        settings.storage_scheme = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
