//! Runtime configuration: defaults, an optional TOML file, then environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use tourbook_api::types::Locale;

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::TourbookError;
use crate::pagination::Sentinel;

pub const DEFAULT_BASE_URL: &str = "https://api.tourbook.uz/api";
pub const DEFAULT_TELEGRAM: &str = "tourbook_support";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub locale: Locale,
    /// Telegram username that receives booking requests.
    pub telegram: String,
    pub debounce: Duration,
    pub sentinel_px: f64,
    pub store_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: Locale::default(),
            telegram: DEFAULT_TELEGRAM.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            sentinel_px: Sentinel::DEFAULT_THRESHOLD_PX,
            store_path: default_store_path(),
        }
    }
}

/// Shape of the optional config file. Every key may be omitted.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    lang: Option<Locale>,
    telegram: Option<String>,
    debounce_ms: Option<u64>,
    sentinel_px: Option<f64>,
    store: Option<PathBuf>,
}

fn default_store_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".tourbook").join("store.sqlite3"),
        None => PathBuf::from("tourbook.sqlite3"),
    }
}

fn parsed<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("ignoring invalid value {:?} for {}", value, key);
            None
        }
    }
}

impl Config {
    /// Defaults overridden by the `TOURBOOK_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().apply_vars(|key| std::env::var(key).ok())
    }

    /// Defaults, then `path` (when given), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, TourbookError> {
        let config = match path {
            Some(path) => Self::default().apply_file(path)?,
            None => Self::default(),
        };
        Ok(config.apply_vars(|key| std::env::var(key).ok()))
    }

    /// Overlays the keys present in a TOML file.
    pub fn apply_file(self, path: &Path) -> Result<Self, TourbookError> {
        let text = std::fs::read_to_string(path)?;
        self.apply_toml(&text)
            .map_err(|e| TourbookError::Config(format!("{}: {}", path.display(), e)))
    }

    fn apply_toml(mut self, text: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(text)?;
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(locale) = file.lang {
            self.locale = locale;
        }
        if let Some(telegram) = file.telegram {
            self.telegram = telegram;
        }
        if let Some(ms) = file.debounce_ms {
            self.debounce = Duration::from_millis(ms);
        }
        if let Some(px) = file.sentinel_px {
            self.sentinel_px = px;
        }
        if let Some(store) = file.store {
            self.store_path = store;
        }
        Ok(self)
    }

    /// Overlays variables read through `lookup`. Unparseable values are logged and ignored.
    pub fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(base_url) = lookup("TOURBOOK_BASE_URL") {
            self.base_url = base_url.trim().to_string();
        }
        if let Some(locale) = lookup("TOURBOOK_LANG") {
            match locale.parse::<Locale>() {
                Ok(locale) => self.locale = locale,
                Err(()) => tracing::warn!("ignoring unknown TOURBOOK_LANG {:?}", locale),
            }
        }
        if let Some(telegram) = lookup("TOURBOOK_TELEGRAM") {
            self.telegram = telegram.trim().to_string();
        }
        if let Some(ms) = parsed::<u64>("TOURBOOK_DEBOUNCE_MS", lookup("TOURBOOK_DEBOUNCE_MS")) {
            self.debounce = Duration::from_millis(ms);
        }
        if let Some(px) = parsed::<f64>("TOURBOOK_SENTINEL_PX", lookup("TOURBOOK_SENTINEL_PX")) {
            self.sentinel_px = px;
        }
        if let Some(store) = lookup("TOURBOOK_STORE") {
            self.store_path = PathBuf::from(store.trim());
        }
        self
    }

    pub fn sentinel(&self) -> Sentinel {
        Sentinel::new(self.sentinel_px)
    }
}
