use log::{LevelFilter, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tourney_api::client::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const URL_ENV: &str = "TOURNEY_ADMIN_URL";
pub const TIMEOUT_ENV: &str = "TOURNEY_ADMIN_TIMEOUT";
pub const LOG_ENV: &str = "TOURNEY_ADMIN_LOG";

/// Optional `config.json`. Every field may be left out.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub base_url: String,
    pub timeout: Duration,
    pub log_level: LevelFilter,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: LevelFilter::Info,
        }
    }
}

impl AppSettings {
    /// Defaults, then the config file, then the environment, then `--url`.
    pub fn load(url_override: Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(path) = config_path()
            && let Some(file) = read_config(&path)
        {
            settings.apply_file(file);
        }
        settings.apply_env(|key| std::env::var(key).ok());
        if let Some(url) = url_override {
            settings.base_url = url;
        }
        settings
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(secs) = file.timeout_secs.filter(|s| *s > 0) {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(level) = file.log_level.as_deref().and_then(parse_level) {
            self.log_level = level;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout = Duration::from_secs(secs),
                _ => warn!("ignoring {TIMEOUT_ENV}={raw}: expected a positive number of seconds"),
            }
        }
        if let Some(level) = var(LOG_ENV).as_deref().and_then(parse_level) {
            self.log_level = level;
        }
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    let level = LevelFilter::from_str(raw.trim()).ok();
    if level.is_none() {
        warn!("unknown log level {raw:?}");
    }
    level
}

fn config_path() -> Option<PathBuf> {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return Some(PathBuf::from(config_dir).join("tourney-admin").join("config.json"));
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("tourney-admin")
                .join("config.json"),
        );
    }
    None
}

/// A missing file is normal; an unreadable or malformed one is logged and skipped.
fn read_config(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("ignoring {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = AppSettings::default();
        assert_eq!(settings.base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert!(!settings.full_screen);
    }

    #[test]
    fn env_overrides_file() {
        let mut settings = AppSettings::default();
        let file: ConfigFile = serde_json::from_str(
            r#"{"base_url": "http://league.local", "timeout_secs": 30, "log_level": "debug"}"#,
        )
        .unwrap();
        settings.apply_file(file);
        assert_eq!(settings.base_url, "http://league.local");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.log_level, LevelFilter::Debug);

        settings.apply_env(env(&[(URL_ENV, "http://10.0.0.2:5000"), (LOG_ENV, "warn")]));
        assert_eq!(settings.base_url, "http://10.0.0.2:5000");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.log_level, LevelFilter::Warn);
    }

    #[test]
    fn bad_values_are_ignored() {
        let mut settings = AppSettings::default();
        settings.apply_env(env(&[(TIMEOUT_ENV, "soon"), (LOG_ENV, "loud"), (URL_ENV, "  ")]));
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_config_file_parses() {
        let file: ConfigFile = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        let mut settings = AppSettings::default();
        settings.apply_file(file);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }
}
