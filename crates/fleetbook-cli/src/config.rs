// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use fleetbook_app::{DEFAULT_USER_NAME, Language, NotificationWindow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "fleetbook";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "FLEETBOOK_CONFIG_PATH";
const DEFAULT_POLL_INTERVAL: &str = "30s";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            notifications: Notifications::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notifications {
    pub window: Option<String>,
    pub poll_interval: Option<String>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            window: Some(NotificationWindow::default().to_string()),
            poll_interval: Some(DEFAULT_POLL_INTERVAL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub language: Option<String>,
    pub user_name: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            language: Some(Language::English.code().to_owned()),
            user_name: Some(DEFAULT_USER_NAME.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub file: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            file: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is missing `version = 1`; add it at the top of the file",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(window) = &self.notifications.window
            && NotificationWindow::parse(window).is_none()
        {
            bail!(
                "notifications.window in {} must be \"<N>d\" or \"month\", got {window:?}",
                path.display()
            );
        }

        if let Some(interval) = &self.notifications.poll_interval {
            let parsed = parse_duration(interval).with_context(|| {
                format!("notifications.poll_interval in {}", path.display())
            })?;
            if parsed.is_zero() {
                bail!(
                    "notifications.poll_interval in {} must be positive, got {interval}",
                    path.display()
                );
            }
        }

        if let Some(language) = &self.ui.language
            && Language::parse(language).is_none()
        {
            bail!(
                "ui.language in {} must be \"en\" or \"jp\", got {language:?}",
                path.display()
            );
        }

        if let Some(user_name) = &self.ui.user_name
            && user_name.trim().is_empty()
        {
            bail!("ui.user_name in {} must not be empty", path.display());
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn seed_path(&self) -> Option<PathBuf> {
        self.data.seed_path.as_deref().map(PathBuf::from)
    }

    pub fn notification_window(&self) -> NotificationWindow {
        self.notifications
            .window
            .as_deref()
            .and_then(NotificationWindow::parse)
            .unwrap_or_default()
    }

    pub fn poll_interval(&self) -> Result<Duration> {
        parse_duration(
            self.notifications
                .poll_interval
                .as_deref()
                .unwrap_or(DEFAULT_POLL_INTERVAL),
        )
    }

    pub fn language(&self) -> Language {
        self.ui
            .language
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or(Language::English)
    }

    pub fn user_name(&self) -> &str {
        self.ui.user_name.as_deref().unwrap_or(DEFAULT_USER_NAME)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_dir()
            .ok_or_else(|| anyhow!("cannot resolve data directory; set [log].file explicitly"))?;
        Ok(data_root.join(APP_NAME).join("fleetbook.log"))
    }

    pub fn log_level(&self) -> String {
        self.log
            .level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_ascii_lowercase()
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# fleetbook config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. Default is the bundled sample dataset\n# seed_path = \"/absolute/path/to/vehicles.json\"\n\n[notifications]\n# \"<N>d\" (inclusive day count) or \"month\"\nwindow = \"{}\"\npoll_interval = \"{}\"\n\n[ui]\nlanguage = \"en\"\nuser_name = \"{}\"\n\n[log]\n# file = \"/absolute/path/to/fleetbook.log\"\nlevel = \"{}\"\n",
            path.display(),
            NotificationWindow::default(),
            DEFAULT_POLL_INTERVAL,
            DEFAULT_USER_NAME,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 30s)")
}
