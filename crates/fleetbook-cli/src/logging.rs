// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_TARGETS: [&str; 3] = ["fleetbook", "fleetbook_app", "fleetbook_tui"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Use the configured level.
    #[default]
    Normal,
    /// Debug and above regardless of config.
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Self {
        if verbose { Self::Verbose } else { Self::Normal }
    }

    fn level<'a>(self, configured: &'a str) -> &'a str {
        match self {
            Self::Verbose if configured != "trace" => "debug",
            _ => configured,
        }
    }
}

/// Per-crate filter directives, e.g. `fleetbook=info,fleetbook_app=info,..`.
pub fn default_filter(configured_level: &str, verbosity: Verbosity) -> String {
    let level = verbosity.level(configured_level);
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs a file-backed subscriber. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr. `RUST_LOG` overrides the level.
pub fn init_logging(path: &Path, configured_level: &str, verbosity: Verbosity) -> Result<()> {
    let subscriber = file_subscriber(path, configured_level, verbosity)?;
    // Already installed in this process is fine.
    let _ = subscriber.try_init();
    Ok(())
}

pub fn file_subscriber(
    path: &Path,
    configured_level: &str,
    verbosity: Verbosity,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(configured_level, verbosity)));

    Ok(tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false),
    ))
}

#[cfg(test)]
mod tests {
    use super::{Verbosity, default_filter, init_logging};
    use anyhow::Result;

    #[test]
    fn verbose_raises_level_to_debug() {
        assert_eq!(
            default_filter("info", Verbosity::Normal),
            "fleetbook=info,fleetbook_app=info,fleetbook_tui=info"
        );
        assert_eq!(
            default_filter("warn", Verbosity::Verbose),
            "fleetbook=debug,fleetbook_app=debug,fleetbook_tui=debug"
        );
        assert_eq!(
            default_filter("trace", Verbosity::Verbose),
            "fleetbook=trace,fleetbook_app=trace,fleetbook_tui=trace"
        );
    }

    #[test]
    fn from_flag_maps_bool() {
        assert_eq!(Verbosity::from_flag(true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flag(false), Verbosity::default());
    }

    #[test]
    fn init_creates_missing_log_directory() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("fleetbook.log");
        init_logging(&path, "info", Verbosity::Normal)?;
        assert!(path.exists());
        Ok(())
    }
}
