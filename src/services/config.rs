// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Per-environment fetch configuration read from `<base>/<env>.ini`.

use crate::models::config::{FetchConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use ini::{Ini, Properties};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const SECTION: &str = "COMMON";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment name: {0:?}")]
    InvalidEnv(String),
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("Config file {0} has no [COMMON] section")]
    MissingSection(PathBuf),
    #[error("Invalid timeout {value:?} in {path}: expected whole seconds")]
    InvalidTimeout { path: PathBuf, value: String },
}

/// Load the fetch configuration for `env` from `base_path/<env>.ini`
pub fn load_config(env: &str, base_path: impl AsRef<Path>) -> Result<FetchConfig, ConfigError> {
    let path = config_path(env, base_path.as_ref())?;
    info!("Reading config from path: {}", path.display());

    let ini = Ini::load_from_file(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let section = ini
        .section(Some(SECTION))
        .ok_or_else(|| ConfigError::MissingSection(path.clone()))?;

    from_section(section, &path)
}

/// Path of the INI file for `env`. Environment names are restricted to
/// `[A-Za-z0-9_-]` so a request cannot point outside `base_path`.
pub fn config_path(env: &str, base_path: &Path) -> Result<PathBuf, ConfigError> {
    let valid = !env.is_empty()
        && env
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ConfigError::InvalidEnv(env.to_string()));
    }
    Ok(base_path.join(format!("{}.ini", env)))
}

fn from_section(section: &Properties, path: &Path) -> Result<FetchConfig, ConfigError> {
    let user_agent = section
        .get("user_agent")
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .unwrap_or(DEFAULT_USER_AGENT);

    let timeout_secs = match section.get("timeout") {
        None => DEFAULT_TIMEOUT_SECS,
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout {
                path: path.to_path_buf(),
                value: raw.to_string(),
            })?,
    };

    Ok(FetchConfig::new(user_agent, Duration::from_secs(timeout_secs)))
}
