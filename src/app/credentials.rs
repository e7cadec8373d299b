//! Bearer token and base URL loading.
//!
//! Priority for the token: `CANVAS_TOKEN` > config file `canvas_api_key`.
//! Priority for the base URL: `--base-url` > `CANVAS_BASE_URL` > config file
//! `canvas_base_url` > built-in default.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use canvas_export_core::api::DEFAULT_BASE_URL;
use serde::Deserialize;

use crate::cli::Args;

pub(crate) const TOKEN_ENV_VAR: &str = "CANVAS_TOKEN";
pub(crate) const BASE_URL_ENV_VAR: &str = "CANVAS_BASE_URL";

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_DIR_NAME: &str = "canvas-export";

/// JSON config file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FileConfig {
    pub(crate) canvas_api_key: Option<String>,
    pub(crate) canvas_base_url: Option<String>,
}

/// Values the environment provides, captured once so resolution stays pure.
#[derive(Debug, Clone, Default)]
pub(crate) struct EnvValues {
    pub(crate) token: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) xdg_config_home: Option<PathBuf>,
    pub(crate) home: Option<PathBuf>,
}

impl EnvValues {
    pub(crate) fn from_process() -> Self {
        Self {
            token: non_blank(env::var(TOKEN_ENV_VAR).ok()),
            base_url: non_blank(env::var(BASE_URL_ENV_VAR).ok()),
            xdg_config_home: env::var_os("XDG_CONFIG_HOME")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            home: env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Resolved connection settings.
#[derive(Clone)]
pub(crate) struct Settings {
    pub(crate) token: String,
    pub(crate) base_url: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Resolves the token and base URL from args, environment and config file.
///
/// The config file is only read when the environment does not already supply
/// the token. A missing token is an error.
pub(crate) fn resolve_settings(args: &Args, env_values: &EnvValues, cwd: &Path) -> Result<Settings> {
    let needs_file = env_values.token.is_none()
        || (args.base_url.is_none() && env_values.base_url.is_none());

    let file_config = if needs_file {
        match resolve_config_path(args.config.as_deref(), env_values, cwd) {
            Some(path) => Some(load_file_config(&path)?),
            None => None,
        }
    } else {
        None
    };
    let file_config = file_config.unwrap_or_default();

    let Some(token) = env_values
        .token
        .clone()
        .or_else(|| non_blank(file_config.canvas_api_key.clone()))
    else {
        bail!(
            "No API token found: set {TOKEN_ENV_VAR} or put `canvas_api_key` in {CONFIG_FILE_NAME}"
        );
    };

    let base_url = args
        .base_url
        .clone()
        .or_else(|| env_values.base_url.clone())
        .or_else(|| non_blank(file_config.canvas_base_url))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    Ok(Settings { token, base_url })
}

/// Finds the config file to read.
///
/// An explicit path is always returned (and must then exist). Otherwise the
/// first existing of `./config.json`, `$XDG_CONFIG_HOME/canvas-export/config.json`,
/// `$HOME/.config/canvas-export/config.json` is used.
pub(crate) fn resolve_config_path(
    explicit: Option<&Path>,
    env_values: &EnvValues,
    cwd: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    let xdg = env_values
        .xdg_config_home
        .as_ref()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    let home = env_values
        .home
        .as_ref()
        .map(|dir| dir.join(".config").join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));

    std::iter::once(local)
        .chain(xdg)
        .chain(home)
        .find(|candidate| candidate.is_file())
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    Ok(serde_json::from_str(raw)?)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
