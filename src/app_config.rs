//! Application configuration file: shelf URL and local paths.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bookfetch_core::DEFAULT_CATALOG_URL;

/// Directory name under the user config directory.
const APP_DIR: &str = "bookfetch";

/// Config file name inside [`APP_DIR`].
const CONFIG_FILE: &str = "config.toml";

/// Database file name placed next to the config file by default.
const DATABASE_FILE: &str = "database.json";

/// Downloads directory name placed under `$HOME` by default.
const DOWNLOADS_DIR: &str = "bookfetch_downloads";

/// Everything the non-`init` commands need to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Public shelf URL books are imported from.
    pub shelf_url: String,
    /// JSON database path.
    pub database_path: PathBuf,
    /// Directory book files are saved into.
    pub downloads_path: PathBuf,
    /// Catalog base URL.
    pub catalog_url: String,
}

impl AppConfig {
    /// Reads the config file at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, or not valid config syntax.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "No config file at '{}'. Run `bookfetch init <shelf-url>` first.",
                path.display()
            );
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        parse_config_str(&raw)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Writes the config file at `path`, creating its directory.
    ///
    /// # Errors
    ///
    /// Fails when a value cannot be written as a quoted string or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory '{}'", parent.display())
            })?;
        }
        let body = self.render()?;
        fs::write(path, body)
            .with_context(|| format!("Failed to write config file '{}'", path.display()))
    }

    fn render(&self) -> Result<String> {
        let mut out = String::from("# bookfetch configuration\n");
        let database_path = self.database_path.display().to_string();
        let downloads_path = self.downloads_path.display().to_string();
        let entries = [
            ("shelf_url", self.shelf_url.as_str()),
            ("database_path", database_path.as_str()),
            ("downloads_path", downloads_path.as_str()),
            ("catalog_url", self.catalog_url.as_str()),
        ];
        for (key, value) in entries {
            out.push_str(&format!("{key} = {}\n", quote_string(key, value)?));
        }
        Ok(out)
    }
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/bookfetch/config.toml`
/// 2. `$HOME/.config/bookfetch/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join(APP_DIR).join(CONFIG_FILE));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE),
    )
}

/// Returns `explicit` or the default config path.
///
/// # Errors
///
/// Fails when no path is given and neither `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_path_or_default(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => resolve_default_config_path()
            .context("Cannot locate a config directory: set HOME or XDG_CONFIG_HOME, or pass --config"),
    }
}

/// Default database path: next to the config file.
#[must_use]
pub fn default_database_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(DATABASE_FILE), |dir| dir.join(DATABASE_FILE))
}

/// Default downloads directory: `$HOME/bookfetch_downloads`, or relative to
/// the working directory when `HOME` is unset.
#[must_use]
pub fn default_downloads_path() -> PathBuf {
    env_var_non_empty_os("HOME").map_or_else(
        || PathBuf::from(DOWNLOADS_DIR),
        |home| PathBuf::from(home).join(DOWNLOADS_DIR),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

fn parse_config_str(raw: &str) -> Result<AppConfig> {
    let mut shelf_url = None;
    let mut database_path = None;
    let mut downloads_path = None;
    let mut catalog_url = None;

    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let parsed = parse_string_literal(raw_value.trim())
            .with_context(|| format!("Invalid `{key}` value on line {}", line_index + 1))?;

        match key {
            "shelf_url" => shelf_url = Some(parsed),
            "database_path" => database_path = Some(PathBuf::from(parsed)),
            "downloads_path" => downloads_path = Some(PathBuf::from(parsed)),
            "catalog_url" => catalog_url = Some(parsed),
            unknown => {
                bail!(
                    "Unknown configuration key: '{}' on line {}",
                    unknown,
                    line_index + 1
                );
            }
        }
    }

    Ok(AppConfig {
        shelf_url: shelf_url.context("Missing required key `shelf_url`")?,
        database_path: database_path.context("Missing required key `database_path`")?,
        downloads_path: downloads_path.context("Missing required key `downloads_path`")?,
        catalog_url: catalog_url.unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
    })
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn quote_string(key: &str, value: &str) -> Result<String> {
    if value.contains('"') || value.contains('\n') {
        bail!("Value for `{key}` cannot contain quotes or newlines: {value}");
    }
    Ok(format!("\"{value}\""))
}
