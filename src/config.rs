//! Resize configuration and the shared TOML layering helpers.
//!
//! The thumbnailer reads an optional `resize.toml` from the directory it is
//! asked to process. Values in the file are merged over the stock defaults,
//! so a file only needs the keys it wants to change:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! thumbnail = [64, 64]                      # Thumbnail size written next to the original
//! full = [256, 256]                         # Size the original is overwritten with
//! extensions = ["jpg", "jpeg", "png", "gif"] # Case-insensitive, without the dot
//! filter = "lanczos3"                       # nearest | triangle | catmull-rom | gaussian | lanczos3
//! quality = 75                              # JPEG quality (1-100)
//! ```
//!
//! The marker suffix that flags already-thumbnailed files is derived from
//! the thumbnail size (`_64x64` for the defaults).
//!
//! Unknown keys are rejected to catch typos early.
//!
//! [`merge_toml`] is also used by [`crate::settings`] for `settings.toml`.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the resize root.
pub const CONFIG_FILE_NAME: &str = "resize.toml";

/// Extensions the imaging backend can encode. The thumbnail keeps the
/// original's extension, so only these may be configured.
pub const WRITABLE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config file not found: {0}")]
    NotFound(std::path::PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resampling filter used for both the thumbnail and the full-size copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl Filter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
            Filter::CatmullRom => FilterType::CatmullRom,
            Filter::Gaussian => FilterType::Gaussian,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Thumbnailer configuration loaded from `resize.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// `[width, height]` of the thumbnail written next to each original.
    pub thumbnail: [u32; 2],
    /// `[width, height]` the original is overwritten with.
    pub full: [u32; 2],
    /// Extensions (without dot) that are processed. Matched case-insensitively.
    pub extensions: Vec<String>,
    pub filter: Filter,
    /// JPEG encoding quality (1-100). Ignored for lossless formats.
    pub quality: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            thumbnail: [64, 64],
            full: [256, 256],
            extensions: WRITABLE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            filter: Filter::default(),
            quality: 75,
        }
    }
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail.contains(&0) {
            return Err(ConfigError::Validation(
                "thumbnail dimensions must be non-zero".into(),
            ));
        }
        if self.full.contains(&0) {
            return Err(ConfigError::Validation(
                "full dimensions must be non-zero".into(),
            ));
        }
        if self.thumbnail == self.full {
            return Err(ConfigError::Validation(
                "thumbnail and full sizes must differ".into(),
            ));
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.'))
        {
            return Err(ConfigError::Validation(format!(
                "extension {bad:?} must be non-empty and given without the leading dot"
            )));
        }
        if let Some(bad) = self.extensions.iter().find(|e| {
            !WRITABLE_EXTENSIONS
                .iter()
                .any(|w| w.eq_ignore_ascii_case(e))
        }) {
            return Err(ConfigError::Validation(format!(
                "extension {bad:?} cannot be written; supported: {}",
                WRITABLE_EXTENSIONS.join(", ")
            )));
        }
        Ok(())
    }

    /// Marker suffix appended to thumbnail stems, e.g. `_64x64`.
    pub fn marker(&self) -> String {
        format!("_{}x{}", self.thumbnail[0], self.thumbnail[1])
    }

    /// Case-insensitive extension check (`ext` without the dot).
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ResizeConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a TOML file as a raw value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_toml(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ResizeConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `resize.toml` from the given directory, falling back to defaults.
pub fn load_config(root: &Path) -> Result<ResizeConfig, ConfigError> {
    let path = root.join(CONFIG_FILE_NAME);
    let overlay = load_raw_toml(&path)?;
    if overlay.is_some() {
        tracing::debug!(path = %path.display(), "loaded resize config");
    }
    resolve_config(overlay)
}

/// Load a config from an explicit file path. The file must exist.
pub fn load_config_file(path: &Path) -> Result<ResizeConfig, ConfigError> {
    let overlay =
        load_raw_toml(path)?.ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))?;
    tracing::debug!(path = %path.display(), "loaded resize config");
    resolve_config(Some(overlay))
}

/// Returns a fully-commented stock `resize.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# battlecode-tools resize configuration
# =====================================
# Place this file as resize.toml in the directory you run `resize` on.
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Thumbnail size as [width, height]. A copy of every image is written next to
# the original with the suffix _<width>x<height> (e.g. logo_64x64.png).
# Files whose name already contains that suffix are never processed.
thumbnail = [64, 64]

# Size the original file is overwritten with, as [width, height].
full = [256, 256]

# Extensions to process, without the dot. Matching is case-insensitive;
# every other file is left untouched.
extensions = ["jpg", "jpeg", "png", "gif"]

# Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3.
filter = "lanczos3"

# JPEG encoding quality (1-100). PNG and GIF output is lossless.
quality = 75
"##
}
