//! Credentials kept out of version control.
//!
//! Read from `dev_settings_sensitive.toml` next to `settings.toml`:
//!
//! ```toml
//! DB_PASS = "..."
//! DB_HOST = "..."
//! ADMIN_PASS = "..."
//! SENDGRID_API_KEY = "..."
//! GOOGLE_APPLICATION_CREDENTIALS = "..."
//! ```
//!
//! When the file is missing, a warning goes to stdout and every value falls
//! back to [`PLACEHOLDER`] so the rest of the settings still load.

use super::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const SENSITIVE_FILE_NAME: &str = "dev_settings_sensitive.toml";

/// Fallback value for every secret when the sensitive file is absent.
pub const PLACEHOLDER: &str = "redacted";

/// Mask used when settings are displayed.
pub const MASK: &str = "********";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct SensitiveSettings {
    pub db_pass: String,
    pub db_host: String,
    pub admin_pass: String,
    pub sendgrid_api_key: String,
    pub google_application_credentials: String,
}

impl SensitiveSettings {
    fn filled(value: &str) -> Self {
        Self {
            db_pass: value.to_string(),
            db_host: value.to_string(),
            admin_pass: value.to_string(),
            sendgrid_api_key: value.to_string(),
            google_application_credentials: value.to_string(),
        }
    }

    /// Every field set to [`PLACEHOLDER`].
    pub fn placeholder() -> Self {
        Self::filled(PLACEHOLDER)
    }

    /// Every field set to [`MASK`].
    pub fn masked() -> Self {
        Self::filled(MASK)
    }
}

// Never print secrets through `{:?}`.
impl fmt::Debug for SensitiveSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensitiveSettings")
            .field("db_pass", &MASK)
            .field("db_host", &self.db_host)
            .field("admin_pass", &MASK)
            .field("sendgrid_api_key", &MASK)
            .field("google_application_credentials", &MASK)
            .finish()
    }
}

/// Where the secrets in a [`super::Settings`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsSource {
    File(PathBuf),
    Placeholder,
}

/// Load the sensitive settings from `dir`, or fall back to placeholders.
///
/// A file that exists but does not parse (or lacks a key) is an error; only
/// absence is recovered from.
pub fn load_sensitive(dir: &Path) -> Result<(SensitiveSettings, SecretsSource), SettingsError> {
    let path = dir.join(SENSITIVE_FILE_NAME);
    if !path.exists() {
        crate::output::print_missing_sensitive();
        tracing::warn!(
            path = %path.display(),
            "sensitive settings missing, using placeholder values"
        );
        return Ok((SensitiveSettings::placeholder(), SecretsSource::Placeholder));
    }

    let content = std::fs::read_to_string(&path)?;
    let secrets: SensitiveSettings =
        toml::from_str(&content).map_err(|source| SettingsError::Sensitive {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "loaded sensitive settings");
    Ok((secrets, SecretsSource::File(path)))
}
