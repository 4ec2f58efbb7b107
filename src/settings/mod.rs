//! Development deployment settings for the web backend.
//!
//! The backend reads its runtime parameters (database, logging, installed
//! apps, middleware) from a single [`Settings`] value built once at startup
//! by [`load_settings`] and passed around by reference.
//!
//! ## Layers
//!
//! ```text
//! stock defaults (base apps + development profile)
//!   ← settings.toml                   (optional, sparse overrides)
//!   ← development additions           (debug toolbar app + middleware)
//!   ← dev_settings_sensitive.toml     (credentials, or placeholders)
//! ```
//!
//! `settings.toml` only needs the keys it wants to change; unknown keys are
//! rejected:
//!
//! ```toml
//! debug = true
//!
//! [[admins]]
//! name = "ops"
//! email = "ops@example.com"
//!
//! [databases.default]
//! port = 5433
//! ```
//!
//! Database `password` and `host` left unset are taken from `DB_PASS` and
//! `DB_HOST` in the sensitive settings.

mod logging;
mod sensitive;

pub use logging::{HandlerConfig, LogLevel, LoggerConfig, LoggingConfig};
pub use sensitive::{
    MASK, PLACEHOLDER, SENSITIVE_FILE_NAME, SecretsSource, SensitiveSettings, load_sensitive,
};

use crate::config::{self, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the optional overrides next to the sensitive settings.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Apps every profile installs.
const BASE_INSTALLED_APPS: &[&str] = &[
    "django.contrib.admin",
    "django.contrib.auth",
    "django.contrib.contenttypes",
    "django.contrib.sessions",
    "django.contrib.messages",
    "django.contrib.staticfiles",
];

const BASE_MIDDLEWARE: &[&str] = &[
    "django.middleware.security.SecurityMiddleware",
    "django.contrib.sessions.middleware.SessionMiddleware",
    "django.middleware.common.CommonMiddleware",
    "django.middleware.csrf.CsrfViewMiddleware",
    "django.contrib.auth.middleware.AuthenticationMiddleware",
    "django.contrib.messages.middleware.MessageMiddleware",
    "django.middleware.clickjacking.XFrameOptionsMiddleware",
];

/// Appended after any overrides, in this order.
const DEV_INSTALLED_APPS: &[&str] = &["debug_toolbar"];
const DEV_MIDDLEWARE: &[&str] = &["debug_toolbar.middleware.DebugToolbarMiddleware"];

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid sensitive settings in {path}: {source}")]
    Sensitive {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Settings validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Admin {
    pub name: String,
    pub email: String,
}

/// One database connection as the framework expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub engine: String,
    pub name: String,
    pub user: String,
    /// Unset means "use `DB_PASS`".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Unset means "use `DB_HOST`".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub port: u16,
}

/// The layered, file-backed part of the settings.
///
/// Defaults are the development profile minus the development additions,
/// which [`Settings::assemble`] appends after overrides are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub debug: bool,
    pub admins: Vec<Admin>,
    pub logging: LoggingConfig,
    pub installed_apps: Vec<String>,
    pub middleware: Vec<String>,
    pub databases: BTreeMap<String, DatabaseConfig>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            debug: false,
            admins: vec![Admin {
                name: "battlecode".to_string(),
                email: "battlecode@example.com".to_string(),
            }],
            logging: LoggingConfig::default(),
            installed_apps: to_strings(BASE_INSTALLED_APPS),
            middleware: to_strings(BASE_MIDDLEWARE),
            databases: BTreeMap::from([(
                "default".to_string(),
                DatabaseConfig {
                    engine: "django.db.backends.postgresql_psycopg2".to_string(),
                    name: "battlecode".to_string(),
                    user: "battlecode".to_string(),
                    password: None,
                    host: None,
                    port: 5432,
                },
            )]),
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub debug: bool,
    pub admins: Vec<Admin>,
    pub logging: LoggingConfig,
    pub installed_apps: Vec<String>,
    pub middleware: Vec<String>,
    pub databases: BTreeMap<String, DatabaseConfig>,
    pub secrets: SensitiveSettings,
    #[serde(skip)]
    pub secrets_source: SecretsSource,
}

fn append_missing(list: &mut Vec<String>, extra: &[&str]) {
    for item in extra {
        if !list.iter().any(|existing| existing == item) {
            list.push(item.to_string());
        }
    }
}

fn find_duplicate(items: &[String]) -> Option<&String> {
    items
        .iter()
        .enumerate()
        .find(|(i, item)| items[..*i].contains(item))
        .map(|(_, item)| item)
}

impl Settings {
    /// Combine file-backed settings with credentials.
    ///
    /// Appends the development apps and middleware (once) and fills unset
    /// database passwords and hosts from the secrets.
    pub fn assemble(file: SettingsFile, secrets: SensitiveSettings, source: SecretsSource) -> Self {
        let SettingsFile {
            debug,
            admins,
            logging,
            mut installed_apps,
            mut middleware,
            mut databases,
        } = file;

        append_missing(&mut installed_apps, DEV_INSTALLED_APPS);
        append_missing(&mut middleware, DEV_MIDDLEWARE);

        for db in databases.values_mut() {
            db.password.get_or_insert_with(|| secrets.db_pass.clone());
            db.host.get_or_insert_with(|| secrets.db_host.clone());
        }

        Self {
            debug,
            admins,
            logging,
            installed_apps,
            middleware,
            databases,
            secrets,
            secrets_source: source,
        }
    }

    /// Stock settings with the given credentials.
    pub fn with_secrets(secrets: SensitiveSettings, source: SecretsSource) -> Self {
        Self::assemble(SettingsFile::default(), secrets, source)
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.logging.validate().map_err(SettingsError::Validation)?;

        if !self.databases.contains_key("default") {
            return Err(SettingsError::Validation(
                "databases must define \"default\"".into(),
            ));
        }
        for (alias, db) in &self.databases {
            if db.port == 0 {
                return Err(SettingsError::Validation(format!(
                    "databases.{alias}.port must be non-zero"
                )));
            }
            if db.engine.is_empty() || db.name.is_empty() {
                return Err(SettingsError::Validation(format!(
                    "databases.{alias} needs an engine and a name"
                )));
            }
        }

        if let Some(admin) = self.admins.iter().find(|a| !a.email.contains('@')) {
            return Err(SettingsError::Validation(format!(
                "admin {:?} has an invalid email {:?}",
                admin.name, admin.email
            )));
        }
        if let Some(app) = find_duplicate(&self.installed_apps) {
            return Err(SettingsError::Validation(format!(
                "installed_apps lists {app:?} twice"
            )));
        }
        if let Some(mw) = find_duplicate(&self.middleware) {
            return Err(SettingsError::Validation(format!(
                "middleware lists {mw:?} twice"
            )));
        }
        Ok(())
    }

    /// Copy with every credential replaced by [`MASK`], for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.secrets = SensitiveSettings::masked();
        for db in copy.databases.values_mut() {
            if db.password.is_some() {
                db.password = Some(MASK.to_string());
            }
        }
        copy
    }

    /// The database every query goes to unless routed elsewhere.
    pub fn default_database(&self) -> Option<&DatabaseConfig> {
        self.databases.get("default")
    }
}

/// Load `settings.toml` (optional) merged over the stock defaults.
pub fn load_settings_file(dir: &Path) -> Result<SettingsFile, SettingsError> {
    let base = toml::Value::try_from(SettingsFile::default())?;
    let overlay = config::load_raw_toml(&dir.join(SETTINGS_FILE_NAME))?;
    let merged = match overlay {
        Some(ov) => config::merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Build the settings for the backend from the files in `dir`.
///
/// Only a missing sensitive-settings file is recovered from (see
/// [`load_sensitive`]); any other problem is returned.
pub fn load_settings(dir: &Path) -> Result<Settings, SettingsError> {
    let file = load_settings_file(dir)?;
    let (secrets, source) = load_sensitive(dir)?;
    let settings = Settings::assemble(file, secrets, source);
    settings.validate()?;
    tracing::debug!(
        dir = %dir.display(),
        apps = settings.installed_apps.len(),
        databases = settings.databases.len(),
        "settings loaded"
    );
    Ok(settings)
}
