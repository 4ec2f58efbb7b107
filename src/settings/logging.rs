//! Logging handler and logger definitions handed to the web framework.
//!
//! These are data, not a logging implementation: the framework builds its
//! handlers from them at startup. This crate's own diagnostics go through
//! `tracing`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity names as the framework spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Dotted path of the handler class.
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_html: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    /// Names of entries in [`LoggingConfig::handlers`].
    pub handlers: Vec<String>,
    pub level: LogLevel,
    #[serde(default)]
    pub propagate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub version: u32,
    pub disable_existing_loggers: bool,
    pub handlers: BTreeMap<String, HandlerConfig>,
    pub loggers: BTreeMap<String, LoggerConfig>,
}

impl Default for LoggingConfig {
    /// Errors from request handling are mailed to the admins; everything
    /// else from the framework at INFO goes to the console.
    fn default() -> Self {
        let handlers = BTreeMap::from([
            (
                "mail_admins".to_string(),
                HandlerConfig {
                    class: "django.utils.log.AdminEmailHandler".to_string(),
                    level: Some(LogLevel::Error),
                    include_html: true,
                },
            ),
            (
                "console".to_string(),
                HandlerConfig {
                    class: "logging.StreamHandler".to_string(),
                    level: None,
                    include_html: false,
                },
            ),
        ]);
        let loggers = BTreeMap::from([
            (
                "django".to_string(),
                LoggerConfig {
                    handlers: vec!["console".to_string()],
                    level: LogLevel::Info,
                    propagate: false,
                },
            ),
            (
                "django.request".to_string(),
                LoggerConfig {
                    handlers: vec!["mail_admins".to_string()],
                    level: LogLevel::Error,
                    propagate: true,
                },
            ),
        ]);
        Self {
            version: 1,
            disable_existing_loggers: false,
            handlers,
            loggers,
        }
    }
}

impl LoggingConfig {
    /// Check the schema version and that every logger names defined handlers.
    pub fn validate(&self) -> Result<(), String> {
        if self.version != 1 {
            return Err(format!(
                "logging.version must be 1, got {}",
                self.version
            ));
        }
        for (name, logger) in &self.loggers {
            if let Some(missing) = logger
                .handlers
                .iter()
                .find(|h| !self.handlers.contains_key(*h))
            {
                return Err(format!(
                    "logger {name:?} references undefined handler {missing:?}"
                ));
            }
        }
        Ok(())
    }
}
