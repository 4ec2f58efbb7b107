//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and, where useful, a `print_*` wrapper that writes to stdout.
//! Format functions are pure — no I/O, no side effects.
//!
//! # Resize
//!
//! ```text
//! logo.png
//! Resized logo.png to logo_64x64.png
//! Shrunk logo.png to 256x256
//! ```
//!
//! # Dry run
//!
//! ```text
//! Resize plan for img
//!     logo.png → logo_64x64.png
//!     units/tank.GIF → units/tank_64x64.GIF
//! Skipped
//!     logo_64x64.png (already a thumbnail)
//!     resize.toml (not an image)
//! ```
//!
//! # Missing sensitive settings
//!
//! ```text
//! Error: dev_settings_sensitive.toml not found.
//! Some variables in this file will not be defined properly.
//! ```
//!
//! # Settings check
//!
//! ```text
//! Settings
//!     Debug: false
//!     Secrets: placeholder values
//!     Admins: battlecode <battlecode@example.com>
//!     Databases: default (battlecode@redacted:5432/battlecode)
//!     Installed apps: 7
//!     Middleware: 8
//!     Loggers: django, django.request
//! ```

use crate::process::{ProcessEvent, ProcessReport};
use crate::scan::{ScanResult, SkipReason};
use crate::settings::{SENSITIVE_FILE_NAME, SecretsSource, Settings};

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Resize
// ============================================================================

/// Format one progress event into display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { file } => vec![file.clone()],
        ProcessEvent::Thumbnailed {
            file, thumbnail, ..
        } => vec![format!("Resized {} to {}", file, thumbnail)],
        ProcessEvent::Shrunk {
            file,
            width,
            height,
        } => vec![format!("Shrunk {} to {}x{}", file, width, height)],
    }
}

/// Format the end-of-run summary.
pub fn format_report(report: &ProcessReport) -> Vec<String> {
    vec![format!("Done: {}", report)]
}

/// Format a scan plan without executing it (`resize --dry-run`).
pub fn format_scan_output(result: &ScanResult) -> Vec<String> {
    let mut lines = vec![format!("Resize plan for {}", result.root.display())];

    if result.jobs.is_empty() {
        lines.push(format!("{}(nothing to do)", indent(1)));
    }
    for job in &result.jobs {
        let thumb_rel = match job.relative.rsplit_once('/') {
            Some((dir, _)) => format!("{}/{}", dir, job.thumbnail_name),
            None => job.thumbnail_name.clone(),
        };
        lines.push(format!("{}{} → {}", indent(1), job.relative, thumb_rel));
    }

    if !result.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for skipped in &result.skipped {
            let why = match skipped.reason {
                SkipReason::Marked => "already a thumbnail",
                SkipReason::Unsupported => "not an image",
            };
            lines.push(format!("{}{} ({})", indent(1), skipped.relative, why));
        }
    }

    lines
}

/// Print a scan plan to stdout.
pub fn print_scan_output(result: &ScanResult) {
    for line in format_scan_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Warning shown when the sensitive settings file is absent.
pub fn format_missing_sensitive() -> Vec<String> {
    vec![
        format!("Error: {} not found.", SENSITIVE_FILE_NAME),
        "Some variables in this file will not be defined properly.".to_string(),
    ]
}

/// Print the missing-sensitive-settings warning to stdout.
pub fn print_missing_sensitive() {
    for line in format_missing_sensitive() {
        println!("{}", line);
    }
}

/// Summarize loaded settings for `settings check`.
pub fn format_settings_summary(settings: &Settings) -> Vec<String> {
    let mut lines = vec!["Settings".to_string()];
    let pad = indent(1);

    lines.push(format!("{}Debug: {}", pad, settings.debug));
    let secrets = match &settings.secrets_source {
        SecretsSource::File(path) => format!("{}", path.display()),
        SecretsSource::Placeholder => "placeholder values".to_string(),
    };
    lines.push(format!("{}Secrets: {}", pad, secrets));

    let admins: Vec<String> = settings
        .admins
        .iter()
        .map(|a| format!("{} <{}>", a.name, a.email))
        .collect();
    lines.push(format!("{}Admins: {}", pad, admins.join(", ")));

    let databases: Vec<String> = settings
        .databases
        .iter()
        .map(|(alias, db)| {
            format!(
                "{} ({}@{}:{}/{})",
                alias,
                db.user,
                db.host.as_deref().unwrap_or("?"),
                db.port,
                db.name
            )
        })
        .collect();
    lines.push(format!("{}Databases: {}", pad, databases.join(", ")));
    lines.push(format!(
        "{}Installed apps: {}",
        pad,
        settings.installed_apps.len()
    ));
    lines.push(format!("{}Middleware: {}", pad, settings.middleware.len()));

    let loggers: Vec<&str> = settings.logging.loggers.keys().map(String::as_str).collect();
    lines.push(format!("{}Loggers: {}", pad, loggers.join(", ")));

    lines
}
