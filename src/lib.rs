//! # battlecode-tools
//!
//! Two small tools for the Battlecode website, sharing one binary:
//!
//! - **resize**: walks the client's image directory and, for every JPEG,
//!   PNG or GIF, writes a 64x64 thumbnail next to it (`logo.png` →
//!   `logo_64x64.png`) and then overwrites the original with a 256x256 copy.
//! - **settings**: builds the backend's development settings (database,
//!   logging, installed apps, middleware) as one typed [`settings::Settings`]
//!   value, merging credentials from an uncommitted sensitive-settings file
//!   or falling back to placeholders when it is missing.
//!
//! # Resize pipeline
//!
//! ```text
//! 1. Scan      img/  →  ScanResult   (which files, which thumbnail names)
//! 2. Process   plan  →  files        (thumbnail, then overwrite original)
//! ```
//!
//! The scan is pure planning, so `resize --dry-run` shows exactly what a
//! real run would touch, and thumbnails written mid-run are never
//! re-processed in the same run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `resize.toml` loading, validation, TOML layering helpers |
//! | [`naming`] | Marker-suffix file naming |
//! | [`scan`] | Stage 1 — walk the tree and plan jobs |
//! | [`process`] | Stage 2 — execute jobs through an [`imaging::ImageBackend`] |
//! | [`imaging`] | Pure-Rust decode / exact resize / encode |
//! | [`settings`] | Backend settings with sensitive-settings fallback |
//! | [`output`] | CLI output formatting |

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_helpers;
