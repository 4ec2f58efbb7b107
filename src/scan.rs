//! Directory scanning and job planning.
//!
//! Stage 1 of a resize run. Walks the image root and decides, for every
//! file, whether it gets processed. Nothing is written here; the result is a
//! plan that [`crate::process`] executes.
//!
//! ## Rules
//!
//! For each file under the root (recursively, entries sorted by name).
//! Symlinks to files count as files and are resized through the link;
//! symlinked directories are not descended into.
//!
//! 1. a name containing the marker suffix (`_64x64`) is skipped as
//!    [`SkipReason::Marked`];
//! 2. a name whose extension is not in the configured set (case-insensitive)
//!    is skipped as [`SkipReason::Unsupported`] and left untouched;
//! 3. everything else becomes a [`ResizeJob`] whose thumbnail lives in the
//!    same directory under the marked name.
//!
//! Planning the whole tree before any file is written means thumbnails
//! created during a run are never picked up as inputs of the same run.
//!
//! ```text
//! img/
//! ├── resize.toml         # Unsupported (config, untouched)
//! ├── logo.png            # job → logo_64x64.png, then logo.png at 256x256
//! ├── logo_64x64.png      # Marked
//! └── units/
//!     └── tank.GIF        # job → units/tank_64x64.GIF
//! ```

use crate::config::ResizeConfig;
use crate::naming::{has_marker, marked_name, parse_file_name};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Image directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Why a file was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Name already carries the marker suffix.
    Marked,
    /// Extension outside the configured set (or no extension at all).
    Unsupported,
}

/// One image to thumbnail and shrink.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeJob {
    /// Absolute-or-root-joined path of the original; overwritten in place.
    pub source: PathBuf,
    /// Where the thumbnail is written.
    pub thumbnail: PathBuf,
    /// Path relative to the scan root, `/`-separated, for display.
    pub relative: String,
    pub file_name: String,
    pub thumbnail_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub relative: String,
    pub reason: SkipReason,
}

/// Output of the scan stage.
#[derive(Debug)]
pub struct ScanResult {
    pub root: PathBuf,
    pub jobs: Vec<ResizeJob>,
    pub skipped: Vec<SkippedFile>,
}

impl ScanResult {
    pub fn skipped_with(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

/// Walk `root` and plan the resize jobs.
pub fn scan(root: &Path, config: &ResizeConfig) -> Result<ScanResult, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let marker = config.marker();
    let mut jobs = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
        if !is_file {
            continue;
        }
        let relative = relative_display(root, path);

        let Some(file_name) = entry.file_name().to_str() else {
            debug!(path = %path.display(), "skipping non-UTF-8 file name");
            skipped.push(SkippedFile {
                path: path.to_path_buf(),
                relative,
                reason: SkipReason::Unsupported,
            });
            continue;
        };

        if has_marker(file_name, &marker) {
            debug!(file = %relative, "already marked");
            skipped.push(SkippedFile {
                path: path.to_path_buf(),
                relative,
                reason: SkipReason::Marked,
            });
            continue;
        }

        let supported = parse_file_name(file_name)
            .extension
            .is_some_and(|ext| config.accepts_extension(&ext));
        if !supported {
            debug!(file = %relative, "unsupported extension");
            skipped.push(SkippedFile {
                path: path.to_path_buf(),
                relative,
                reason: SkipReason::Unsupported,
            });
            continue;
        }

        let thumbnail_name = marked_name(file_name, &marker);
        let thumbnail = path.with_file_name(&thumbnail_name);
        jobs.push(ResizeJob {
            source: path.to_path_buf(),
            thumbnail,
            relative,
            file_name: file_name.to_string(),
            thumbnail_name,
        });
    }

    debug!(
        jobs = jobs.len(),
        skipped = skipped.len(),
        root = %root.display(),
        "scan complete"
    );

    Ok(ScanResult {
        root: root.to_path_buf(),
        jobs,
        skipped,
    })
}

fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
