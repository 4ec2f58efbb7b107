//! Thumbnail generation and in-place shrinking.
//!
//! Stage 2 of a resize run. Executes the jobs planned by [`crate::scan`],
//! strictly one file at a time and in plan order. For each job:
//!
//! 1. the original is resized to the thumbnail size and written next to it
//!    under the marked name;
//! 2. the original is resized to the full size and overwritten in place.
//!
//! The thumbnail is always derived from the untouched original, before the
//! overwrite.
//!
//! ## Failure
//!
//! There is no recovery. The first backend error stops the run and is
//! returned with the offending path; files processed before it stay
//! processed, files after it are not touched.
//!
//! ## Progress
//!
//! When a channel is passed, a [`ProcessEvent`] is sent after each step.
//! The CLI prints these on a separate thread via
//! [`crate::output::format_process_event`].

use crate::config::{self, ResizeConfig};
use crate::imaging::{BackendError, ImageBackend, Quality, ResizeParams, RustBackend};
use crate::scan::{self, ResizeJob, ScanResult};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] scan::ScanError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Progress notifications, one or more per job.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// A job is about to start.
    Started { file: String },
    /// Thumbnail written.
    Thumbnailed {
        file: String,
        thumbnail: String,
        width: u32,
        height: u32,
    },
    /// Original overwritten with the full-size copy.
    Shrunk { file: String, width: u32, height: u32 },
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    pub processed: usize,
    pub thumbnails: Vec<PathBuf>,
    pub skipped_marked: usize,
    pub skipped_unsupported: usize,
}

impl std::fmt::Display for ProcessReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} resized, {} already thumbnails, {} other files untouched",
            self.processed, self.skipped_marked, self.skipped_unsupported
        )
    }
}

fn send(events: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // The printer may have gone away; progress is best-effort.
        let _ = tx.send(event);
    }
}

/// Thumbnail and shrink a single file.
pub fn process_job(
    backend: &impl ImageBackend,
    job: &ResizeJob,
    config: &ResizeConfig,
    events: Option<&Sender<ProcessEvent>>,
) -> Result<(), ProcessError> {
    if !job.source.exists() {
        return Err(ProcessError::SourceNotFound(job.source.clone()));
    }

    send(
        events,
        ProcessEvent::Started {
            file: job.file_name.clone(),
        },
    );

    let quality = Quality::new(config.quality);
    let [thumb_w, thumb_h] = config.thumbnail;
    backend.resize(&ResizeParams {
        source: job.source.clone(),
        output: job.thumbnail.clone(),
        width: thumb_w,
        height: thumb_h,
        filter: config.filter,
        quality,
    })?;
    debug!(file = %job.relative, thumbnail = %job.thumbnail_name, "thumbnail written");
    send(
        events,
        ProcessEvent::Thumbnailed {
            file: job.file_name.clone(),
            thumbnail: job.thumbnail_name.clone(),
            width: thumb_w,
            height: thumb_h,
        },
    );

    let [full_w, full_h] = config.full;
    backend.resize(&ResizeParams {
        source: job.source.clone(),
        output: job.source.clone(),
        width: full_w,
        height: full_h,
        filter: config.filter,
        quality,
    })?;
    debug!(file = %job.relative, "original overwritten");
    send(
        events,
        ProcessEvent::Shrunk {
            file: job.file_name.clone(),
            width: full_w,
            height: full_h,
        },
    );

    Ok(())
}

/// Execute a scan plan with the given backend.
pub fn process_with_backend(
    backend: &impl ImageBackend,
    plan: &ScanResult,
    config: &ResizeConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    let mut report = ProcessReport {
        skipped_marked: plan.skipped_with(scan::SkipReason::Marked),
        skipped_unsupported: plan.skipped_with(scan::SkipReason::Unsupported),
        ..ProcessReport::default()
    };

    for job in &plan.jobs {
        process_job(backend, job, config, events.as_ref())?;
        report.processed += 1;
        report.thumbnails.push(job.thumbnail.clone());
    }

    info!(
        root = %plan.root.display(),
        processed = report.processed,
        "resize run complete"
    );
    Ok(report)
}

/// Execute a scan plan with the production backend.
pub fn process(
    plan: &ScanResult,
    config: &ResizeConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    process_with_backend(&RustBackend::new(), plan, config, events)
}

/// Scan and process `root` in one call, using `resize.toml` from `root` if present.
pub fn resize_directory(
    root: &Path,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    let config = config::load_config(root)?;
    let plan = scan::scan(root, &config)?;
    process(&plan, &config, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{create_test_image, image_size, list_files, path_in};
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn resize_op(source: &Path, output: &Path, width: u32, height: u32) -> RecordedOp {
        RecordedOp::Resize {
            source: source.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            width,
            height,
        }
    }

    fn touch(root: &Path, relative: &str) {
        let path = path_in(root, relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    // =========================================================================
    // Mock backend: operation order and parameters
    // =========================================================================

    #[test]
    fn thumbnail_is_written_before_overwrite() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        touch(tmp.path(), "a_64x64.png");

        let config = ResizeConfig::default();
        let plan = scan::scan(tmp.path(), &config).unwrap();
        let backend = MockBackend::new();
        let report = process_with_backend(&backend, &plan, &config, None).unwrap();

        let source = tmp.path().join("a.png");
        let thumb = tmp.path().join("a_64x64.png");
        assert_eq!(
            backend.get_operations(),
            vec![
                resize_op(&source, &thumb, 64, 64),
                resize_op(&source, &source, 256, 256),
            ]
        );
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped_marked, 1);
        assert_eq!(report.thumbnails, vec![thumb]);
    }

    #[test]
    fn custom_sizes_are_passed_to_backend() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.jpg");

        let config = ResizeConfig {
            thumbnail: [16, 24],
            full: [128, 96],
            ..ResizeConfig::default()
        };
        let plan = scan::scan(tmp.path(), &config).unwrap();
        let backend = MockBackend::new();
        process_with_backend(&backend, &plan, &config, None).unwrap();

        let source = tmp.path().join("b.jpg");
        assert_eq!(
            backend.get_operations(),
            vec![
                resize_op(&source, &tmp.path().join("b_16x24.jpg"), 16, 24),
                resize_op(&source, &source, 128, 96),
            ]
        );
    }

    #[test]
    fn first_failure_stops_the_run() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        touch(tmp.path(), "b.png");
        touch(tmp.path(), "c.png");

        let config = ResizeConfig::default();
        let plan = scan::scan(tmp.path(), &config).unwrap();
        let backend = MockBackend::failing_on("b.png");
        let result = process_with_backend(&backend, &plan, &config, None);

        assert!(matches!(
            result,
            Err(ProcessError::Imaging(BackendError::Decode { .. }))
        ));
        // Only a.png got both steps; c.png never started.
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| matches!(
            op,
            RecordedOp::Resize { source, .. } if source.ends_with("a.png")
        )));
    }

    #[test]
    fn vanished_source_is_reported() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");

        let config = ResizeConfig::default();
        let plan = scan::scan(tmp.path(), &config).unwrap();
        fs::remove_file(tmp.path().join("a.png")).unwrap();

        let result = process_with_backend(&MockBackend::new(), &plan, &config, None);
        assert!(matches!(result, Err(ProcessError::SourceNotFound(_))));
    }

    #[test]
    fn events_follow_each_step() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");

        let config = ResizeConfig::default();
        let plan = scan::scan(tmp.path(), &config).unwrap();
        let (tx, rx) = mpsc::channel();
        process_with_backend(&MockBackend::new(), &plan, &config, Some(tx)).unwrap();

        let events: Vec<ProcessEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                ProcessEvent::Started { file: "a.png".into() },
                ProcessEvent::Thumbnailed {
                    file: "a.png".into(),
                    thumbnail: "a_64x64.png".into(),
                    width: 64,
                    height: 64,
                },
                ProcessEvent::Shrunk {
                    file: "a.png".into(),
                    width: 256,
                    height: 256,
                },
            ]
        );
    }

    #[test]
    fn only_planned_jobs_are_echoed() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "a_64x64.png");

        let config = ResizeConfig::default();
        let plan = scan::scan(tmp.path(), &config).unwrap();
        let (tx, rx) = mpsc::channel();
        let report = process_with_backend(&MockBackend::new(), &plan, &config, Some(tx)).unwrap();

        let started: Vec<String> = rx
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::Started { file } => Some(file),
                _ => None,
            })
            .collect();
        assert_eq!(started, vec!["a.png"]);
        assert_eq!(report.skipped_unsupported, 1);
    }

    #[test]
    fn report_display_summarizes_counts() {
        let report = ProcessReport {
            processed: 2,
            thumbnails: Vec::new(),
            skipped_marked: 1,
            skipped_unsupported: 3,
        };
        assert_eq!(
            report.to_string(),
            "2 resized, 1 already thumbnails, 3 other files untouched"
        );
    }

    // =========================================================================
    // Real backend: files on disk
    // =========================================================================

    #[test]
    fn resize_directory_writes_thumbnail_and_shrinks_original() {
        let tmp = TempDir::new().unwrap();
        create_test_image(&tmp.path().join("a.png"), 500, 300);
        create_test_image(&tmp.path().join("sub/b.JPG"), 320, 640);

        let report = resize_directory(tmp.path(), None).unwrap();
        assert_eq!(report.processed, 2);

        assert_eq!(
            list_files(tmp.path()),
            vec!["a.png", "a_64x64.png", "sub/b.JPG", "sub/b_64x64.JPG"]
        );
        assert_eq!(image_size(&tmp.path().join("a.png")), (256, 256));
        assert_eq!(image_size(&tmp.path().join("a_64x64.png")), (64, 64));
        assert_eq!(image_size(&path_in(tmp.path(), "sub/b.JPG")), (256, 256));
        assert_eq!(image_size(&path_in(tmp.path(), "sub/b_64x64.JPG")), (64, 64));
    }

    #[test]
    fn second_run_only_reshrinks_originals() {
        let tmp = TempDir::new().unwrap();
        create_test_image(&tmp.path().join("a.gif"), 100, 100);

        resize_directory(tmp.path(), None).unwrap();
        let report = resize_directory(tmp.path(), None).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped_marked, 1);
        assert_eq!(list_files(tmp.path()), vec!["a.gif", "a_64x64.gif"]);
    }

    #[test]
    fn resize_directory_honours_resize_toml() {
        let tmp = TempDir::new().unwrap();
        create_test_image(&tmp.path().join("a.png"), 100, 100);
        fs::write(
            tmp.path().join("resize.toml"),
            "thumbnail = [10, 20]\nfull = [30, 40]\n",
        )
        .unwrap();

        let report = resize_directory(tmp.path(), None).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped_unsupported, 1);
        assert_eq!(image_size(&tmp.path().join("a_10x20.png")), (10, 20));
        assert_eq!(image_size(&tmp.path().join("a.png")), (30, 40));
    }

    #[test]
    fn corrupt_image_aborts_with_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.png"), b"not a png").unwrap();

        let err = resize_directory(tmp.path(), None).unwrap_err();
        assert!(err.to_string().contains("broken.png"), "{err}");
        assert!(!tmp.path().join("broken_64x64.png").exists());
    }
}
