//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the one operation the thumbnailer
//! needs: an exact resize from file to file. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use the
//! recording mock in this module.

use super::params::ResizeParams;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Execute an exact resize, writing the result to `params.output`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
