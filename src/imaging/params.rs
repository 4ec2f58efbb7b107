//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`crate::process`] (which decides which files to write)
//! and the [`backend`](super::backend) (which does the pixel work), so the
//! processing loop can be tested against a mock backend.

use crate::config::Filter;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Parameters for an exact resize: the output is always `width x height`,
/// regardless of the source aspect ratio.
///
/// `source` and `output` may be the same path; the source is fully decoded
/// before the output is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub filter: Filter,
    pub quality: Quality,
}
