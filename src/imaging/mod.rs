//! Image processing — pure Rust via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from content) |
//! | **Resize** | `DynamicImage::resize_exact` with the configured filter |
//! | **Encode** | JPEG / PNG / GIF chosen from the output extension |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{Quality, ResizeParams};
pub use rust_backend::RustBackend;
