//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::ImageReader` with content sniffing |
//! | Resize | `DynamicImage::resize_exact` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG / GIF | `DynamicImage::save_with_format` |
//!
//! Only the first frame of an animated GIF is kept.

use super::backend::{BackendError, ImageBackend};
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> BackendError {
    BackendError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file content, so a PNG saved under `.jpg`
/// still decodes. The file handle is closed before this returns.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(|e| io_error(path, e))?
        .with_guessed_format()
        .map_err(|e| io_error(path, e))?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Output format for a path, from its extension.
fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        "gif" => Ok(ImageFormat::Gif),
        _ => Err(BackendError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let encode_error = |e: image::ImageError| BackendError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    match output_format(path)? {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let file = std::fs::File::create(path).map_err(|e| io_error(path, e))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality as u8);
            rgb.write_with_encoder(encoder).map_err(encode_error)
        }
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8())
            .save_with_format(path, ImageFormat::Gif)
            .map_err(encode_error),
        format => img.save_with_format(path, format).map_err(encode_error),
    }
}

impl ImageBackend for RustBackend {
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        // Check the output format before decoding so a bad target fails fast.
        output_format(&params.output)?;
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, params.filter.filter_type());
        save_image(&resized, &params.output, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Filter;
    use crate::imaging::Quality;
    use crate::test_helpers::{create_test_image, image_size};

    fn params(source: &Path, output: &Path, width: u32, height: u32) -> ResizeParams {
        ResizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            width,
            height,
            filter: Filter::Lanczos3,
            quality: Quality::default(),
        }
    }

    #[test]
    fn resize_is_exact_regardless_of_aspect() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("wide.png");
        create_test_image(&source, 400, 100);

        let output = tmp.path().join("wide_64x64.png");
        RustBackend::new()
            .resize(&params(&source, &output, 64, 64))
            .unwrap();

        assert_eq!(image_size(&output), (64, 64));
        assert_eq!(image_size(&source), (400, 100));
    }

    #[test]
    fn resize_in_place_overwrites_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        create_test_image(&source, 300, 500);

        RustBackend::new()
            .resize(&params(&source, &source, 256, 256))
            .unwrap();

        assert_eq!(image_size(&source), (256, 256));
    }

    #[test]
    fn resize_gif_and_jpeg_outputs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let gif = tmp.path().join("anim.gif");
        create_test_image(&gif, 120, 90);
        let jpeg = tmp.path().join("photo.JPEG");
        create_test_image(&jpeg, 90, 120);

        let backend = RustBackend::new();
        let gif_out = tmp.path().join("anim_64x64.gif");
        backend.resize(&params(&gif, &gif_out, 64, 64)).unwrap();
        let jpeg_out = tmp.path().join("photo_64x64.JPEG");
        backend.resize(&params(&jpeg, &jpeg_out, 64, 64)).unwrap();

        assert_eq!(image_size(&gif_out), (64, 64));
        assert_eq!(image_size(&jpeg_out), (64, 64));
    }

    #[test]
    fn resize_unsupported_output_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_image(&source, 100, 100);

        let output = tmp.path().join("output.bmp");
        let result = RustBackend::new().resize(&params(&source, &output, 50, 50));
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
        assert!(!output.exists());
    }

    #[test]
    fn every_configurable_extension_has_an_output_format() {
        for ext in crate::config::WRITABLE_EXTENSIONS {
            let path = Path::new("img").join(format!("a.{}", ext.to_uppercase()));
            assert!(output_format(&path).is_ok(), "{ext}");
        }
    }

    #[test]
    fn resize_undecodable_source_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.png");
        std::fs::write(&source, b"not an image").unwrap();

        let output = tmp.path().join("broken_64x64.png");
        let result = RustBackend::new().resize(&params(&source, &output, 64, 64));
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn resize_missing_source_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("missing.png");
        let output = tmp.path().join("missing_64x64.png");
        let result = RustBackend::new().resize(&params(&source, &output, 64, 64));
        assert!(matches!(result, Err(BackendError::Io { .. })));
    }
}
