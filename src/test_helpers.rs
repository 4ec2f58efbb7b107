//! Shared test utilities: synthetic images and tree inspection.

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::{Path, PathBuf};

/// Write a gradient image of the given size, encoded by the path's extension
/// (case-insensitive). Parent directories are created.
pub fn create_test_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let (img, format) = match ext.as_str() {
        "jpg" | "jpeg" => (
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
            ImageFormat::Jpeg,
        ),
        "gif" => (DynamicImage::ImageRgba8(img), ImageFormat::Gif),
        "png" => (DynamicImage::ImageRgba8(img), ImageFormat::Png),
        other => panic!("no test encoder for extension {other:?}"),
    };
    img.save_with_format(path, format).unwrap();
}

/// Decode `path` (format sniffed from content) and return `(width, height)`.
pub fn image_size(path: &Path) -> (u32, u32) {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap_or_else(|e| panic!("cannot read dimensions of {}: {e}", path.display()))
}

/// All file paths under `root`, relative and sorted, using `/` separators.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// Join `/`-separated relative path onto `root`.
pub fn path_in(root: &Path, relative: &str) -> PathBuf {
    relative.split('/').fold(root.to_path_buf(), |p, c| p.join(c))
}
