//! Filename handling for the marker-suffix convention.
//!
//! A thumbnail is written next to its original with the marker suffix
//! inserted between stem and extension:
//!
//! - `logo.png` → `logo_64x64.png`
//! - `Robot.Final.JPG` → `Robot.Final_64x64.JPG` (extension spelling kept)
//!
//! Any file whose name contains the marker anywhere is treated as a
//! thumbnail and never processed again, which keeps repeated runs from
//! producing `logo_64x64_64x64.png`.

/// A file name split at its last dot.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Everything before the last dot. Dotfiles like `.hidden` are all stem.
    pub stem: String,
    /// Extension without the dot, spelling preserved. `None` when absent.
    pub extension: Option<String>,
}

/// Split a file name into stem and extension.
///
/// - `"a.png"` → stem `a`, extension `png`
/// - `"archive.tar.gz"` → stem `archive.tar`, extension `gz`
/// - `".hidden"` → stem `.hidden`, no extension
/// - `"README"` → stem `README`, no extension
pub fn parse_file_name(name: &str) -> ParsedName {
    match name.rfind('.') {
        Some(dot) if dot > 0 => ParsedName {
            stem: name[..dot].to_string(),
            extension: Some(name[dot + 1..].to_string()),
        },
        _ => ParsedName {
            stem: name.to_string(),
            extension: None,
        },
    }
}

/// True if `name` already carries the marker suffix anywhere.
pub fn has_marker(name: &str, marker: &str) -> bool {
    name.contains(marker)
}

/// Name of the thumbnail for `name`: the marker goes before the extension.
pub fn marked_name(name: &str, marker: &str) -> String {
    let parsed = parse_file_name(name);
    match parsed.extension {
        Some(ext) => format!("{}{}.{}", parsed.stem, marker, ext),
        None => format!("{}{}", parsed.stem, marker),
    }
}
