//! Extension-based routing of uploads to a codec path.

use std::path::Path;

/// Codec route for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRoute {
    Image,
    Pdf,
    Passthrough,
}

/// Utility function to get file extension from filename
pub fn get_extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|ext| ext.to_str())
}

/// Route a file by lowercased extension only. No content sniffing happens
/// here; extension spoofing is an accepted limitation of the vault, not a
/// bug in the classifier.
pub fn classify(filename: &str) -> FormatRoute {
    match get_extension(filename).unwrap_or("").to_lowercase().as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" => FormatRoute::Image,
        "pdf" => FormatRoute::Pdf,
        _ => FormatRoute::Passthrough,
    }
}
