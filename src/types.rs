//! Type definitions for the compression core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse three-level knob controlling size reduction versus fidelity.
///
/// The name tracks compression aggressiveness, so the numeric codec
/// parameters run inverted: `High` means the most aggressive size
/// reduction and the lowest visual quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }

    /// Parse a caller-supplied tier string. Unrecognized values map to
    /// `Medium` rather than failing; tier strings arrive unvalidated from
    /// the upload handler.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => QualityTier::Low,
            "medium" => QualityTier::Medium,
            "high" => QualityTier::High,
            _ => QualityTier::Medium,
        }
    }

    /// JPEG encoder quality for the image path.
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            QualityTier::Low => 85,
            QualityTier::Medium => 70,
            QualityTier::High => 50,
        }
    }

    /// Ghostscript `-dPDFSETTINGS` preset.
    pub fn pdf_preset(&self) -> &'static str {
        match self {
            QualityTier::Low => "/printer",
            QualityTier::Medium => "/ebook",
            QualityTier::High => "/screen",
        }
    }

    /// Target resolution for downsampling embedded PDF images.
    pub fn pdf_image_dpi(&self) -> u32 {
        match self {
            QualityTier::Low => 200,
            QualityTier::Medium => 150,
            QualityTier::High => 72,
        }
    }
}

impl From<&str> for QualityTier {
    fn from(s: &str) -> Self {
        QualityTier::parse_lossy(s)
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a compression outcome was produced. Renders the human-readable
/// method label surfaced to the upload handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionMethod {
    /// External engine path, tier recorded for the label.
    Ghostscript(QualityTier),
    /// JPEG re-encode path.
    Image(QualityTier),
    /// Library fallback: structural PDF rewrite.
    PdfRewrite,
    /// Library fallback: per-page content stream rewrite.
    PageStreamRewrite,
    /// Unrecognized format, bytes passed through unmodified.
    NoCompression,
    /// Input below the size floor for its codec path.
    TooSmall,
    /// A stage ran but the candidate did not beat the threshold.
    AlreadyOptimized,
    /// Every applicable stage errored; original bytes returned.
    Failed,
}

impl CompressionMethod {
    pub fn label(&self) -> String {
        match self {
            CompressionMethod::Ghostscript(tier) => format!("Ghostscript {}", tier),
            CompressionMethod::Image(tier) => format!("Image {}", tier),
            CompressionMethod::PdfRewrite => "Pdf Rewrite".to_string(),
            CompressionMethod::PageStreamRewrite => "Page Stream Rewrite".to_string(),
            CompressionMethod::NoCompression => "No Compression".to_string(),
            CompressionMethod::TooSmall => "Too Small".to_string(),
            CompressionMethod::AlreadyOptimized => "Already Optimized".to_string(),
            CompressionMethod::Failed => "Compression Failed".to_string(),
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Result of one compression invocation.
///
/// Invariants: `data` is never larger than the input bytes;
/// `space_saved_percentage > 0` exactly when `data` differs from the input,
/// and `0` when the original bytes were kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionOutcome {
    pub data: Vec<u8>,
    pub method: CompressionMethod,
    pub space_saved_percentage: f64,
}

impl CompressionOutcome {
    /// Original bytes kept as-is with a zero saving.
    pub fn unchanged(data: Vec<u8>, method: CompressionMethod) -> Self {
        Self {
            data,
            method,
            space_saved_percentage: 0.0,
        }
    }

    pub fn method_label(&self) -> String {
        self.method.label()
    }

    pub fn was_compressed(&self) -> bool {
        self.space_saved_percentage > 0.0
    }
}

/// Tunables for the compression cascade.
///
/// Constructed by the caller and passed in explicitly; the core holds no
/// process-wide state. The per-stage acceptance thresholds are deliberately
/// distinct and deliberately configuration, not constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Images below this size are not worth recompressing.
    pub image_min_size_bytes: usize,
    /// PDFs below this size are not worth recompressing.
    pub pdf_min_size_bytes: usize,
    /// Minimum percentage saved for the image path to accept a candidate.
    pub image_min_saved_percent: f64,
    /// Minimum percentage saved for the external engine path to accept.
    pub engine_min_saved_percent: f64,
    /// Minimum percentage saved for the library rewrite chain to accept.
    pub rewrite_min_saved_percent: f64,
    /// Hard wall-clock limit on one external engine invocation, in seconds.
    pub engine_timeout_secs: u64,
    /// Limit on the engine version probe, in seconds.
    pub probe_timeout_secs: u64,
    /// Explicit engine binary path. When set, the candidate search is
    /// skipped and only this path is tried.
    pub ghostscript_path: Option<String>,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            image_min_size_bytes: 50 * 1024,
            pdf_min_size_bytes: 100 * 1024,
            image_min_saved_percent: 10.0,
            engine_min_saved_percent: 5.0,
            rewrite_min_saved_percent: 2.0,
            engine_timeout_secs: 120,
            probe_timeout_secs: 5,
            ghostscript_path: None,
        }
    }
}

/// Engine probe result, consumed by health diagnostics only. The
/// compression path never reads this; it re-locates the binary live on
/// every call so a transiently missing tool self-heals without restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub available: bool,
    pub message: String,
}
