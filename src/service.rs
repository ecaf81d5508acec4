//! Compression service: cascade orchestration and outcome labeling.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::classifier::{classify, FormatRoute};
use crate::compressors::ghostscript::GhostscriptEngine;
use crate::compressors::image_compressor::ImageCompressor;
use crate::compressors::pdf_rewrite::{self, ChainVerdict};
use crate::policy;
use crate::types::{
    CompressionConfig, CompressionMethod, CompressionOutcome, EngineStatus, QualityTier,
};

/// Entry points exposed to the upload handler.
///
/// The compression methods never fail: the caller always receives valid
/// bytes (original or compressed) plus a human-readable method label.
/// Compression is a best-effort optimization and must never block or fail
/// an upload.
#[async_trait]
pub trait CompressionService: Send + Sync {
    /// Compress PDF bytes through the engine-then-library cascade.
    async fn compress_pdf(&self, data: Vec<u8>, tier: QualityTier) -> CompressionOutcome;

    /// Recompress raster image bytes as a quality-tuned JPEG.
    async fn compress_image(&self, data: Vec<u8>, tier: QualityTier) -> CompressionOutcome;

    /// Route by file extension and compress accordingly; unrecognized
    /// formats pass through unmodified.
    async fn compress_file(
        &self,
        data: Vec<u8>,
        filename: &str,
        tier: QualityTier,
    ) -> CompressionOutcome;

    /// Diagnostics-only health probe of the external engine.
    async fn probe_engine(&self) -> EngineStatus;
}

/// Default implementation backed by Ghostscript, the `image` crate, and
/// lopdf. Holds no state between calls; concurrent invocations are
/// naturally isolated.
pub struct VaultCompressor {
    config: CompressionConfig,
    engine: GhostscriptEngine,
    image_compressor: ImageCompressor,
}

impl VaultCompressor {
    /// Construct from an explicit, caller-owned config. There is no hidden
    /// startup state and nothing to initialize globally.
    pub fn new(config: CompressionConfig) -> Self {
        let engine = GhostscriptEngine::new(
            config.ghostscript_path.clone(),
            Duration::from_secs(config.engine_timeout_secs),
            Duration::from_secs(config.probe_timeout_secs),
        );
        Self {
            config,
            engine,
            image_compressor: ImageCompressor,
        }
    }

    /// Library fallback chain, run off the async runtime. The original
    /// bytes stay owned out here so even a panicking stage cannot lose
    /// them.
    async fn pdf_fallback_chain(&self, data: Vec<u8>) -> CompressionOutcome {
        let threshold = self.config.rewrite_min_saved_percent;
        let shared = Arc::new(data);
        let input = Arc::clone(&shared);

        let verdict = task::spawn_blocking(move || pdf_rewrite::run_chain(&input, threshold))
            .await
            .unwrap_or_else(|e| {
                log::error!("pdf fallback chain panicked: {}", e);
                ChainVerdict::AllFailed
            });

        let original = Arc::try_unwrap(shared).unwrap_or_else(|arc| (*arc).clone());
        match verdict {
            ChainVerdict::Accepted { data, method, saved } => CompressionOutcome {
                data,
                method,
                space_saved_percentage: saved,
            },
            ChainVerdict::NoGain => {
                CompressionOutcome::unchanged(original, CompressionMethod::AlreadyOptimized)
            }
            ChainVerdict::AllFailed => {
                CompressionOutcome::unchanged(original, CompressionMethod::Failed)
            }
        }
    }
}

#[async_trait]
impl CompressionService for VaultCompressor {
    async fn compress_pdf(&self, data: Vec<u8>, tier: QualityTier) -> CompressionOutcome {
        let original_len = data.len();
        if original_len < self.config.pdf_min_size_bytes {
            log::debug!(
                "pdf too small to compress: {} bytes < {} bytes minimum",
                original_len,
                self.config.pdf_min_size_bytes
            );
            return CompressionOutcome::unchanged(data, CompressionMethod::TooSmall);
        }

        match self.engine.compress(&data, tier).await {
            Ok(candidate) => {
                return policy::evaluate(
                    data,
                    candidate,
                    CompressionMethod::Ghostscript(tier),
                    self.config.engine_min_saved_percent,
                );
            }
            Err(e) if e.is_engine_unavailable() => {
                log::debug!("external engine unavailable, using library fallbacks");
            }
            Err(e) => {
                log::warn!("external engine failed, using library fallbacks: {}", e);
            }
        }

        self.pdf_fallback_chain(data).await
    }

    async fn compress_image(&self, data: Vec<u8>, tier: QualityTier) -> CompressionOutcome {
        let original_len = data.len();
        if original_len < self.config.image_min_size_bytes {
            log::debug!(
                "image too small to compress: {} bytes < {} bytes minimum",
                original_len,
                self.config.image_min_size_bytes
            );
            return CompressionOutcome::unchanged(data, CompressionMethod::TooSmall);
        }

        let shared = Arc::new(data);
        let result = self
            .image_compressor
            .compress(Arc::clone(&shared), tier)
            .await;
        let original = Arc::try_unwrap(shared).unwrap_or_else(|arc| (*arc).clone());

        match result {
            Ok(candidate) => policy::evaluate(
                original,
                candidate,
                CompressionMethod::Image(tier),
                self.config.image_min_saved_percent,
            ),
            Err(e) => {
                log::warn!("image recompression failed, keeping original: {}", e);
                CompressionOutcome::unchanged(original, CompressionMethod::Failed)
            }
        }
    }

    async fn compress_file(
        &self,
        data: Vec<u8>,
        filename: &str,
        tier: QualityTier,
    ) -> CompressionOutcome {
        match classify(filename) {
            FormatRoute::Image => self.compress_image(data, tier).await,
            FormatRoute::Pdf => self.compress_pdf(data, tier).await,
            FormatRoute::Passthrough => {
                log::debug!("no codec path for '{}', passing through", filename);
                CompressionOutcome::unchanged(data, CompressionMethod::NoCompression)
            }
        }
    }

    async fn probe_engine(&self) -> EngineStatus {
        self.engine.probe().await
    }
}
