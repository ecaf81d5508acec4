//! Image recompression: decode, flatten to RGB, re-encode as a tuned JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::sync::Arc;
use tokio::task;

use crate::errors::{StageError, StageResult};
use crate::types::QualityTier;

/// Image compressor using the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct ImageCompressor;

impl ImageCompressor {
    /// Decode the raster bytes and re-encode them as a JPEG at the tier's
    /// quality setting.
    ///
    /// Non-RGB color models (alpha channel, palette) are flattened to RGB8
    /// first. Alpha is dropped, not composited against a background color;
    /// a known lossy simplification inherited from the vault's original
    /// behavior.
    pub async fn compress(&self, data: Arc<Vec<u8>>, tier: QualityTier) -> StageResult<Vec<u8>> {
        let quality = tier.jpeg_quality();

        // Decode/encode is CPU-bound; keep it off the async runtime.
        task::spawn_blocking(move || -> StageResult<Vec<u8>> {
            let img = image::load_from_memory(&data)
                .map_err(|e| StageError::Decode(e.to_string()))?;

            let flattened = DynamicImage::ImageRgb8(img.to_rgb8());

            let mut output = Vec::new();
            let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
            encoder
                .encode_image(&flattened)
                .map_err(|e| StageError::Encode(e.to_string()))?;

            Ok(output)
        })
        .await
        .map_err(|e| StageError::TaskJoin(e.to_string()))?
    }
}
