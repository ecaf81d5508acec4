//! Compression decision engine for the document vault.
//!
//! Given raw file bytes, a declared quality tier, and a file name, this
//! crate decides whether to compress, which codec path to take (JPEG
//! re-encode for raster images, a Ghostscript-then-lopdf cascade for
//! PDFs), and with what parameters, then verifies the result is actually
//! smaller before committing to it.
//!
//! Uploads never fail because of this crate: every entry point returns
//! valid bytes plus a human-readable method label, falling back to the
//! original bytes when compression is unavailable, ineffective, or broken.

// Public modules
pub mod classifier;
pub mod compressors;
pub mod errors;
pub mod policy;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export the surface the upload handler needs
pub use classifier::{classify, FormatRoute};
pub use service::{CompressionService, VaultCompressor};
pub use types::{
    CompressionConfig, CompressionMethod, CompressionOutcome, EngineStatus, QualityTier,
};
