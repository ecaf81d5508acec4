//! Codec paths for the compression cascade.

pub mod ghostscript;
pub mod image_compressor;
pub mod pdf_rewrite;

pub use ghostscript::GhostscriptEngine;
pub use image_compressor::ImageCompressor;
