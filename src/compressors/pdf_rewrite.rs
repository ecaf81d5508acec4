//! In-process PDF fallback chain, used when the external engine is
//! unavailable or fails.
//!
//! Two increasingly conservative lopdf strategies, tried in order. The
//! structural rewrite reworks the whole object graph; the page-stream
//! rewrite touches nothing but each page's content stream. Both are
//! synchronous and CPU-bound; the service runs the chain inside
//! `spawn_blocking`.

use lopdf::Document;

use crate::errors::{StageError, StageResult};
use crate::policy;
use crate::types::CompressionMethod;

/// Primary fallback: structural rewrite.
///
/// Prunes objects unreferenced from the page tree, drops zero-length
/// streams, recompresses stream objects, and renumbers objects so the
/// rewritten output is deterministic (a reproducibility requirement for
/// testing, not a performance concern).
pub fn rewrite_structural(data: &[u8]) -> StageResult<Vec<u8>> {
    let mut doc = Document::load_mem(data)
        .map_err(|e| StageError::PdfRewrite(format!("load failed: {}", e)))?;

    doc.prune_objects();
    doc.delete_zero_length_streams();
    doc.compress();
    doc.renumber_objects();

    save_document(&mut doc, data.len())
}

/// Secondary fallback: conservative per-page rewrite.
///
/// Re-encodes each page's content stream individually and leaves the rest
/// of the object graph untouched, for documents the structural rewrite
/// chokes on.
pub fn rewrite_page_streams(data: &[u8]) -> StageResult<Vec<u8>> {
    let mut doc = Document::load_mem(data)
        .map_err(|e| StageError::PdfRewrite(format!("load failed: {}", e)))?;

    let pages = doc.get_pages();
    for (_, page_id) in pages {
        let content = doc
            .get_page_content(page_id)
            .map_err(|e| StageError::PdfRewrite(format!("content read failed: {}", e)))?;
        doc.change_page_content(page_id, content)
            .map_err(|e| StageError::PdfRewrite(format!("content rewrite failed: {}", e)))?;
    }

    save_document(&mut doc, data.len())
}

fn save_document(doc: &mut Document, capacity_hint: usize) -> StageResult<Vec<u8>> {
    let mut output = Vec::with_capacity(capacity_hint);
    doc.save_to(&mut output)
        .map_err(|e| StageError::PdfRewrite(format!("save failed: {}", e)))?;
    if output.is_empty() {
        return Err(StageError::PdfRewrite("rewrite produced no bytes".to_string()));
    }
    Ok(output)
}

/// Outcome of the fallback chain, before the service re-attaches the
/// original bytes on the reject paths.
#[derive(Debug)]
pub enum ChainVerdict {
    Accepted {
        data: Vec<u8>,
        method: CompressionMethod,
        saved: f64,
    },
    /// At least one strategy ran, but none beat the threshold.
    NoGain,
    /// Every strategy errored.
    AllFailed,
}

/// Run the strategies in order; the first candidate beating the threshold
/// wins. No retries: a stage failure immediately advances the chain.
pub fn run_chain(input: &[u8], min_saved_percent: f64) -> ChainVerdict {
    let strategies: [(CompressionMethod, fn(&[u8]) -> StageResult<Vec<u8>>); 2] = [
        (CompressionMethod::PdfRewrite, rewrite_structural),
        (CompressionMethod::PageStreamRewrite, rewrite_page_streams),
    ];

    let mut any_ran = false;
    for (method, strategy) in strategies {
        match strategy(input) {
            Ok(candidate) => {
                any_ran = true;
                let saved = policy::percent_saved(input.len(), candidate.len());
                if saved > min_saved_percent {
                    log::info!(
                        "{} accepted: {} -> {} bytes ({:.1}% saved)",
                        method,
                        input.len(),
                        candidate.len(),
                        saved
                    );
                    return ChainVerdict::Accepted {
                        data: candidate,
                        method,
                        saved,
                    };
                }
                log::debug!(
                    "{} ran without enough gain ({:.1}% <= {:.1}%)",
                    method,
                    saved,
                    min_saved_percent
                );
            }
            Err(e) => {
                log::warn!("{} stage failed: {}", method, e);
            }
        }
    }

    if any_ran {
        ChainVerdict::NoGain
    } else {
        ChainVerdict::AllFailed
    }
}
