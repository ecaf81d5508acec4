//! Acceptance policy: the single chokepoint deciding whether a candidate
//! replaces the original bytes.
//!
//! Every codec path funnels its candidate through [`evaluate`], which is
//! what keeps the never-larger-than-input invariant a correctness property
//! rather than an optimization.

use crate::types::{CompressionMethod, CompressionOutcome};

/// Percentage of the original size removed by the candidate, in [0, 100).
///
/// Zero-length originals are guarded before the division. A candidate that
/// grew or stayed the same counts as zero saving.
pub fn percent_saved(original_len: usize, candidate_len: usize) -> f64 {
    if original_len == 0 || candidate_len >= original_len {
        return 0.0;
    }
    (original_len - candidate_len) as f64 / original_len as f64 * 100.0
}

/// Accept the candidate only when it is strictly smaller than the original
/// and the saving beats the stage's minimum threshold; otherwise keep the
/// original bytes and report `Already Optimized`.
///
/// Empty candidates are rejected outright: a zero-byte "compressed" file is
/// an upstream defect, never a 100% saving.
pub fn evaluate(
    original: Vec<u8>,
    candidate: Vec<u8>,
    method: CompressionMethod,
    min_saved_percent: f64,
) -> CompressionOutcome {
    if candidate.is_empty() {
        log::warn!("{} produced a zero-byte candidate, keeping original", method);
        return CompressionOutcome::unchanged(original, CompressionMethod::AlreadyOptimized);
    }

    let saved = percent_saved(original.len(), candidate.len());
    if saved > min_saved_percent {
        log::debug!(
            "{} accepted: {} -> {} bytes ({:.1}% saved)",
            method,
            original.len(),
            candidate.len(),
            saved
        );
        CompressionOutcome {
            data: candidate,
            method,
            space_saved_percentage: saved,
        }
    } else {
        log::debug!(
            "{} rejected: {} -> {} bytes ({:.1}% saved, need > {:.1}%)",
            method,
            original.len(),
            candidate.len(),
            saved,
            min_saved_percent
        );
        CompressionOutcome::unchanged(original, CompressionMethod::AlreadyOptimized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_saved_guards_zero_length_original() {
        assert_eq!(percent_saved(0, 0), 0.0);
        assert_eq!(percent_saved(0, 10), 0.0);
    }

    #[test]
    fn test_percent_saved_never_negative() {
        // A candidate that grew reports zero, not a negative percentage
        assert_eq!(percent_saved(100, 150), 0.0);
        assert_eq!(percent_saved(100, 100), 0.0);
    }

    #[test]
    fn test_percent_saved_basic_ratio() {
        assert!((percent_saved(1000, 700) - 30.0).abs() < 1e-9);
        assert!((percent_saved(200, 190) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_accepts_above_threshold() {
        let original = vec![0u8; 1000];
        let candidate = vec![0u8; 700];
        let outcome = evaluate(
            original,
            candidate,
            CompressionMethod::PdfRewrite,
            2.0,
        );
        assert_eq!(outcome.method, CompressionMethod::PdfRewrite);
        assert_eq!(outcome.data.len(), 700);
        assert!((outcome.space_saved_percentage - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_rejects_below_threshold() {
        // 5% saving does not beat a 10% floor
        let outcome = evaluate(
            vec![0u8; 1000],
            vec![0u8; 950],
            CompressionMethod::Image(crate::types::QualityTier::High),
            10.0,
        );
        assert_eq!(outcome.method, CompressionMethod::AlreadyOptimized);
        assert_eq!(outcome.data.len(), 1000);
        assert_eq!(outcome.space_saved_percentage, 0.0);
    }

    #[test]
    fn test_evaluate_rejects_equal_and_larger_candidates() {
        let outcome = evaluate(
            vec![1u8; 100],
            vec![1u8; 100],
            CompressionMethod::PdfRewrite,
            0.0,
        );
        assert_eq!(outcome.method, CompressionMethod::AlreadyOptimized);
        assert_eq!(outcome.data, vec![1u8; 100]);

        let outcome = evaluate(
            vec![1u8; 100],
            vec![1u8; 120],
            CompressionMethod::PdfRewrite,
            0.0,
        );
        assert_eq!(outcome.method, CompressionMethod::AlreadyOptimized);
        assert_eq!(outcome.data.len(), 100);
    }

    #[test]
    fn test_evaluate_rejects_empty_candidate() {
        let outcome = evaluate(
            vec![1u8; 100],
            Vec::new(),
            CompressionMethod::PdfRewrite,
            2.0,
        );
        assert_eq!(outcome.method, CompressionMethod::AlreadyOptimized);
        assert_eq!(outcome.data.len(), 100);
        assert_eq!(outcome.space_saved_percentage, 0.0);
    }
}
