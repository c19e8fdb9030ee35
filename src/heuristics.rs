pub use crate::constants::stitcher::DRAW_BUDGET_MULTIPLIER;

/// Number of draws provisioned for one stitching pass.
///
/// `ceil(target_samples / segment_len) * DRAW_BUDGET_MULTIPLIER`: the fewest
/// whole segments that can cover the target, each given a fixed number of
/// attempts. The budget grows with the target, never with the corpus size.
pub fn draw_budget(target_samples: usize, segment_len: usize) -> usize {
    min_segments_needed(target_samples, segment_len).saturating_mul(DRAW_BUDGET_MULTIPLIER)
}

/// Minimum number of accepted segments needed to cover `target_samples`.
///
/// Every accepted draw after the first contributes at most `segment_len` samples,
/// so this is a lower bound on how many draws a pass can succeed in.
pub fn min_segments_needed(target_samples: usize, segment_len: usize) -> usize {
    if segment_len == 0 {
        return 0;
    }
    target_samples.div_ceil(segment_len)
}
