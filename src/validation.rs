//! Post-assembly plausibility check.
//!
//! A short sequence stitched from few segments can have a mean that is not
//! representative of the corpus. The check compares the assembled mean with the
//! 50th–75th percentile band of per-segment means and only ever warns.

use serde::Serialize;

use crate::constants::messages::MEAN_OUT_OF_RANGE;
use crate::corpus::SegmentCorpus;
use crate::diagnostics::Diagnostics;
use crate::metrics::percentile;
use crate::stitcher::AssembledSequence;

/// Outcome of the mean plausibility check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeanCheck {
    /// Mean of the assembled sequence.
    pub assembled_mean: f64,
    /// Median of the per-segment means.
    pub p50: f64,
    /// 75th percentile of the per-segment means.
    pub p75: f64,
    /// Whether `p50 <= assembled_mean <= p75`.
    pub in_range: bool,
}

/// Compare the assembled mean with the corpus segment-mean band, warning when outside.
///
/// Returns `None` (and logs at debug level) when either the sequence or the
/// corpus is empty, since there is nothing to compare.
pub fn validate_mean(
    sequence: &AssembledSequence,
    corpus: &SegmentCorpus,
    diagnostics: &dyn Diagnostics,
) -> Option<MeanCheck> {
    let means = corpus.segment_means();
    let (Some(assembled_mean), Some(p50), Some(p75)) = (
        sequence.mean(),
        percentile(&means, 0.50),
        percentile(&means, 0.75),
    ) else {
        diagnostics.debug("skipping mean check for empty sequence or corpus");
        return None;
    };

    let in_range = (p50..=p75).contains(&assembled_mean);
    if !in_range {
        diagnostics.warn(MEAN_OUT_OF_RANGE);
    }
    diagnostics.debug(&format!(
        "assembled mean {assembled_mean:.4} vs segment-mean band [{p50:.4}, {p75:.4}]"
    ));
    Some(MeanCheck {
        assembled_mean,
        p50,
        p75,
        in_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawTable;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::stitcher::Stitcher;

    /// Four one-hour channels with constant levels 0, 1, 2, 3.
    fn level_corpus() -> SegmentCorpus {
        let table = RawTable::from_columns(
            (0..4)
                .map(|level| (format!("c{level}"), vec![level as f64; 900]))
                .collect(),
        )
        .unwrap();
        SegmentCorpus::build(&table, 4, &RecordingDiagnostics::new()).unwrap()
    }

    fn sequence_of_level(corpus: &SegmentCorpus, level: usize) -> AssembledSequence {
        let id = format!("c{level}_0");
        let idx = corpus.ids().position(|candidate| *candidate == id).unwrap();
        let sink = RecordingDiagnostics::new();
        let stitcher = Stitcher::new(corpus, &sink);
        // Find a seed whose first draw is the wanted segment.
        (0..u64::MAX)
            .find_map(|seed| {
                let seq = stitcher.stitch(900, seed).ok()?;
                (corpus.ids().position(|c| *c == seq.pieces()[0].segment) == Some(idx))
                    .then_some(seq)
            })
            .unwrap()
    }

    #[test]
    fn mean_inside_band_is_silent() {
        let corpus = level_corpus();
        let sink = RecordingDiagnostics::new();
        // Band of [0, 1, 2, 3] is [1.5, 2.25].
        let check = validate_mean(&sequence_of_level(&corpus, 2), &corpus, &sink).unwrap();
        assert_eq!(check.p50, 1.5);
        assert_eq!(check.p75, 2.25);
        assert_eq!(check.assembled_mean, 2.0);
        assert!(check.in_range);
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn mean_outside_band_warns_but_still_reports() {
        let corpus = level_corpus();
        for level in [0, 3] {
            let sink = RecordingDiagnostics::new();
            let check =
                validate_mean(&sequence_of_level(&corpus, level), &corpus, &sink).unwrap();
            assert!(!check.in_range);
            assert_eq!(sink.warnings(), vec![MEAN_OUT_OF_RANGE]);
        }
    }

    #[test]
    fn empty_sequence_skips_the_check() {
        let corpus = level_corpus();
        let sink = RecordingDiagnostics::new();
        let empty = Stitcher::new(&corpus, &sink).stitch(0, 1).unwrap();
        assert_eq!(validate_mean(&empty, &corpus, &sink), None);
        assert!(sink.warnings().is_empty());
    }
}
