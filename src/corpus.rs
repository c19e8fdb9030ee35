//! Segment corpus construction.
//!
//! Every raw channel is cut into successive one-hour windows. Row `i` sits at
//! synthetic time `i * step / 3600` hours, so with a step that divides an hour
//! each window is exactly `3600 / step` consecutive rows. Windows that come up
//! short (the trailing partial hour) are kept aside and never drawn.

use indexmap::IndexMap;

use crate::constants::corpus::{HOUR_COUNT_ROUNDING, SEGMENT_ID_SEPARATOR};
use crate::constants::signal::SECONDS_PER_HOUR;
use crate::data::{RawTable, Segment};
use crate::diagnostics::Diagnostics;
use crate::errors::DispatchError;
use crate::types::{Sample, SegmentId};

/// Read-only table of equal-length hourly segments.
#[derive(Clone, Debug)]
pub struct SegmentCorpus {
    step: u32,
    segment_len: usize,
    segments: IndexMap<SegmentId, Segment>,
    partial: Vec<Segment>,
}

impl SegmentCorpus {
    /// Slice every channel of `table` into hourly segments at `step` seconds per row.
    pub fn build(
        table: &RawTable,
        step: u32,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self, DispatchError> {
        let segment_len = samples_per_hour(step)?;
        let hours = hour_count(table.row_count(), step);

        let mut segments = IndexMap::new();
        let mut partial = Vec::new();
        for (channel, values) in table.iter_columns() {
            for hour in 0..hours {
                let start = hour * segment_len;
                if start >= values.len() {
                    break;
                }
                let end = (start + segment_len).min(values.len());
                let segment = Segment {
                    id: segment_id(channel, hour),
                    channel: channel.clone(),
                    hour,
                    values: values[start..end].to_vec(),
                };
                if segment.len() == segment_len {
                    segments.insert(segment.id.clone(), segment);
                } else {
                    diagnostics.debug(&format!(
                        "segment '{}' holds {} of {segment_len} samples; excluded from draws",
                        segment.id,
                        segment.len()
                    ));
                    partial.push(segment);
                }
            }
        }

        diagnostics.debug(&format!(
            "built corpus of {} segments x {segment_len} samples from {} channels",
            segments.len(),
            table.channels().len()
        ));
        Ok(Self {
            step,
            segment_len,
            segments,
            partial,
        })
    }

    /// Seconds between samples the corpus was built with.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Samples per segment (`3600 / step`).
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Number of full-length segments eligible for drawing.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when no full-length segment exists.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Samples across all eligible segments combined.
    pub fn total_samples(&self) -> usize {
        self.segments.len() * self.segment_len
    }

    /// Segment by identifier.
    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// Segment by draw index (insertion order: channel, then hour).
    pub fn get_index(&self, idx: usize) -> Option<&Segment> {
        self.segments.get_index(idx).map(|(_, segment)| segment)
    }

    /// Eligible segments in draw-index order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Eligible segment identifiers in draw-index order.
    pub fn ids(&self) -> impl Iterator<Item = &SegmentId> {
        self.segments.keys()
    }

    /// Eligible segments of one channel, in hour order.
    pub fn channel_segments<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = &'a Segment> {
        self.segments
            .values()
            .filter(move |segment| segment.channel == channel)
    }

    /// Trailing windows shorter than a full hour.
    pub fn partial_segments(&self) -> &[Segment] {
        &self.partial
    }

    /// Mean of each eligible segment, in draw-index order.
    pub fn segment_means(&self) -> Vec<Sample> {
        self.segments.values().filter_map(Segment::mean).collect()
    }
}

/// Samples in one hour at `step` seconds per sample.
pub fn samples_per_hour(step: u32) -> Result<usize, DispatchError> {
    if step == 0 || SECONDS_PER_HOUR % step != 0 {
        return Err(DispatchError::InvalidArgument(format!(
            "step {step} does not evenly divide one hour ({SECONDS_PER_HOUR}s)"
        )));
    }
    Ok((SECONDS_PER_HOUR / step) as usize)
}

/// Number of hour windows visited for a table of `rows` rows.
///
/// The last row's synthetic hour coordinate is rounded, so a trailing window
/// covering at least half an hour is visited (and then set aside as partial).
pub fn hour_count(rows: usize, step: u32) -> usize {
    if rows == 0 {
        return 0;
    }
    let last_hour = (rows - 1) as f64 * f64::from(step) / f64::from(SECONDS_PER_HOUR);
    (last_hour + HOUR_COUNT_ROUNDING).floor() as usize
}

/// Compose the `channel_hour` segment identifier.
pub fn segment_id(channel: &str, hour: usize) -> SegmentId {
    format!("{channel}{SEGMENT_ID_SEPARATOR}{hour}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticLevel, RecordingDiagnostics};

    fn ramp_table(channels: &[&str], rows: usize) -> RawTable {
        RawTable::from_columns(
            channels
                .iter()
                .enumerate()
                .map(|(c, name)| {
                    let values = (0..rows).map(|r| (c * 100_000 + r) as f64).collect();
                    (name.to_string(), values)
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn two_hours_yield_two_full_segments() {
        let sink = RecordingDiagnostics::new();
        let corpus = SegmentCorpus::build(&ramp_table(&["reg"], 1800), 4, &sink).unwrap();
        assert_eq!(corpus.segment_len(), 900);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.total_samples(), 1800);
        assert!(corpus.partial_segments().is_empty());
        let ids: Vec<&SegmentId> = corpus.ids().collect();
        assert_eq!(ids, vec!["reg_0", "reg_1"]);
        assert_eq!(corpus.get("reg_1").unwrap().values[0], 900.0);
    }

    #[test]
    fn trailing_half_hour_is_kept_aside() {
        let sink = RecordingDiagnostics::new();
        let corpus = SegmentCorpus::build(&ramp_table(&["reg"], 1500), 4, &sink).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.partial_segments().len(), 1);
        assert_eq!(corpus.partial_segments()[0].id, "reg_1");
        assert_eq!(corpus.partial_segments()[0].len(), 600);
        assert!(
            sink.messages_at(DiagnosticLevel::Debug)
                .iter()
                .any(|message| message.contains("reg_1"))
        );
    }

    #[test]
    fn trailing_quarter_hour_is_not_visited() {
        let sink = RecordingDiagnostics::new();
        let corpus = SegmentCorpus::build(&ramp_table(&["reg"], 1125), 4, &sink).unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.partial_segments().is_empty());
    }

    #[test]
    fn segments_concatenate_back_to_truncated_channel() {
        let table = ramp_table(&["a", "b"], 2700 + 17);
        let sink = RecordingDiagnostics::new();
        let corpus = SegmentCorpus::build(&table, 4, &sink).unwrap();
        assert_eq!(corpus.len(), 6);
        for channel in ["a", "b"] {
            let joined: Vec<f64> = corpus
                .channel_segments(channel)
                .flat_map(|segment| segment.values.iter().copied())
                .collect();
            let raw = table.column(channel).unwrap();
            assert_eq!(joined.as_slice(), &raw[..2700]);
            assert!(corpus.channel_segments(channel).all(|s| s.len() == 900));
        }
    }

    #[test]
    fn hour_count_rounds_the_last_coordinate() {
        assert_eq!(hour_count(0, 4), 0);
        assert_eq!(hour_count(1, 4), 0);
        assert_eq!(hour_count(450, 4), 0);
        assert_eq!(hour_count(452, 4), 1);
        assert_eq!(hour_count(1800, 4), 2);
    }

    #[test]
    fn step_must_divide_an_hour() {
        assert!(samples_per_hour(0).is_err());
        assert!(samples_per_hour(7).is_err());
        assert_eq!(samples_per_hour(4).unwrap(), 900);
    }
}
