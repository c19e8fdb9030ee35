use crate::errors::DispatchError;
use crate::types::{ChannelName, Sample, SegmentId};

/// Rectangular table of raw recorded values.
///
/// Rows are implicitly time-ordered at a fixed step; there is no timestamp
/// column. Values are stored per channel (column-major) since every consumer
/// slices channels independently.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    channels: Vec<ChannelName>,
    columns: Vec<Vec<Sample>>,
}

impl RawTable {
    /// Build a table from named columns. All columns must have equal length.
    pub fn from_columns(
        columns: Vec<(ChannelName, Vec<Sample>)>,
    ) -> Result<Self, DispatchError> {
        let expected = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
        if let Some((name, values)) = columns
            .iter()
            .find(|(_, values)| values.len() != expected)
        {
            return Err(DispatchError::InvalidArgument(format!(
                "channel '{name}' has {} rows, expected {expected}",
                values.len()
            )));
        }
        let (channels, columns) = columns.into_iter().unzip();
        Ok(Self { channels, columns })
    }

    /// Build a table from a header and row-major values.
    pub fn from_rows(
        channels: Vec<ChannelName>,
        rows: Vec<Vec<Sample>>,
    ) -> Result<Self, DispatchError> {
        let mut columns: Vec<Vec<Sample>> = vec![Vec::with_capacity(rows.len()); channels.len()];
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != channels.len() {
                return Err(DispatchError::InvalidArgument(format!(
                    "row {row_idx} has {} values, expected {}",
                    row.len(),
                    channels.len()
                )));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Ok(Self { channels, columns })
    }

    /// Channel names in table order.
    pub fn channels(&self) -> &[ChannelName] {
        &self.channels
    }

    /// Number of rows (samples per channel).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    /// True when the table has no channels or no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Values of the channel named `name`.
    pub fn column(&self, name: &str) -> Option<&[Sample]> {
        self.channels
            .iter()
            .position(|channel| channel == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterate `(channel, values)` pairs in table order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&ChannelName, &[Sample])> {
        self.channels
            .iter()
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}

/// One hour of one raw channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Identifier in `channel_hour` form.
    pub id: SegmentId,
    /// Source channel.
    pub channel: ChannelName,
    /// Zero-based hour index within the channel.
    pub hour: usize,
    /// Samples in recording order.
    pub values: Vec<Sample>,
}

impl Segment {
    /// Number of samples in this segment.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the segment holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean of the segment, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Index of the first sample equal to `value`.
    pub fn first_match(&self, value: Sample) -> Option<usize> {
        self.values.iter().position(|candidate| *candidate == value)
    }
}
