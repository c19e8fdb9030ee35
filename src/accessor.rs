use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::constants::accessor::{
    ALLOWED_SELECTORS, SELECTOR_HOUR, SELECTOR_MINUTE, TIME_LABEL_HOURS, TIME_LABEL_MINUTES,
    TIME_LABEL_SECONDS, VALUE_LABEL,
};
use crate::constants::signal::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::errors::DispatchError;
use crate::stitcher::AssembledSequence;
use crate::types::Sample;

/// Time unit of a batch view's index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    /// Seconds since the start of the sequence.
    #[default]
    Seconds,
    /// Minutes since the start of the sequence.
    Minutes,
    /// Hours since the start of the sequence.
    Hours,
}

impl TimeScale {
    /// Resolve an optional selector: `None` is seconds, otherwise `"hour"` or `"minute"`.
    pub fn from_selector(selector: Option<&str>) -> Result<Self, DispatchError> {
        selector.map_or(Ok(Self::Seconds), |raw| raw.parse())
    }

    /// Seconds per unit.
    pub fn divisor(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => f64::from(SECONDS_PER_MINUTE),
            Self::Hours => f64::from(SECONDS_PER_HOUR),
        }
    }

    /// Index label, for example `Time [h]`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Seconds => TIME_LABEL_SECONDS,
            Self::Minutes => TIME_LABEL_MINUTES,
            Self::Hours => TIME_LABEL_HOURS,
        }
    }
}

impl FromStr for TimeScale {
    type Err = DispatchError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            SELECTOR_HOUR => Ok(Self::Hours),
            SELECTOR_MINUTE => Ok(Self::Minutes),
            other => Err(DispatchError::InvalidArgument(format!(
                "the timestamp selector \"{other}\" is invalid; use one of: {ALLOWED_SELECTORS}"
            ))),
        }
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One stepwise observation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DispatchStep {
    /// Elapsed time in seconds.
    pub time: f64,
    /// Dispatch value at `time`, in kW.
    pub value: Sample,
}

/// Whole assembled sequence with a rescaled time index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceView {
    /// Unit of `times`.
    pub scale: TimeScale,
    /// Index label, for example `Time [min]`.
    pub time_label: &'static str,
    /// Value label (`Dispatch [kW]`).
    pub value_label: &'static str,
    /// Time of each sample in `scale` units, starting at zero.
    pub times: Vec<f64>,
    /// Dispatch samples in time order.
    pub values: Vec<Sample>,
}

impl SequenceView {
    /// Copy `sequence` with its index expressed in `scale` units.
    pub fn new(sequence: &AssembledSequence, scale: TimeScale) -> Self {
        let divisor = scale.divisor();
        let times = (0..sequence.len())
            .map(|idx| sequence.time_at(idx) as f64 / divisor)
            .collect();
        Self {
            scale,
            time_label: scale.label(),
            value_label: VALUE_LABEL,
            times,
            values: sequence.values().to_vec(),
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a zero-length view.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(time, value)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (f64, Sample)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Points with `time <= limit`, in view units.
    pub fn until(&self, limit: f64) -> impl Iterator<Item = (f64, Sample)> + '_ {
        self.points().take_while(move |(time, _)| *time <= limit)
    }
}

/// Borrowing iterator over every step of a sequence, from time zero.
pub struct StepCursor<'a> {
    sequence: &'a AssembledSequence,
    position: usize,
}

impl<'a> StepCursor<'a> {
    /// Start at time zero.
    pub fn new(sequence: &'a AssembledSequence) -> Self {
        Self {
            sequence,
            position: 0,
        }
    }
}

impl Iterator for StepCursor<'_> {
    type Item = DispatchStep;

    fn next(&mut self) -> Option<DispatchStep> {
        let value = *self.sequence.values().get(self.position)?;
        let time = self.sequence.time_at(self.position) as f64;
        self.position += 1;
        Some(DispatchStep { time, value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequence.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}
