#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Batch views and step cursors over an assembled sequence.
pub mod accessor;
/// Generator configuration.
pub mod config;
/// Centralized constants used across corpus, stitcher, and accessors.
pub mod constants;
/// Hourly segment corpus construction.
pub mod corpus;
/// Raw table and segment types.
pub mod data;
/// Diagnostics sinks.
pub mod diagnostics;
/// The dispatch generator.
pub mod dispatcher;
/// Reusable demo runners shared by binaries.
pub mod example_apps;
/// Draw budget heuristics.
pub mod heuristics;
/// Descriptive statistics helpers.
pub mod metrics;
/// Deterministic random number generation.
pub mod rng;
/// Table source traits and built-in sources.
pub mod source;
/// Continuity-preserving segment stitching.
pub mod stitcher;
/// Input transports used by sources (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Assembled-sequence plausibility checks.
pub mod validation;

mod errors;

pub use accessor::{DispatchStep, SequenceView, StepCursor, TimeScale};
pub use config::DispatchConfig;
pub use corpus::SegmentCorpus;
pub use data::{RawTable, Segment};
pub use diagnostics::{DiagnosticLevel, Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use dispatcher::Dispatcher;
pub use errors::DispatchError;
pub use metrics::SequenceSummary;
pub use source::{DelimitedSourceConfig, DelimitedTableSource, InMemoryTableSource, TableSource};
pub use stitcher::{AssembledSequence, RandomDraw, SplicePiece, Stitcher};
pub use types::{ChannelName, LogMessage, PathString, Sample, SegmentId, SourceId};
pub use validation::MeanCheck;
