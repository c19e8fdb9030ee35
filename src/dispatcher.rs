//! Regulation dispatch generator.
//!
//! Construction is eager: the table is loaded, cut into hourly segments,
//! stitched into one sequence and checked, all before `Dispatcher` is returned.
//! Any failure along the way aborts construction; there is no partially usable
//! instance. Afterwards the sequence is immutable and only the step cursor moves.

use std::sync::Arc;

use crate::accessor::{DispatchStep, SequenceView, StepCursor, TimeScale};
use crate::config::DispatchConfig;
use crate::corpus::SegmentCorpus;
use crate::data::RawTable;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::errors::DispatchError;
use crate::metrics::SequenceSummary;
use crate::rng::entropy_seed;
use crate::source::{DelimitedTableSource, InMemoryTableSource, TableSource};
use crate::stitcher::{AssembledSequence, Stitcher};
use crate::validation::{MeanCheck, validate_mean};

/// Owns one corpus and the sequence assembled from it.
pub struct Dispatcher {
    config: DispatchConfig,
    corpus: SegmentCorpus,
    sequence: AssembledSequence,
    mean_check: Option<MeanCheck>,
    elapsed: u64,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Dispatcher {
    /// Build from the delimited table at `config.db`, logging through `tracing`.
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        Self::with_diagnostics(config, Arc::new(TracingDiagnostics))
    }

    /// Build from the delimited table at `config.db` with an explicit diagnostics sink.
    pub fn with_diagnostics(
        config: DispatchConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, DispatchError> {
        let source = DelimitedTableSource::from_path(config.db.clone());
        Self::from_source(config, &source, diagnostics)
    }

    /// Build from an already loaded table.
    pub fn from_table(
        config: DispatchConfig,
        table: RawTable,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, DispatchError> {
        Self::from_source(config, &InMemoryTableSource::new("in_memory", table), diagnostics)
    }

    /// Build from any table source.
    pub fn from_source(
        config: DispatchConfig,
        source: &dyn TableSource,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, DispatchError> {
        let config = config.sanitized(diagnostics.as_ref());

        let table = source.load().inspect_err(|err| diagnostics.error(&err.to_string()))?;
        let corpus = SegmentCorpus::build(&table, config.step, diagnostics.as_ref())?;
        if corpus.is_empty() {
            let err = DispatchError::DataUnavailable {
                path: source.id().to_string(),
                reason: format!(
                    "table of {} rows holds no full hour of samples",
                    table.row_count()
                ),
            };
            diagnostics.error(&err.to_string());
            return Err(err);
        }

        let seed = config.seed.unwrap_or_else(|| {
            let seed = entropy_seed();
            diagnostics.debug(&format!("no seed configured; drew seed {seed}"));
            seed
        });
        let sequence = Stitcher::new(&corpus, diagnostics.as_ref())
            .stitch(config.target_samples(), seed)?;
        let mean_check = validate_mean(&sequence, &corpus, diagnostics.as_ref());

        Ok(Self {
            config,
            corpus,
            sequence,
            mean_check,
            elapsed: 0,
            diagnostics,
        })
    }

    /// Effective configuration after coercion of unsupported values.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Segment corpus the sequence was drawn from.
    pub fn corpus(&self) -> &SegmentCorpus {
        &self.corpus
    }

    /// The assembled sequence.
    pub fn sequence(&self) -> &AssembledSequence {
        &self.sequence
    }

    /// Seed actually used for the draw sequence.
    pub fn seed(&self) -> u64 {
        self.sequence.seed()
    }

    /// Result of the mean plausibility check; `None` for an empty sequence.
    pub fn mean_check(&self) -> Option<&MeanCheck> {
        self.mean_check.as_ref()
    }

    /// Descriptive statistics of the assembled sequence.
    pub fn summary(&self) -> Option<SequenceSummary> {
        SequenceSummary::from_values(self.sequence.values())
    }

    /// Diagnostics sink owned by this generator.
    pub fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }

    /// Elapsed seconds of the step cursor.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Return the current time and value, then advance by one step.
    ///
    /// Fails with `CursorExhausted` once the cursor has passed the last sample.
    pub fn do_step(&mut self) -> Result<DispatchStep, DispatchError> {
        let step = u64::from(self.sequence.step());
        let idx = (self.elapsed / step) as usize;
        let Some(&value) = self.sequence.values().get(idx) else {
            return Err(DispatchError::CursorExhausted {
                elapsed: self.elapsed,
                covered: self.sequence.duration(),
            });
        };
        let time = self.elapsed as f64;
        self.elapsed += step;
        Ok(DispatchStep { time, value })
    }

    /// Rewind the step cursor to time zero.
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    /// Iterate every step from time zero without moving the step cursor.
    pub fn steps(&self) -> StepCursor<'_> {
        StepCursor::new(&self.sequence)
    }

    /// Whole sequence with its index in `scale` units.
    pub fn sequence_view(&self, scale: TimeScale) -> SequenceView {
        SequenceView::new(&self.sequence, scale)
    }

    /// Whole sequence with its index selected by name: `None`, `"hour"` or `"minute"`.
    pub fn get_sequence(&self, selector: Option<&str>) -> Result<SequenceView, DispatchError> {
        let scale = TimeScale::from_selector(selector)
            .inspect_err(|err| self.diagnostics.error(&err.to_string()))?;
        Ok(self.sequence_view(scale))
    }
}
