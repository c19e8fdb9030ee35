//! Continuity-preserving stitching of hourly segments.
//!
//! A pass owns a pre-materialized [`RandomDraw`] and walks it forward once.
//! The first draw seeds the sequence; every later draw is spliced in at the
//! first sample equal to the current last value (that sample is repeated, so a
//! seam is flat rather than a jump). Draws without such a sample are skipped.

use rand::Rng;

use crate::corpus::SegmentCorpus;
use crate::diagnostics::Diagnostics;
use crate::errors::DispatchError;
use crate::heuristics::{draw_budget, min_segments_needed};
use crate::rng::DeterministicRng;
use crate::types::{Sample, SegmentId};

/// Seeded, precomputed sequence of segment indices consumed in order.
#[derive(Clone, Debug)]
pub struct RandomDraw {
    seed: u64,
    indices: Vec<usize>,
    cursor: usize,
}

impl RandomDraw {
    /// Draw `budget` indices uniformly, with replacement, from `0..population`.
    pub fn generate(seed: u64, population: usize, budget: usize) -> Self {
        let mut rng = DeterministicRng::new(seed);
        let indices = if population == 0 {
            Vec::new()
        } else {
            (0..budget)
                .map(|_| rng.random_range(0..population))
                .collect()
        };
        Self {
            seed,
            indices,
            cursor: 0,
        }
    }

    /// Seed this draw sequence was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Total number of draws provisioned.
    pub fn budget(&self) -> usize {
        self.indices.len()
    }

    /// Draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Every provisioned index, consumed or not.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl Iterator for RandomDraw {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = *self.indices.get(self.cursor)?;
        self.cursor += 1;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.indices.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

/// One accepted draw: which segment, from which sample, placed where.
#[derive(Clone, Debug, PartialEq)]
pub struct SplicePiece {
    /// Segment the samples came from.
    pub segment: SegmentId,
    /// First sample taken from the segment.
    pub offset: usize,
    /// Position of that sample in the assembled sequence.
    pub start: usize,
}

/// Stitched output of one pass, truncated to the requested length.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledSequence {
    step: u32,
    seed: u64,
    values: Vec<Sample>,
    pieces: Vec<SplicePiece>,
    draws_consumed: usize,
}

impl AssembledSequence {
    /// Seconds between samples.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Seed the draw sequence was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Samples in time order; sample `i` sits at `i * step` seconds.
    pub fn values(&self) -> &[Sample] {
        &self.values
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a zero-length sequence.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Time of sample `idx`, in seconds.
    pub fn time_at(&self, idx: usize) -> u64 {
        idx as u64 * u64::from(self.step)
    }

    /// Seconds covered by the sequence (`len * step`).
    pub fn duration(&self) -> u64 {
        self.time_at(self.values.len())
    }

    /// Draws consumed from the draw sequence, accepted or not.
    pub fn draws_consumed(&self) -> usize {
        self.draws_consumed
    }

    /// Accepted draws that contribute at least one sample, in order.
    pub fn pieces(&self) -> &[SplicePiece] {
        &self.pieces
    }

    /// Positions of seam samples (each equals the sample right before it).
    pub fn seams(&self) -> impl Iterator<Item = usize> + '_ {
        self.pieces.iter().skip(1).map(|piece| piece.start)
    }

    /// Arithmetic mean, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }
}

/// Assembles sequences from a corpus.
pub struct Stitcher<'a> {
    corpus: &'a SegmentCorpus,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Stitcher<'a> {
    /// Create a stitcher over `corpus`, reporting through `diagnostics`.
    pub fn new(corpus: &'a SegmentCorpus, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            corpus,
            diagnostics,
        }
    }

    /// Draws provisioned for a pass targeting `target_samples`.
    pub fn budget_for(&self, target_samples: usize) -> usize {
        draw_budget(target_samples, self.corpus.segment_len())
    }

    /// Assemble exactly `target_samples` samples from draws seeded by `seed`.
    pub fn stitch(
        &self,
        target_samples: usize,
        seed: u64,
    ) -> Result<AssembledSequence, DispatchError> {
        let draw = RandomDraw::generate(
            seed,
            self.corpus.len(),
            self.budget_for(target_samples),
        );
        self.stitch_with(target_samples, draw)
    }

    /// Assemble exactly `target_samples` samples by consuming `draw` forward.
    pub fn stitch_with(
        &self,
        target_samples: usize,
        mut draw: RandomDraw,
    ) -> Result<AssembledSequence, DispatchError> {
        self.diagnostics.debug(&format!(
            "stitching {target_samples} samples with seed {} (budget {} draws, at least {} segments)",
            draw.seed(),
            draw.budget(),
            min_segments_needed(target_samples, self.corpus.segment_len())
        ));

        let mut values: Vec<Sample> =
            Vec::with_capacity(target_samples + self.corpus.segment_len());
        let mut pieces = Vec::new();
        while values.len() < target_samples {
            let Some(idx) = draw.next() else {
                let err = DispatchError::StitchingExhausted {
                    seed: draw.seed(),
                    draws: draw.consumed(),
                    assembled: values.len(),
                    target: target_samples,
                };
                self.diagnostics.error(&err.to_string());
                return Err(err);
            };
            let Some(segment) = self.corpus.get_index(idx) else {
                continue;
            };
            let offset = match values.last() {
                None => 0,
                Some(&last) => match segment.first_match(last) {
                    Some(offset) => offset,
                    None => continue,
                },
            };
            pieces.push(SplicePiece {
                segment: segment.id.clone(),
                offset,
                start: values.len(),
            });
            values.extend_from_slice(&segment.values[offset..]);
        }

        values.truncate(target_samples);
        pieces.retain(|piece| piece.start < target_samples);
        Ok(AssembledSequence {
            step: self.corpus.step(),
            seed: draw.seed(),
            values,
            pieces,
            draws_consumed: draw.consumed(),
        })
    }
}
