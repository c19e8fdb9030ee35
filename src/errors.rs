use thiserror::Error;

use crate::types::PathString;

/// Error type for corpus loading, stitching, and sequence access failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch data at '{path}' is unavailable: {reason}")]
    DataUnavailable { path: PathString, reason: String },
    #[error(
        "could not assemble dispatch signal with seed {seed}: {draws} draws produced {assembled} of {target} samples; please try another seed or a shorter length"
    )]
    StitchingExhausted {
        seed: u64,
        draws: usize,
        assembled: usize,
        target: usize,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("step cursor at {elapsed}s is past the end of the {covered}s dispatch sequence")]
    CursorExhausted { elapsed: u64, covered: u64 },
}
