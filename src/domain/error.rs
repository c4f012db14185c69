// ============================================================
// Layer 3 - Pipeline Errors
// ============================================================
// Every failure the pipeline can hit, in one enum.
// None of them are retried: each one ends the run.
//
//   DatasetUnavailable   → the source could not produce images
//   ShapeMismatch        → counts or dimensions disagree
//   InsufficientSamples  → the train/test split would leave test empty
//   UnknownLabel         → a label outside the fixed class list
//   SamplingOutOfRange   → batch larger than the partition
//   NumericalDivergence  → the loss stopped being a finite number
//   InvalidConfig        → a hyperparameter that makes the run meaningless

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error(
        "dataset has {available} samples but {train} are reserved for training; \
         the test partition would be empty"
    )]
    InsufficientSamples { available: usize, train: usize },

    #[error("label {label} is not one of the {num_classes} known classes")]
    UnknownLabel { label: u8, num_classes: usize },

    #[error("cannot draw {requested} samples from a partition of {available}")]
    SamplingOutOfRange { requested: usize, available: usize },

    #[error("loss diverged at iteration {iteration} (loss = {loss})")]
    NumericalDivergence { iteration: usize, loss: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
