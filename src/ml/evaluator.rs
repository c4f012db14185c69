// ============================================================
// Layer 5 - Test Evaluation
// ============================================================
// Scores the trained model on the test partition:
//
//   batches  = floor(test_samples / test_batch_size)
//   excluded = test_samples - batches * test_batch_size
//   average  = sum(batch error) / batches * 100
//
//   MNIST: 10000 / 256 → 39 batches, 16 samples never scored
//
// Sequential walks the partition in order, so each scored sample
// is seen exactly once. Random draws each batch independently
// (no replacement inside a batch, repeats across batches).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::sampler::BatchSampler;
use crate::domain::error::PipelineError;
use crate::domain::traits::MinibatchEvaluator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalSampling {
    #[default]
    Sequential,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub batches:           usize,
    pub batch_size:        usize,
    pub excluded:          usize,
    /// Mean per-batch error, as a percentage
    pub average_error_pct: f64,
}

/// Full batches that fit in `test_samples`.
pub fn batch_count(test_samples: usize, batch_size: usize) -> usize {
    if batch_size == 0 { 0 } else { test_samples / batch_size }
}

pub fn evaluate<E: MinibatchEvaluator>(
    evaluator:  &E,
    sampler:    &mut BatchSampler<'_>,
    batch_size: usize,
    sampling:   EvalSampling,
) -> Result<EvaluationReport> {
    let available = sampler.partition_len();
    if batch_size == 0 {
        return Err(PipelineError::InvalidConfig("test batch size must be positive".into()).into());
    }
    let batches = batch_count(available, batch_size);
    if batches == 0 {
        return Err(PipelineError::SamplingOutOfRange { requested: batch_size, available }.into());
    }
    let excluded = available - batches * batch_size;
    tracing::info!(
        "Evaluating {} batches of {} ({:?}), {} samples left out",
        batches,
        batch_size,
        sampling,
        excluded,
    );

    let mut error_sum = 0.0f64;
    for i in 0..batches {
        let batch = match sampling {
            EvalSampling::Sequential => sampler.sequential_batch(i, batch_size)?,
            EvalSampling::Random     => sampler.next_batch(batch_size)?,
        };
        error_sum += evaluator.test_minibatch(batch)?;
    }

    Ok(EvaluationReport {
        batches,
        batch_size,
        excluded,
        average_error_pct: error_sum / batches as f64 * 100.0,
    })
}
