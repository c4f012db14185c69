// ============================================================
// Layer 4 - Batch Sampler
// ============================================================
// Draws minibatches from a partition.
//
//   next_batch(n)          → n distinct rows chosen uniformly at
//                            random. Every call is independent:
//                            no epoch bookkeeping, so a row can
//                            show up in many batches or in none.
//   sequential_batch(i, n) → rows [i*n, (i+1)*n), for exhaustive
//                            evaluation passes.
//
// Uses rand::seq::index::sample, which picks without
// replacement within a single draw.

use rand::{rngs::StdRng, seq::index, SeedableRng};

use crate::data::dataset::Partition;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::image::Minibatch;

pub struct BatchSampler<'a> {
    partition: &'a Partition,
    rng:       StdRng,
}

impl<'a> BatchSampler<'a> {
    /// Sampler with its own seeded generator, so runs are reproducible.
    pub fn new(partition: &'a Partition, seed: u64) -> Self {
        Self {
            partition,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn partition_len(&self) -> usize {
        self.partition.sample_count()
    }

    /// `n` samples drawn uniformly without replacement.
    pub fn next_batch(&mut self, n: usize) -> PipelineResult<Minibatch> {
        let available = self.partition_len();
        if n > available {
            return Err(PipelineError::SamplingOutOfRange { requested: n, available });
        }
        let picked = index::sample(&mut self.rng, available, n);
        self.collect(picked.into_iter())
    }

    /// The `batch_index`-th block of `n` consecutive samples.
    pub fn sequential_batch(&self, batch_index: usize, n: usize) -> PipelineResult<Minibatch> {
        let available = self.partition_len();
        let start     = batch_index.saturating_mul(n);
        let end       = start.saturating_add(n);
        if end > available {
            return Err(PipelineError::SamplingOutOfRange { requested: end, available });
        }
        self.collect(start..end)
    }

    fn collect(&self, indices: impl Iterator<Item = usize>) -> PipelineResult<Minibatch> {
        let samples = indices
            .map(|i| {
                self.partition.sample(i).ok_or(PipelineError::SamplingOutOfRange {
                    requested: i + 1,
                    available: self.partition_len(),
                })
            })
            .collect::<PipelineResult<Vec<_>>>()?;
        Ok(Minibatch {
            shape: self.partition.shape(),
            samples,
        })
    }
}
