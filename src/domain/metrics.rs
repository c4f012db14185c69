// ============================================================
// Layer 3 - Training Metrics Log
// ============================================================
// The (iteration, loss, error) triples recorded while training.
// Append-only: records go in, nothing is edited or removed.
// Reporting reads it once after training ends.

use serde::{Deserialize, Serialize};

/// Scalar results of one train or test step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchScores {
    /// Mean softmax cross-entropy over the minibatch
    pub loss: f64,

    /// Fraction of the minibatch misclassified, in [0, 1]
    pub error: f64,
}

impl BatchScores {
    pub fn new(loss: f64, error: f64) -> Self {
        Self { loss, error }
    }

    /// True when at least one of the scores carries information:
    /// a finite value that is not exactly zero.
    pub fn is_reportable(&self) -> bool {
        is_real(self.loss) || is_real(self.error)
    }
}

fn is_real(v: f64) -> bool {
    v.is_finite() && v != 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub iteration: usize,
    pub loss:      f64,
    pub error:     f64,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsLog {
    records: Vec<MetricRecord>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Returns false (and records nothing) when
    /// neither score is reportable.
    pub fn record(&mut self, iteration: usize, scores: BatchScores) -> bool {
        if !scores.is_reportable() {
            return false;
        }
        self.records.push(MetricRecord {
            iteration,
            loss:  scores.loss,
            error: scores.error,
        });
        true
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (iteration, loss) points for plotting
    pub fn loss_series(&self) -> Vec<(f32, f32)> {
        self.records
            .iter()
            .map(|r| (r.iteration as f32, r.loss as f32))
            .collect()
    }

    /// (iteration, error) points for plotting
    pub fn error_series(&self) -> Vec<(f32, f32)> {
        self.records
            .iter()
            .map(|r| (r.iteration as f32, r.error as f32))
            .collect()
    }
}
