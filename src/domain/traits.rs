// ============================================================
// Layer 3 - Core Traits (Seams)
// ============================================================
// The points where the pipeline meets its collaborators:
//
//   DatasetSource       → whatever supplies labeled images
//   MinibatchTrainer    → the engine that runs one SGD step
//   MinibatchEvaluator  → the engine that scores one test batch
//   Plotter             → whatever draws a line chart
//
// The training and evaluation loops only see these traits,
// so they can be driven by burn in production and by small
// fakes in tests.

use anyhow::Result;

use crate::domain::error::PipelineResult;
use crate::domain::image::{LabeledImages, Minibatch};
use crate::domain::metrics::BatchScores;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Supplies the full labeled image collection.
///
/// Implementations:
///   - MnistSource    → burn's MNIST download/cache
///   - InMemorySource → data already held in memory
pub trait DatasetSource {
    fn load_all(&self) -> PipelineResult<LabeledImages>;

    /// Short human-readable name used in log lines
    fn describe(&self) -> String;
}

// ─── MinibatchTrainer ─────────────────────────────────────────────────────────
/// Runs forward, backward and one optimizer update on a minibatch,
/// returning the loss and classification error measured before the update.
pub trait MinibatchTrainer {
    fn train_minibatch(&mut self, batch: Minibatch) -> Result<BatchScores>;
}

// ─── MinibatchEvaluator ───────────────────────────────────────────────────────
/// Scores a minibatch without touching the model parameters.
/// Returns the classification error in [0, 1].
pub trait MinibatchEvaluator {
    fn test_minibatch(&self, batch: Minibatch) -> Result<f64>;
}

// ─── Plotter ──────────────────────────────────────────────────────────────────
/// Renders one line series.
pub trait Plotter {
    fn render_line(
        &self,
        points:  &[(f32, f32)],
        x_label: &str,
        y_label: &str,
        title:   &str,
    ) -> Result<()>;
}
