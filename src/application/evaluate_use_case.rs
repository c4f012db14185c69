// ============================================================
// Layer 2 - EvaluateUseCase
// ============================================================
// Re-scores a saved checkpoint without training:
//
//   Step 1: Read train_config.json + model_config.json   (infra)
//   Step 2: Rebuild the same train/test partitions       (data)
//   Step 3: Load the weights into a fresh ConvNet        (infra)
//   Step 4: Evaluation loop on the test partition        (ml)
//   Step 5: Replot metrics.csv if present, print summary (infra)

use anyhow::Result;
use std::path::PathBuf;

use crate::data::{loader::DatasetLoader, sampler::BatchSampler, source::MnistSource};
use crate::domain::metrics::{BatchScores, MetricsLog};
use crate::domain::traits::{DatasetSource, Plotter};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::read_metrics,
    plot::{NoopPlotter, TextPlotter},
    report::report,
};
use crate::ml::{
    engine::BurnEvaluator,
    evaluator::{evaluate, EvalSampling, EvaluationReport},
    model::ConvNet,
    InferenceBackend,
};

pub struct EvaluateUseCase {
    checkpoint_dir: PathBuf,
    /// Overrides the strategy stored with the checkpoint
    sampling:       Option<EvalSampling>,
    plot:           bool,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: impl Into<PathBuf>, sampling: Option<EvalSampling>, plot: bool) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into(), sampling, plot }
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        let source = MnistSource::new();
        if self.plot {
            self.execute_with(&source, &TextPlotter::default())
        } else {
            self.execute_with(&source, &NoopPlotter)
        }
    }

    pub fn execute_with(&self, source: &dyn DatasetSource, plotter: &dyn Plotter) -> Result<EvaluationReport> {
        // ── Step 1: Configs ───────────────────────────────────────────────────
        let ckpt      = CheckpointManager::open(&self.checkpoint_dir)?;
        let cfg       = ckpt.load_config()?;
        let model_cfg = ckpt.load_model_config()?;
        let sampling  = self.sampling.unwrap_or(cfg.eval_sampling);

        // ── Step 2: Partitions ────────────────────────────────────────────────
        let loader = DatasetLoader::new(cfg.image_shape, cfg.num_training_samples);
        let (_train, test) = loader.load(source)?;

        // ── Step 3: Weights ───────────────────────────────────────────────────
        let device = Default::default();
        let model: ConvNet<InferenceBackend> = model_cfg.init(&device);
        let model = ckpt.load_model(model, &device)?;
        tracing::info!("Model loaded from '{}'", ckpt.dir().display());

        // ── Step 4: Evaluate ──────────────────────────────────────────────────
        let evaluator = BurnEvaluator::new(model, device, cfg.image_shape);
        let mut sampler = BatchSampler::new(&test, cfg.test_seed());
        let evaluation = evaluate(&evaluator, &mut sampler, cfg.test_batch_size, sampling)?;

        // ── Step 5: Report ────────────────────────────────────────────────────
        let metrics = self.recorded_metrics(&ckpt);
        report(&metrics, evaluation.average_error_pct, plotter)?;

        Ok(evaluation)
    }

    /// Training curves saved with the checkpoint, or an empty log.
    fn recorded_metrics(&self, ckpt: &CheckpointManager) -> MetricsLog {
        let path = ckpt.dir().join("metrics.csv");
        let mut log = MetricsLog::new();
        match read_metrics(&path) {
            Ok(rows) => {
                for r in rows {
                    log.record(r.iteration, BatchScores::new(r.loss, r.error));
                }
            }
            Err(e) => tracing::warn!("No training curves to plot: {e:#}"),
        }
        log
    }
}
