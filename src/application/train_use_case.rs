// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates a full training run:
//
//   Step 1: Validate the configuration          (Layer 5 - ml)
//   Step 2: Load and partition the dataset      (Layer 4 - data)
//   Step 3: Build the ConvNet and SGD trainer   (Layer 5 - ml)
//   Step 4: Run the training session            (Layer 5 - ml)
//   Step 5: Evaluate on the test partition      (Layer 5 - ml)
//   Step 6: Save checkpoint + metrics CSV       (Layer 6 - infra)
//   Step 7: Plot curves, print the summary      (Layer 6 - infra)

use anyhow::{Context, Result};
use burn::{optim::SgdConfig, prelude::*};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{loader::DatasetLoader, sampler::BatchSampler, source::MnistSource};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::image::ImageShape;
use crate::domain::metrics::MetricsLog;
use crate::domain::traits::{DatasetSource, Plotter};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    plot::{NoopPlotter, TextPlotter},
    report::report,
};
use crate::ml::{
    engine::BurnTrainer,
    evaluator::{evaluate, EvalSampling, EvaluationReport},
    model::{ConvNet, ConvNetConfig},
    trainer::{TrainingSchedule, TrainingSession},
    TrainingBackend,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Saved next to the checkpoint so `evaluate`
// can rebuild the same partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub image_shape:          ImageShape,
    pub num_training_samples: usize,
    pub batch_size:           usize,
    pub epochs:               usize,
    pub learning_rate:        f64,
    pub train_log_iter:       usize,
    pub test_batch_size:      usize,
    pub seed:                 u64,
    pub eval_sampling:        EvalSampling,
    pub output_dir:           Option<PathBuf>,
    pub plot:                 bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            image_shape:          ImageShape::MNIST,
            num_training_samples: 60_000,
            batch_size:           64,
            epochs:               10,
            learning_rate:        0.1,
            train_log_iter:       500,
            test_batch_size:      256,
            seed:                 42,
            eval_sampling:        EvalSampling::Sequential,
            output_dir:           None,
            plot:                 true,
        }
    }
}

impl TrainConfig {
    /// Checks the values and derives the iteration schedule.
    pub fn schedule(&self) -> PipelineResult<TrainingSchedule> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.test_batch_size == 0 {
            return Err(PipelineError::InvalidConfig("test batch size must be positive".into()));
        }
        TrainingSchedule::from_epochs(
            self.num_training_samples,
            self.epochs,
            self.batch_size,
            self.train_log_iter,
        )
    }

    /// Seed of the test sampler, kept apart from the training draws.
    pub fn test_seed(&self) -> u64 {
        self.seed.wrapping_add(1)
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub metrics:    MetricsLog,
    pub evaluation: EvaluationReport,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train on MNIST with the configured plotter.
    pub fn execute(&self) -> Result<TrainOutcome> {
        let source = MnistSource::new();
        if self.config.plot {
            self.execute_with(&source, &TextPlotter::default())
        } else {
            self.execute_with(&source, &NoopPlotter)
        }
    }

    pub fn execute_with(&self, source: &dyn DatasetSource, plotter: &dyn Plotter) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        let schedule = cfg.schedule()?;
        TrainingBackend::seed(cfg.seed);

        // ── Step 2: Load train/test partitions ────────────────────────────────
        let loader = DatasetLoader::new(cfg.image_shape, cfg.num_training_samples);
        let (train, test) = loader.load(source)?;

        // ── Step 3: Model + optimizer ─────────────────────────────────────────
        let device    = Default::default();
        let model_cfg = ConvNetConfig::for_shape(cfg.image_shape, loader.encoder().num_classes());
        let model: ConvNet<TrainingBackend> = model_cfg.init(&device);
        let trainer = BurnTrainer::new(
            model,
            SgdConfig::new().init(),
            device,
            cfg.image_shape,
            cfg.learning_rate,
        );
        tracing::info!("Model ready: {} features into the classifier", model_cfg.flattened_features());

        // ── Step 4: Training session ──────────────────────────────────────────
        let mut session = TrainingSession::new(trainer, schedule);
        let mut train_sampler = BatchSampler::new(&train, cfg.seed);
        session.run(&mut train_sampler)?;
        let (trainer, metrics) = session.into_parts();

        // ── Step 5: Evaluate ──────────────────────────────────────────────────
        let evaluator = trainer.evaluator();
        let mut test_sampler = BatchSampler::new(&test, cfg.test_seed());
        let evaluation = evaluate(&evaluator, &mut test_sampler, cfg.test_batch_size, cfg.eval_sampling)
            .context("Evaluation on the test partition failed")?;

        // ── Step 6: Persist ───────────────────────────────────────────────────
        if let Some(dir) = &cfg.output_dir {
            let ckpt = CheckpointManager::create(dir)?;
            ckpt.save_config(cfg)?;
            ckpt.save_model_config(&model_cfg)?;
            ckpt.save_model(trainer.model())?;
            MetricsLogger::create(dir)?.log_all(&metrics)?;
            tracing::info!("Checkpoint written to '{}'", dir.display());
        }

        // ── Step 7: Report ────────────────────────────────────────────────────
        report(&metrics, evaluation.average_error_pct, plotter)?;

        Ok(TrainOutcome { metrics, evaluation })
    }
}
