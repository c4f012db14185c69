// ============================================================
// Layer 5 - Training Session
// ============================================================
// Drives a MinibatchTrainer for a fixed number of iterations:
//
//   Idle ──run()──► Stepping ──(i % log_every == 0)──► Logging
//                      ▲                                  │
//                      └──────────────────────────────────┘
//                      │
//                      └──(i == total_iterations)──► Done
//
// Each iteration draws a fresh random minibatch; there is no
// epoch boundary. "Epochs" only sets the iteration count:
//
//   total_iterations = samples * epochs / batch_size
//                    = 60000 * 10 / 64 = 9375 for MNIST
//
// A non-finite loss stops the session with NumericalDivergence.

use anyhow::{bail, Result};

use crate::data::sampler::BatchSampler;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::metrics::{BatchScores, MetricsLog};
use crate::domain::traits::MinibatchTrainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingPhase {
    Idle,
    Stepping,
    Logging,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingSchedule {
    pub total_iterations: usize,
    pub batch_size:       usize,
    pub log_every:        usize,
}

impl TrainingSchedule {
    /// Iteration count from a nominal number of passes over the
    /// training data. The division truncates.
    pub fn from_epochs(
        num_training_samples: usize,
        num_epochs:           usize,
        batch_size:           usize,
        log_every:            usize,
    ) -> PipelineResult<Self> {
        if batch_size == 0 {
            return Err(PipelineError::InvalidConfig("batch size must be positive".into()));
        }
        if log_every == 0 {
            return Err(PipelineError::InvalidConfig("log interval must be positive".into()));
        }
        let total_iterations = num_training_samples
            .checked_mul(num_epochs)
            .ok_or_else(|| PipelineError::InvalidConfig("samples * epochs overflows".into()))?
            / batch_size;
        if total_iterations == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "{num_training_samples} samples x {num_epochs} epochs gives no full batch of {batch_size}"
            )));
        }
        Ok(Self { total_iterations, batch_size, log_every })
    }

    pub fn is_log_iteration(&self, iteration: usize) -> bool {
        iteration % self.log_every == 0
    }
}

pub struct TrainingSession<T: MinibatchTrainer> {
    trainer:  T,
    schedule: TrainingSchedule,
    metrics:  MetricsLog,
    phase:    TrainingPhase,
}

impl<T: MinibatchTrainer> TrainingSession<T> {
    pub fn new(trainer: T, schedule: TrainingSchedule) -> Self {
        Self {
            trainer,
            schedule,
            metrics: MetricsLog::new(),
            phase:   TrainingPhase::Idle,
        }
    }

    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    pub fn metrics(&self) -> &MetricsLog {
        &self.metrics
    }

    pub fn trainer(&self) -> &T {
        &self.trainer
    }

    pub fn into_parts(self) -> (T, MetricsLog) {
        (self.trainer, self.metrics)
    }

    /// Run every scheduled iteration, drawing batches from `sampler`.
    pub fn run(&mut self, sampler: &mut BatchSampler<'_>) -> Result<()> {
        if self.phase != TrainingPhase::Idle {
            bail!("training session already ran (phase {:?})", self.phase);
        }
        let TrainingSchedule { total_iterations, batch_size, .. } = self.schedule;
        tracing::info!(
            "Training for {} iterations of {} samples ({} in the pool)",
            total_iterations,
            batch_size,
            sampler.partition_len(),
        );

        self.phase = TrainingPhase::Stepping;
        for iteration in 0..total_iterations {
            let batch  = sampler.next_batch(batch_size)?;
            let scores = self.trainer.train_minibatch(batch)?;

            if !scores.loss.is_finite() {
                tracing::error!("Loss became {} at minibatch {}", scores.loss, iteration);
                return Err(PipelineError::NumericalDivergence {
                    iteration,
                    loss: scores.loss,
                }
                .into());
            }

            if self.schedule.is_log_iteration(iteration) {
                self.phase = TrainingPhase::Logging;
                self.log_progress(iteration, scores);
                self.phase = TrainingPhase::Stepping;
            }
        }

        self.phase = TrainingPhase::Done;
        tracing::info!("Training complete: {} points recorded", self.metrics.len());
        Ok(())
    }

    /// Prints the status line on every logging iteration. Only scores
    /// that pass `BatchScores::is_reportable` reach the metrics log.
    fn log_progress(&mut self, iteration: usize, scores: BatchScores) -> String {
        let line = format!(
            "Minibatch: {}, Loss: {:.3}, Error: {:.2}%",
            iteration,
            scores.loss,
            scores.error * 100.0,
        );
        println!("{line}");
        if !self.metrics.record(iteration, scores) {
            tracing::debug!("Minibatch {} produced no reportable scores", iteration);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Partition;
    use crate::data::encoder::OneHotEncoder;
    use crate::domain::image::{ImageShape, Minibatch};

    /// Replays a fixed list of scores and counts the batches it saw.
    struct ScriptedTrainer {
        scores:     Vec<BatchScores>,
        calls:      usize,
        batch_lens: Vec<usize>,
    }

    impl ScriptedTrainer {
        fn constant(loss: f64, error: f64) -> Self {
            Self { scores: vec![BatchScores::new(loss, error)], calls: 0, batch_lens: vec![] }
        }
    }

    impl MinibatchTrainer for ScriptedTrainer {
        fn train_minibatch(&mut self, batch: Minibatch) -> Result<BatchScores> {
            self.batch_lens.push(batch.len());
            let s = self.scores[self.calls.min(self.scores.len() - 1)];
            self.calls += 1;
            Ok(s)
        }
    }

    fn pool(n: usize) -> Partition {
        let labels: Vec<u8> = (0..n).map(|i| (i % 10) as u8).collect();
        let onehot = OneHotEncoder::digits().encode(&labels).unwrap();
        Partition::new(ImageShape::new(1, 1, 1), vec![0; n], onehot).unwrap()
    }

    #[test]
    fn test_mnist_iteration_count() {
        let s = TrainingSchedule::from_epochs(60_000, 10, 64, 500).unwrap();
        assert_eq!(s.total_iterations, 9375);
    }

    #[test]
    fn test_iteration_count_truncates() {
        let s = TrainingSchedule::from_epochs(100, 1, 64, 10).unwrap();
        assert_eq!(s.total_iterations, 1);
    }

    #[test]
    fn test_schedule_rejects_zero_values() {
        assert!(TrainingSchedule::from_epochs(100, 1, 0, 10).is_err());
        assert!(TrainingSchedule::from_epochs(100, 1, 10, 0).is_err());
        assert!(matches!(
            TrainingSchedule::from_epochs(10, 1, 64, 10),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_logs_every_interval_including_zero() {
        let p = pool(100);
        let mut sampler = BatchSampler::new(&p, 0);
        let schedule = TrainingSchedule { total_iterations: 1001, batch_size: 8, log_every: 500 };
        let mut session = TrainingSession::new(ScriptedTrainer::constant(0.5, 0.25), schedule);

        session.run(&mut sampler).unwrap();

        let iters: Vec<usize> = session.metrics().records().iter().map(|r| r.iteration).collect();
        assert_eq!(iters, vec![0, 500, 1000]);
        assert_eq!(session.trainer().calls, 1001);
        assert_eq!(session.phase(), TrainingPhase::Done);
    }

    #[test]
    fn test_every_batch_has_batch_size() {
        let p = pool(50);
        let mut sampler = BatchSampler::new(&p, 1);
        let schedule = TrainingSchedule { total_iterations: 20, batch_size: 16, log_every: 5 };
        let mut session = TrainingSession::new(ScriptedTrainer::constant(1.0, 0.5), schedule);
        session.run(&mut sampler).unwrap();

        let (trainer, log) = session.into_parts();
        assert!(trainer.batch_lens.iter().all(|&n| n == 16));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_zero_scores_are_not_recorded() {
        let p = pool(20);
        let mut sampler = BatchSampler::new(&p, 2);
        let schedule = TrainingSchedule { total_iterations: 10, batch_size: 4, log_every: 1 };
        let mut session = TrainingSession::new(ScriptedTrainer::constant(0.0, 0.0), schedule);
        session.run(&mut sampler).unwrap();
        assert!(session.metrics().is_empty());
    }

    #[test]
    fn test_status_line_printed_even_when_not_recorded() {
        let schedule = TrainingSchedule { total_iterations: 3, batch_size: 4, log_every: 1 };
        let mut session = TrainingSession::new(ScriptedTrainer::constant(0.0, 0.0), schedule);

        let line = session.log_progress(0, BatchScores::new(0.0, 0.0));
        assert_eq!(line, "Minibatch: 0, Loss: 0.000, Error: 0.00%");
        assert!(session.metrics().is_empty());

        let line = session.log_progress(500, BatchScores::new(0.25, 0.125));
        assert_eq!(line, "Minibatch: 500, Loss: 0.250, Error: 12.50%");
        assert_eq!(session.metrics().len(), 1);
    }

    #[test]
    fn test_nan_loss_halts_training() {
        let p = pool(20);
        let mut sampler = BatchSampler::new(&p, 3);
        let trainer = ScriptedTrainer {
            scores:     vec![BatchScores::new(0.7, 0.1), BatchScores::new(0.6, 0.1), BatchScores::new(f64::NAN, 0.1)],
            calls:      0,
            batch_lens: vec![],
        };
        let schedule = TrainingSchedule { total_iterations: 50, batch_size: 4, log_every: 1 };
        let mut session = TrainingSession::new(trainer, schedule);

        let err = session.run(&mut sampler).unwrap_err();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::NumericalDivergence { iteration, .. }) => assert_eq!(*iteration, 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.trainer().calls, 3);
        assert_eq!(session.metrics().len(), 2);
    }

    #[test]
    fn test_batch_larger_than_pool_fails() {
        let p = pool(10);
        let mut sampler = BatchSampler::new(&p, 4);
        let schedule = TrainingSchedule { total_iterations: 1, batch_size: 11, log_every: 1 };
        let mut session = TrainingSession::new(ScriptedTrainer::constant(1.0, 1.0), schedule);
        assert!(session.run(&mut sampler).is_err());
    }

    #[test]
    fn test_session_runs_once() {
        let p = pool(10);
        let mut sampler = BatchSampler::new(&p, 5);
        let schedule = TrainingSchedule { total_iterations: 2, batch_size: 2, log_every: 1 };
        let mut session = TrainingSession::new(ScriptedTrainer::constant(1.0, 1.0), schedule);
        session.run(&mut sampler).unwrap();
        assert!(session.run(&mut sampler).is_err());
    }
}
