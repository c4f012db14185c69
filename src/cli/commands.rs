// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `evaluate`, and
// their flags. Defaults reproduce the classic MNIST run:
// 60000 training images, minibatches of 64, 10 epochs at
// learning rate 0.1, status every 500 minibatches.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::domain::image::ImageShape;
use crate::ml::evaluator::EvalSampling;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the ConvNet on MNIST, then report the test error
    Train(TrainArgs),

    /// Re-score a checkpoint written by `train --output-dir`
    Evaluate(EvaluateArgs),
}

/// How test minibatches are drawn.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingArg {
    /// Consecutive, non-overlapping batches
    Sequential,
    /// Independent random draws per batch
    Random,
}

impl From<SamplingArg> for EvalSampling {
    fn from(a: SamplingArg) -> Self {
        match a {
            SamplingArg::Sequential => EvalSampling::Sequential,
            SamplingArg::Random     => EvalSampling::Random,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Leading samples of the dataset used for training; the rest is test data
    #[arg(long, default_value_t = 60_000)]
    pub num_training_samples: usize,

    /// Samples per training minibatch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Nominal passes over the training data (sets the iteration count)
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = 0.1)]
    pub lr: f64,

    /// Print a status line every this many minibatches
    #[arg(long, default_value_t = 500)]
    pub train_log_iter: usize,

    /// Samples per test minibatch
    #[arg(long, default_value_t = 256)]
    pub test_batch_size: usize,

    /// Seed for weight init and minibatch sampling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = SamplingArg::Sequential)]
    pub eval_sampling: SamplingArg,

    /// Write weights, configs and metrics.csv here
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Skip the terminal charts
    #[arg(long)]
    pub no_plot: bool,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            image_shape:          ImageShape::MNIST,
            num_training_samples: a.num_training_samples,
            batch_size:           a.batch_size,
            epochs:               a.epochs,
            learning_rate:        a.lr,
            train_log_iter:       a.train_log_iter,
            test_batch_size:      a.test_batch_size,
            seed:                 a.seed,
            eval_sampling:        a.eval_sampling.into(),
            output_dir:           a.output_dir,
            plot:                 !a.no_plot,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory written by `train --output-dir`
    #[arg(long)]
    pub checkpoint_dir: PathBuf,

    /// Override the sampling strategy saved with the checkpoint
    #[arg(long, value_enum)]
    pub eval_sampling: Option<SamplingArg>,

    /// Skip the terminal charts
    #[arg(long)]
    pub no_plot: bool,
}
