// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands off to Layer 2.
//
//   train    → load MNIST, train, evaluate, plot, summarize
//   evaluate → reload a saved checkpoint and re-score it

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, TrainArgs};

use crate::application::{evaluate_use_case::EvaluateUseCase, train_use_case::TrainUseCase};

#[derive(Parser, Debug)]
#[command(
    name = "mnist-convnet",
    version,
    about = "Train a small convolutional network on MNIST and report its test error."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Only routes; the use cases do the work.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!(
        "Starting training: {} samples, batch {}, {} epochs",
        args.num_training_samples,
        args.batch_size,
        args.epochs,
    );
    TrainUseCase::new(args.into()).execute()?;
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let use_case = EvaluateUseCase::new(
        args.checkpoint_dir,
        args.eval_sampling.map(Into::into),
        !args.no_plot,
    );
    use_case.execute()?;
    Ok(())
}
