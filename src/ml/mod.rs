// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// The model, the step engines and the two loops that drive them.
// Only model.rs and engine.rs touch burn tensors; trainer.rs and
// evaluator.rs talk to the engines through the domain traits.
//
//   model.rs     → ConvNet: two strided convolutions + classifier,
//                  plus the loss and error functions
//   engine.rs    → BurnTrainer (forward, backward, SGD step) and
//                  BurnEvaluator (forward only)
//   trainer.rs   → TrainingSession: fixed-iteration loop with
//                  periodic logging and divergence check
//   evaluator.rs → batch-wise test error over the test partition

/// Convolutional digit classifier
pub mod model;

/// burn implementations of MinibatchTrainer / MinibatchEvaluator
pub mod engine;

/// Fixed-iteration training loop
pub mod trainer;

/// Average test error over full test batches
pub mod evaluator;

/// Backend used for evaluation and as the autodiff inner backend.
#[cfg(not(feature = "wgpu"))]
pub type InferenceBackend = burn::backend::NdArray;
#[cfg(feature = "wgpu")]
pub type InferenceBackend = burn::backend::Wgpu;

/// Backend used while training.
pub type TrainingBackend = burn::backend::Autodiff<InferenceBackend>;
