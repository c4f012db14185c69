// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: each use case calls the data, ml
// and infra layers in order and does no work of its own.

// Load, train, evaluate, save, report
pub mod train_use_case;

// Reload a checkpoint and rerun the evaluation loop
pub mod evaluate_use_case;
