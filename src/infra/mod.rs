// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Output side of a run:
//
//   plot.rs       → Plotter implementations (textplots / no-op)
//   report.rs     → loss and error charts + test summary line
//   metrics.rs    → Metrics Log to and from metrics.csv
//   checkpoint.rs → model weights and configs via CompactRecorder

/// Terminal line charts
pub mod plot;

/// Post-training charts and summary
pub mod report;

/// Training metrics CSV
pub mod metrics;

/// Model checkpoint saving and loading
pub mod checkpoint;
