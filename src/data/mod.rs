// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the raw labeled collection to tensor batches:
//
//   DatasetSource     → LabeledImages (all samples, u8 pixels)
//       │
//       ▼
//   split_sequential  → train rows | test rows
//       │
//       ▼
//   OneHotEncoder     → fixed-column one-hot label matrices
//       │
//       ▼
//   Partition         → implements burn's Dataset trait
//       │
//       ▼
//   BatchSampler      → random (or sequential) minibatches
//       │
//       ▼
//   DigitBatcher      → burn tensors for the model

/// burn-backed and in-memory dataset sources
pub mod source;

/// Sequential train/test split
pub mod splitter;

/// One-hot encoding over a fixed class list
pub mod encoder;

/// Partition type implementing burn's Dataset trait
pub mod dataset;

/// Source → validated (train, test) partitions
pub mod loader;

/// Uniform without-replacement minibatch draws
pub mod sampler;

/// Implements burn's Batcher trait to build tensor batches
pub mod batcher;
