// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types and traits describing images, labels,
// metrics and the seams to external collaborators.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only structs, enums and traits

// Error taxonomy shared by every layer
pub mod error;

// Image shapes, labeled collections, samples and minibatches
pub mod image;

// Per-step scores and the append-only metrics log
pub mod metrics;

// Traits that other layers implement
pub mod traits;
