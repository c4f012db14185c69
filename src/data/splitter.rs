// ============================================================
// Layer 4 - Train/Test Splitter
// ============================================================
// Splits a labeled collection into two by index:
//   - Training set: rows [0, train_count)
//   - Test set:     rows [train_count, total)
//
// No shuffling: MNIST ships with the 60,000 training digits
// first and the 10,000 test digits after them, so a sequential
// cut reproduces the official split and keeps both sides
// disjoint by construction.

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::image::LabeledImages;

/// Cut `images` at `train_count`.
///
/// Fails with `InsufficientSamples` when nothing would be left
/// for the test side; the split is never silently truncated.
pub fn split_sequential(
    mut images:  LabeledImages,
    train_count: usize,
) -> PipelineResult<(LabeledImages, LabeledImages)> {
    let total = images.len();
    if total <= train_count {
        return Err(PipelineError::InsufficientSamples { available: total, train: train_count });
    }

    let volume      = images.shape.volume();
    let test_pixels = images.pixels.split_off(train_count * volume);
    let test_labels = images.labels.split_off(train_count);

    let test = LabeledImages {
        shape:  images.shape,
        pixels: test_pixels,
        labels: test_labels,
    };

    tracing::debug!(
        "Dataset split: {} training, {} test",
        images.len(),
        test.len(),
    );

    Ok((images, test))
}
