// ============================================================
// Layer 4 - Dataset Sources
// ============================================================
// Implementations of DatasetSource that hand the loader a flat
// LabeledImages collection.
//
//   MnistSource     → burn's MNIST dataset. burn downloads the
//                     IDX files on first use and caches them
//                     under ~/.cache/burn-dataset/mnist.
//   InMemorySource  → a collection that is already in memory.
//
// MnistSource concatenates burn's train and test splits into
// one 70,000 image collection (train first), so the loader can
// apply its own index split.

use std::panic;

use burn::data::dataset::{
    vision::{MnistDataset, MnistItem},
    Dataset,
};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::image::{ImageShape, LabeledImages};
use crate::domain::traits::DatasetSource;

/// MNIST through burn's downloader/cache.
#[derive(Debug, Clone, Default)]
pub struct MnistSource;

impl MnistSource {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetSource for MnistSource {
    fn load_all(&self) -> PipelineResult<LabeledImages> {
        // burn's downloader panics when the network or cache fails;
        // turn that into a regular error before training starts.
        let (train, test) = panic::catch_unwind(|| (MnistDataset::train(), MnistDataset::test()))
            .map_err(|payload| {
                let reason = payload
                    .downcast_ref::<String>()
                    .cloned()
                    .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
                    .unwrap_or_else(|| "MNIST download or cache read failed".to_string());
                PipelineError::DatasetUnavailable(reason)
            })?;

        let total      = train.len() + test.len();
        let shape      = ImageShape::MNIST;
        let mut pixels = Vec::with_capacity(total * shape.volume());
        let mut labels = Vec::with_capacity(total);

        for item in train.iter().chain(test.iter()) {
            push_item(&item, &mut pixels, &mut labels);
        }

        if labels.is_empty() {
            return Err(PipelineError::DatasetUnavailable(
                "MNIST cache is empty".to_string(),
            ));
        }

        tracing::info!(
            "Read {} MNIST images ({} train split, {} test split)",
            total,
            train.len(),
            test.len()
        );
        LabeledImages::new(shape, pixels, labels)
    }

    fn describe(&self) -> String {
        "MNIST (burn dataset cache)".to_string()
    }
}

/// MnistItem stores intensities as f32 in [0, 255]; bring them back to u8.
fn push_item(item: &MnistItem, pixels: &mut Vec<u8>, labels: &mut Vec<u8>) {
    for row in item.image.iter() {
        pixels.extend(row.iter().map(|&p| p.round().clamp(0.0, 255.0) as u8));
    }
    labels.push(item.label);
}

/// A collection that is already loaded.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    images: LabeledImages,
}

impl InMemorySource {
    pub fn new(images: LabeledImages) -> Self {
        Self { images }
    }
}

impl DatasetSource for InMemorySource {
    fn load_all(&self) -> PipelineResult<LabeledImages> {
        Ok(self.images.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory collection of {} images", self.images.len())
    }
}
