// ============================================================
// Layer 3 - Image Domain Types
// ============================================================
// Plain containers for digit images and their labels.
//
//   ImageShape     → (channels, height, width) of every image
//   LabeledImages  → the raw collection a DatasetSource returns
//   DigitSample    → one image plus its one-hot label row
//   Minibatch      → the samples handed to one train/test step
//
// Pixels stay as 8-bit intensities here; the batcher promotes
// them to f32 only when a tensor is built.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

/// Channel-first image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageShape {
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
}

impl ImageShape {
    /// MNIST: one gray channel, 28 x 28 pixels
    pub const MNIST: ImageShape = ImageShape { channels: 1, height: 28, width: 28 };

    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self { channels, height, width }
    }

    /// Number of values in one image.
    pub fn volume(&self) -> usize {
        self.channels * self.height * self.width
    }

    pub fn dims(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }
}

impl Default for ImageShape {
    fn default() -> Self {
        Self::MNIST
    }
}

/// A labeled image collection, flat and row-major:
/// image `i` occupies `pixels[i * volume .. (i + 1) * volume]`.
#[derive(Debug, Clone)]
pub struct LabeledImages {
    pub shape:  ImageShape,
    pub pixels: Vec<u8>,
    pub labels: Vec<u8>,
}

impl LabeledImages {
    /// Build a collection, rejecting pixel/label counts that disagree.
    pub fn new(shape: ImageShape, pixels: Vec<u8>, labels: Vec<u8>) -> PipelineResult<Self> {
        let volume = shape.volume();
        if volume == 0 {
            return Err(PipelineError::ShapeMismatch(format!(
                "image shape {:?} has no pixels",
                shape.dims()
            )));
        }
        if pixels.len() % volume != 0 {
            return Err(PipelineError::ShapeMismatch(format!(
                "{} pixels is not a whole number of {}-pixel images",
                pixels.len(),
                volume
            )));
        }
        let count = pixels.len() / volume;
        if count != labels.len() {
            return Err(PipelineError::ShapeMismatch(format!(
                "{} images but {} labels",
                count,
                labels.len()
            )));
        }
        Ok(Self { shape, pixels, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One image with its one-hot label row.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitSample {
    pub pixels: Vec<u8>,
    pub label:  Vec<f32>,
}

impl DigitSample {
    /// Index of the hot column.
    pub fn class_index(&self) -> usize {
        self.label
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }
}

/// The samples for one step. Built fresh on every sampling call.
#[derive(Debug, Clone)]
pub struct Minibatch {
    pub shape:   ImageShape,
    pub samples: Vec<DigitSample>,
}

impl Minibatch {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<DigitSample> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnist_volume() {
        assert_eq!(ImageShape::MNIST.volume(), 784);
    }

    #[test]
    fn test_rejects_label_count_mismatch() {
        let shape = ImageShape::new(1, 2, 2);
        let err = LabeledImages::new(shape, vec![0; 12], vec![1, 2]).unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_rejects_partial_image() {
        let shape = ImageShape::new(1, 2, 2);
        let err = LabeledImages::new(shape, vec![0; 7], vec![1, 2]).unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_accepts_consistent_collection() {
        let shape  = ImageShape::new(1, 2, 2);
        let images = LabeledImages::new(shape, vec![0; 8], vec![3, 4]).unwrap();
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_class_index_finds_hot_column() {
        let sample = DigitSample { pixels: vec![], label: vec![0.0, 0.0, 1.0, 0.0] };
        assert_eq!(sample.class_index(), 2);
    }
}
