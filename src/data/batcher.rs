// ============================================================
// Layer 4 - Digit Batcher
// ============================================================
// Implements burn's Batcher trait to turn a Vec<DigitSample>
// into tensors on the training device.
//
//   Input:  N samples of C*H*W u8 pixels + one-hot label rows
//   Output: images  [N, C, H, W]  f32, raw 0..255 intensities
//           targets [N, classes]  f32, one-hot
//
// Scaling to [0, 1] is part of the model, not of batching.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::image::{DigitSample, ImageShape};

#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// Shape: [batch_size, channels, height, width]
    pub images: Tensor<B, 4>,

    /// Shape: [batch_size, num_classes]
    pub targets: Tensor<B, 2>,
}

/// Holds the target device so tensors land on the right CPU/GPU.
#[derive(Clone, Debug)]
pub struct DigitBatcher<B: Backend> {
    device: B::Device,
    shape:  ImageShape,
}

impl<B: Backend> DigitBatcher<B> {
    pub fn new(device: B::Device, shape: ImageShape) -> Self {
        Self { device, shape }
    }
}

impl<B: Backend> Batcher<DigitSample, DigitBatch<B>> for DigitBatcher<B> {
    fn batch(&self, items: Vec<DigitSample>) -> DigitBatch<B> {
        let batch_size  = items.len();
        let num_classes = items.first().map_or(0, |s| s.label.len());
        let [c, h, w]   = self.shape.dims();

        // u8 → f32 promotion happens here
        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().map(|&p| p as f32))
            .collect();

        let labels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.label.iter().copied())
            .collect();

        let images = Tensor::<B, 4>::from_floats(
            TensorData::new(pixels, [batch_size, c, h, w]),
            &self.device,
        );
        let targets = Tensor::<B, 2>::from_floats(
            TensorData::new(labels, [batch_size, num_classes]),
            &self.device,
        );

        DigitBatch { images, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let shape = ImageShape::new(1, 2, 3);
        let items = vec![
            DigitSample { pixels: vec![0, 1, 2, 3, 4, 5], label: vec![0.0, 1.0, 0.0] },
            DigitSample { pixels: vec![255; 6],           label: vec![1.0, 0.0, 0.0] },
        ];
        let batcher = DigitBatcher::<NdArray>::new(Default::default(), shape);
        let batch   = batcher.batch(items);

        assert_eq!(batch.images.dims(), [2, 1, 2, 3]);
        assert_eq!(batch.targets.dims(), [2, 3]);
    }

    #[test]
    fn test_pixels_promoted_without_scaling() {
        let shape = ImageShape::new(1, 1, 2);
        let items = vec![DigitSample { pixels: vec![7, 255], label: vec![1.0] }];
        let batch = DigitBatcher::<NdArray>::new(Default::default(), shape).batch(items);

        let values = batch.images.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![7.0, 255.0]);
    }
}
