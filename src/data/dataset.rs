use burn::data::dataset::Dataset;

use crate::data::encoder::OneHotMatrix;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::image::{DigitSample, ImageShape};

/// One side of the train/test split: images plus their one-hot labels.
/// Built once by the loader and only read afterwards.
#[derive(Debug, Clone)]
pub struct Partition {
    shape:  ImageShape,
    pixels: Vec<u8>,
    labels: OneHotMatrix,
}

impl Partition {
    pub fn new(shape: ImageShape, pixels: Vec<u8>, labels: OneHotMatrix) -> PipelineResult<Self> {
        let volume = shape.volume();
        if volume == 0 || pixels.len() != labels.rows() * volume {
            return Err(PipelineError::ShapeMismatch(format!(
                "{} pixels cannot hold {} images of {:?}",
                pixels.len(),
                labels.rows(),
                shape.dims()
            )));
        }
        Ok(Self { shape, pixels, labels })
    }

    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    pub fn sample_count(&self) -> usize {
        self.labels.rows()
    }

    pub fn num_classes(&self) -> usize {
        self.labels.cols()
    }

    pub fn labels(&self) -> &OneHotMatrix {
        &self.labels
    }

    pub fn image(&self, index: usize) -> Option<&[u8]> {
        let volume = self.shape.volume();
        (index < self.sample_count()).then(|| &self.pixels[index * volume..(index + 1) * volume])
    }

    pub fn sample(&self, index: usize) -> Option<DigitSample> {
        let pixels = self.image(index)?.to_vec();
        let label  = self.labels.row(index)?.to_vec();
        Some(DigitSample { pixels, label })
    }
}

impl Dataset<DigitSample> for Partition {
    fn get(&self, index: usize) -> Option<DigitSample> {
        self.sample(index)
    }

    fn len(&self) -> usize {
        self.sample_count()
    }
}
