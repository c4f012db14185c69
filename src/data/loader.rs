// ============================================================
// Layer 4 - Dataset Loader
// ============================================================
// Produces the train and test partitions:
//
//   DatasetSource.load_all()     → LabeledImages (all samples)
//       │
//       ▼
//   shape check                  → every image must match the
//       │                          requested (C, H, W)
//       ▼
//   split_sequential()           → first N rows train, rest test
//       │
//       ▼
//   OneHotEncoder.encode()       → same fixed class list for both
//       │
//       ▼
//   (Partition, Partition)
//
// Every inconsistency is reported here, before training starts.

use anyhow::{Context, Result};

use crate::data::dataset::Partition;
use crate::data::encoder::OneHotEncoder;
use crate::data::splitter::split_sequential;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::image::{ImageShape, LabeledImages};
use crate::domain::traits::DatasetSource;

/// Loads a source and splits it into (train, test) partitions.
pub struct DatasetLoader {
    /// Shape every image must have
    shape: ImageShape,

    /// Rows [0, num_training_samples) become the training partition
    num_training_samples: usize,

    /// Shared by both partitions
    encoder: OneHotEncoder,
}

impl DatasetLoader {
    pub fn new(shape: ImageShape, num_training_samples: usize) -> Self {
        Self {
            shape,
            num_training_samples,
            encoder: OneHotEncoder::digits(),
        }
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    /// Fetch from `source` and build both partitions.
    pub fn load(&self, source: &dyn DatasetSource) -> Result<(Partition, Partition)> {
        tracing::info!("Loading dataset from {}", source.describe());
        let images = source
            .load_all()
            .with_context(|| format!("Cannot load dataset from {}", source.describe()))?;

        let (train, test) = self.partition(images)?;
        tracing::info!(
            "Partitions ready: {} train, {} test, {} classes",
            train.sample_count(),
            test.sample_count(),
            train.num_classes(),
        );
        Ok((train, test))
    }

    /// Validate, split and encode an already loaded collection.
    pub fn partition(&self, images: LabeledImages) -> PipelineResult<(Partition, Partition)> {
        if images.shape != self.shape {
            return Err(PipelineError::ShapeMismatch(format!(
                "source images are {:?}, expected {:?}",
                images.shape.dims(),
                self.shape.dims()
            )));
        }

        let (train, test) = split_sequential(images, self.num_training_samples)?;
        Ok((self.encode(train)?, self.encode(test)?))
    }

    fn encode(&self, images: LabeledImages) -> PipelineResult<Partition> {
        let labels = self.encoder.encode(&images.labels)?;
        Partition::new(images.shape, images.pixels, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::InMemorySource;
    use burn::data::dataset::Dataset;

    fn collection(n: usize) -> LabeledImages {
        let shape  = ImageShape::new(1, 2, 2);
        let pixels = (0..n).flat_map(|i| vec![i as u8; 4]).collect();
        let labels = (0..n).map(|i| (i % 10) as u8).collect();
        LabeledImages::new(shape, pixels, labels).unwrap()
    }

    #[test]
    fn test_sizes_sum_to_total() {
        let loader = DatasetLoader::new(ImageShape::new(1, 2, 2), 30);
        let (train, test) = loader.load(&InMemorySource::new(collection(42))).unwrap();
        assert_eq!(train.len(), 30);
        assert_eq!(test.len(), 12);
        assert_eq!(train.len() + test.len(), 42);
    }

    #[test]
    fn test_partitions_are_disjoint() {
        let loader = DatasetLoader::new(ImageShape::new(1, 2, 2), 30);
        let (train, test) = loader.partition(collection(42)).unwrap();
        let train_ids: Vec<u8> = (0..train.len()).map(|i| train.image(i).unwrap()[0]).collect();
        let test_ids:  Vec<u8> = (0..test.len()).map(|i| test.image(i).unwrap()[0]).collect();
        assert!(train_ids.iter().all(|id| !test_ids.contains(id)));
    }

    #[test]
    fn test_both_partitions_share_columns() {
        // The 5-sample test side only holds digits 5..=9,
        // yet it must still have all ten columns.
        let loader = DatasetLoader::new(ImageShape::new(1, 2, 2), 15);
        let (train, test) = loader.partition(collection(20)).unwrap();
        assert_eq!(train.num_classes(), 10);
        assert_eq!(test.num_classes(), 10);
        assert_eq!(loader.encoder().num_classes(), train.num_classes());
        assert_eq!(test.labels().hot_column(0), Some(5));
    }

    #[test]
    fn test_labels_round_trip_in_both_partitions() {
        let loader = DatasetLoader::new(ImageShape::new(1, 2, 2), 25);
        let (train, test) = loader.partition(collection(40)).unwrap();
        let decoded_train = loader.encoder().decode(train.labels()).unwrap();
        let decoded_test  = loader.encoder().decode(test.labels()).unwrap();
        let expected: Vec<u8> = (0..40).map(|i| (i % 10) as u8).collect();
        assert_eq!(decoded_train, expected[..25].to_vec());
        assert_eq!(decoded_test, expected[25..].to_vec());
    }

    #[test]
    fn test_rejects_too_few_samples() {
        let loader = DatasetLoader::new(ImageShape::new(1, 2, 2), 60_000);
        let err    = loader.partition(collection(50)).unwrap_err();
        assert_eq!(err, PipelineError::InsufficientSamples { available: 50, train: 60_000 });
    }

    #[test]
    fn test_rejects_wrong_image_shape() {
        let loader = DatasetLoader::new(ImageShape::MNIST, 10);
        let err    = loader.partition(collection(20)).unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_unavailable_source_is_an_error() {
        struct Offline;
        impl DatasetSource for Offline {
            fn load_all(&self) -> PipelineResult<LabeledImages> {
                Err(PipelineError::DatasetUnavailable("no network".into()))
            }
            fn describe(&self) -> String {
                "offline".into()
            }
        }

        let loader = DatasetLoader::new(ImageShape::MNIST, 10);
        let err    = loader.load(&Offline).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::DatasetUnavailable(_))
        ));
    }
}
