// ============================================================
// Layer 5 - Burn Step Engines
// ============================================================
// The burn-backed implementations of the two step seams:
//
//   BurnTrainer   (AutodiffBackend)
//     batch → forward → loss + error → backward → SGD step
//
//   BurnEvaluator (plain Backend, no gradient tape)
//     batch → forward → error
//
// model.valid() turns the trained ConvNet<Autodiff<B>> into a
// ConvNet<B>, which is what the evaluator runs on.

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::batcher::DigitBatcher;
use crate::domain::image::{ImageShape, Minibatch};
use crate::domain::metrics::BatchScores;
use crate::domain::traits::{MinibatchEvaluator, MinibatchTrainer};
use crate::ml::model::{classification_error, cross_entropy_with_softmax, ConvNet};

pub struct BurnTrainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<ConvNet<B>, B>,
{
    model:         ConvNet<B>,
    optim:         O,
    batcher:       DigitBatcher<B>,
    device:        B::Device,
    shape:         ImageShape,
    learning_rate: f64,
}

impl<B, O> BurnTrainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<ConvNet<B>, B>,
{
    pub fn new(
        model:         ConvNet<B>,
        optim:         O,
        device:        B::Device,
        shape:         ImageShape,
        learning_rate: f64,
    ) -> Self {
        let batcher = DigitBatcher::new(device.clone(), shape);
        Self { model, optim, batcher, device, shape, learning_rate }
    }

    pub fn model(&self) -> &ConvNet<B> {
        &self.model
    }

    /// Gradient-free copy of the current parameters, ready for testing.
    pub fn evaluator(&self) -> BurnEvaluator<B::InnerBackend> {
        BurnEvaluator::new(self.model.valid(), self.device.clone(), self.shape)
    }
}

impl<B, O> MinibatchTrainer for BurnTrainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<ConvNet<B>, B>,
{
    fn train_minibatch(&mut self, batch: Minibatch) -> Result<BatchScores> {
        let batch  = self.batcher.batch(batch.into_samples());
        let logits = self.model.forward(batch.images);

        let error = classification_error(logits.clone(), batch.targets.clone());
        let loss  = cross_entropy_with_softmax(logits, batch.targets);
        let loss_value: f64 = loss.clone().into_scalar().elem::<f64>();

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self.optim.step(self.learning_rate, self.model.clone(), grads);

        Ok(BatchScores::new(loss_value, error))
    }
}

pub struct BurnEvaluator<B: Backend> {
    model:   ConvNet<B>,
    batcher: DigitBatcher<B>,
}

impl<B: Backend> BurnEvaluator<B> {
    pub fn new(model: ConvNet<B>, device: B::Device, shape: ImageShape) -> Self {
        Self { model, batcher: DigitBatcher::new(device, shape) }
    }
}

impl<B: Backend> MinibatchEvaluator for BurnEvaluator<B> {
    fn test_minibatch(&self, batch: Minibatch) -> Result<f64> {
        let batch  = self.batcher.batch(batch.into_samples());
        let logits = self.model.forward(batch.images);
        Ok(classification_error(logits, batch.targets))
    }
}
