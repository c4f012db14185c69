use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Initializer, Linear, LinearConfig, PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::{log_softmax, relu},
};

use crate::domain::image::ImageShape;

/// Raw pixels arrive as 0..255 intensities.
const PIXEL_SCALE: f64 = 255.0;

/// Two strided convolutions followed by a dense classifier.
///
///   [N, 1, 28, 28] / 255
///     → conv 3x3, 16 filters, stride 2, ReLU  → [N, 16, 14, 14]
///     → conv 5x5, 64 filters, stride 2, ReLU  → [N, 64, 7, 7]
///     → flatten                               → [N, 3136]
///     → linear                                → [N, 10] logits
#[derive(Config, Debug)]
pub struct ConvNetConfig {
    #[config(default = 1)]
    pub channels: usize,
    #[config(default = 28)]
    pub height: usize,
    #[config(default = 28)]
    pub width: usize,
    #[config(default = 16)]
    pub conv_a_filters: usize,
    #[config(default = 3)]
    pub conv_a_kernel: usize,
    #[config(default = 64)]
    pub conv_b_filters: usize,
    #[config(default = 5)]
    pub conv_b_kernel: usize,
    #[config(default = 2)]
    pub stride: usize,
    #[config(default = 10)]
    pub num_classes: usize,
}

impl ConvNetConfig {
    /// Default architecture for images of the given shape.
    pub fn for_shape(shape: ImageShape, num_classes: usize) -> Self {
        Self::new()
            .with_channels(shape.channels)
            .with_height(shape.height)
            .with_width(shape.width)
            .with_num_classes(num_classes)
    }

    /// Spatial size after both convolutions, as (height, width).
    pub fn feature_map(&self) -> (usize, usize) {
        let h = conv_output_size(self.height, self.conv_a_kernel, self.stride);
        let w = conv_output_size(self.width, self.conv_a_kernel, self.stride);
        (
            conv_output_size(h, self.conv_b_kernel, self.stride),
            conv_output_size(w, self.conv_b_kernel, self.stride),
        )
    }

    /// Inputs to the dense classifier.
    pub fn flattened_features(&self) -> usize {
        let (h, w) = self.feature_map();
        self.conv_b_filters * h * w
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> ConvNet<B> {
        let glorot = Initializer::XavierUniform { gain: 1.0 };

        let conv_a = conv_layer(
            self.channels,
            self.conv_a_filters,
            self.conv_a_kernel,
            self.stride,
            &glorot,
        )
        .init(device);
        let conv_b = conv_layer(
            self.conv_a_filters,
            self.conv_b_filters,
            self.conv_b_kernel,
            self.stride,
            &glorot,
        )
        .init(device);
        let classifier = LinearConfig::new(self.flattened_features(), self.num_classes)
            .with_initializer(glorot)
            .init(device);

        ConvNet { conv_a, conv_b, classifier }
    }
}

/// Padding of kernel/2 on each side, so an even-sized input is halved by stride 2.
fn conv_layer(
    channels_in: usize,
    channels_out: usize,
    kernel: usize,
    stride: usize,
    init: &Initializer,
) -> Conv2dConfig {
    let pad = kernel / 2;
    Conv2dConfig::new([channels_in, channels_out], [kernel, kernel])
        .with_stride([stride, stride])
        .with_padding(PaddingConfig2d::Explicit(pad, pad))
        .with_initializer(init.clone())
}

fn conv_output_size(input: usize, kernel: usize, stride: usize) -> usize {
    let pad = kernel / 2;
    (input + 2 * pad - kernel) / stride + 1
}

#[derive(Module, Debug)]
pub struct ConvNet<B: Backend> {
    pub conv_a:     Conv2d<B>,
    pub conv_b:     Conv2d<B>,
    pub classifier: Linear<B>,
}

impl<B: Backend> ConvNet<B> {
    /// images: [batch, channels, height, width] raw intensities → logits [batch, classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = images.div_scalar(PIXEL_SCALE);
        let x = relu(self.conv_a.forward(x));
        let x = relu(self.conv_b.forward(x));
        let x = x.flatten::<2>(1, 3);
        self.classifier.forward(x)
    }
}

/// Mean softmax cross-entropy against one-hot targets. Shape [1].
pub fn cross_entropy_with_softmax<B: Backend>(
    logits:  Tensor<B, 2>,
    targets: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let log_probs = log_softmax(logits, 1);
    (log_probs * targets).sum_dim(1).neg().mean()
}

/// Fraction of rows whose arg-max disagrees with the hot target column.
pub fn classification_error<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> f64 {
    let [rows, _] = logits.dims();
    if rows == 0 {
        return 0.0;
    }
    let correct = logits
        .argmax(1)
        .equal(targets.argmax(1))
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    1.0 - correct as f64 / rows as f64
}
