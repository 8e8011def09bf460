use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{linear, Dropout, Linear, Module, VarBuilder};

pub const HIDDEN_UNITS: usize = 128;
pub const NUM_CLASSES: usize = 2;
const DROPOUT_P: f32 = 0.3;

/// Two-layer fusion head over the concatenated title/content vectors.
///
/// Weight names follow the fine-tuned checkpoint's sequential layout:
/// `classifier.0` is the `Linear(2H, 128)` projection and `classifier.3`
/// the `Linear(128, 2)` output layer, with ReLU and dropout in between.
pub struct FusionHead {
    dense: Linear,
    output: Linear,
    dropout: Dropout,
}

impl FusionHead {
    pub fn load(vb: VarBuilder, hidden_size: usize) -> Result<Self> {
        let dense = linear(hidden_size * 2, HIDDEN_UNITS, vb.pp("0"))?;
        let output = linear(HIDDEN_UNITS, NUM_CLASSES, vb.pp("3"))?;
        Ok(Self { dense, output, dropout: Dropout::new(DROPOUT_P) })
    }

    /// Logits `[1,2]` for one article. Dropout stays disabled outside
    /// training, matching the checkpoint's eval-mode behavior.
    pub fn forward(&self, title: &Tensor, content: &Tensor) -> Result<Tensor> {
        let combined = Tensor::cat(&[title, content], 1)?;
        let hidden = self.dense.forward(&combined)?.relu()?;
        let hidden = self.dropout.forward(&hidden, false)?;
        Ok(self.output.forward(&hidden)?)
    }
}

/// Index of the largest probability; ties resolve to the lowest index.
pub fn argmax(probabilities: &[f32]) -> usize {
    let mut best = 0;
    for (i, p) in probabilities.iter().enumerate().skip(1) {
        if *p > probabilities[best] {
            best = i;
        }
    }
    best
}
