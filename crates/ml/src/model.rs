//! Candle recurrent network for next-day price prediction.
//!
//! Architecture: a single LSTM layer (4 features → 64 hidden) unrolled over
//! the input window, followed by a linear head producing one normalized
//! price per window. Weights are trained offline and loaded from a
//! safetensors file; this module only runs the forward pass.

use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

use cropcast_core::traits::SequenceModel;
use cropcast_core::types::FeatureVector;

/// LSTM price predictor over normalized feature windows.
///
/// The four gates are computed from two stacked linear maps
/// (`input → 4·hidden` and `hidden → 4·hidden`), sliced per gate in
/// input/forget/cell/output order.
pub struct PriceLstm {
    w_ih: Linear, // input → 4·hidden
    w_hh: Linear, // hidden → 4·hidden
    head: Linear, // hidden → 1
    device: Device,
}

impl PriceLstm {
    const IN: usize = FeatureVector::NUM_FIELDS;
    pub const HIDDEN: usize = 64;

    /// Create a model with weights drawn from `vb` (trainable or loaded).
    pub fn new(vb: VarBuilder<'_>) -> Result<Self> {
        let w_ih = linear(Self::IN, 4 * Self::HIDDEN, vb.pp("lstm_ih"))?;
        let w_hh = linear(Self::HIDDEN, 4 * Self::HIDDEN, vb.pp("lstm_hh"))?;
        let head = linear(Self::HIDDEN, 1, vb.pp("head"))?;
        let device = vb.device().clone();
        Ok(Self {
            w_ih,
            w_hh,
            head,
            device,
        })
    }

    /// Load a trained model from a safetensors file.
    pub fn load(path: &std::path::Path, device: &Device) -> Result<Self> {
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)? };
        Self::new(vb)
    }

    /// Forward pass: `(batch, seq_len, 4)` → `(batch, 1)` normalized prices.
    ///
    /// The recurrence runs over `seq_len` steps; the head reads the final
    /// hidden state only.
    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let (batch, seq_len, _features) = x.dims3()?;
        let mut h = Tensor::zeros((batch, Self::HIDDEN), DType::F32, x.device())?;
        let mut c = h.clone();

        for t in 0..seq_len {
            let x_t = x.narrow(1, t, 1)?.squeeze(1)?;
            let gates = (self.w_ih.forward(&x_t)? + self.w_hh.forward(&h)?)?;

            let i = candle_nn::ops::sigmoid(&gates.narrow(1, 0, Self::HIDDEN)?)?;
            let f = candle_nn::ops::sigmoid(&gates.narrow(1, Self::HIDDEN, Self::HIDDEN)?)?;
            let g = gates.narrow(1, 2 * Self::HIDDEN, Self::HIDDEN)?.tanh()?;
            let o = candle_nn::ops::sigmoid(&gates.narrow(1, 3 * Self::HIDDEN, Self::HIDDEN)?)?;

            c = ((&f * &c)? + (&i * &g)?)?;
            let c_act = c.tanh()?;
            h = (&o * &c_act)?;
        }

        Ok(self.head.forward(&h)?)
    }
}

impl SequenceModel for PriceLstm {
    fn predict(&self, windows: &[Vec<FeatureVector>]) -> Result<Vec<f64>> {
        if windows.is_empty() {
            return Ok(Vec::new());
        }
        let seq_len = windows[0].len();
        anyhow::ensure!(seq_len > 0, "cannot predict from an empty window");

        let mut buf = Vec::with_capacity(windows.len() * seq_len * Self::IN);
        for window in windows {
            anyhow::ensure!(
                window.len() == seq_len,
                "ragged window batch: {} vs {}",
                window.len(),
                seq_len
            );
            for row in window {
                for v in row.to_array() {
                    buf.push(v as f32);
                }
            }
        }

        let x = Tensor::from_vec(buf, (windows.len(), seq_len, Self::IN), &self.device)?;
        let out = self.forward(&x)?;
        let flat = out.flatten_all()?.to_vec1::<f32>()?;
        Ok(flat.into_iter().map(f64::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_nn::VarMap;

    fn make_model() -> (PriceLstm, VarMap) {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        (PriceLstm::new(vb).unwrap(), varmap)
    }

    fn window(len: usize, price: f64) -> Vec<FeatureVector> {
        (0..len)
            .map(|i| FeatureVector {
                max_temp: 0.5 + (i as f64 * 0.01).sin() * 0.1,
                min_temp: 0.4,
                rainfall: 0.2,
                price,
            })
            .collect()
    }

    #[test]
    fn test_forward_shape() {
        let (model, _varmap) = make_model();
        let device = Device::Cpu;

        // Single window
        let input = Tensor::zeros((1, 60, 4), DType::F32, &device).unwrap();
        let output = model.forward(&input).unwrap();
        assert_eq!(output.dims(), &[1, 1]);

        // Batch
        let batch = Tensor::zeros((16, 60, 4), DType::F32, &device).unwrap();
        let output = model.forward(&batch).unwrap();
        assert_eq!(output.dims(), &[16, 1]);
    }

    #[test]
    fn test_predict_batch_order_and_count() {
        let (model, _varmap) = make_model();
        let windows = vec![window(60, 0.3), window(60, 0.7)];
        let preds = model.predict(&windows).unwrap();
        assert_eq!(preds.len(), 2);
        for p in &preds {
            assert!(p.is_finite(), "prediction should be finite, got {p}");
        }

        // Each window predicted alone must match its slot in the batch.
        let solo_0 = model.predict(&windows[..1]).unwrap()[0];
        assert!((preds[0] - solo_0).abs() < 1e-5, "{} vs {solo_0}", preds[0]);
    }

    #[test]
    fn test_predict_ragged_batch_fails() {
        let (model, _varmap) = make_model();
        let windows = vec![window(60, 0.3), window(59, 0.3)];
        assert!(model.predict(&windows).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let (model, varmap) = make_model();
        let windows = vec![window(60, 0.5)];
        let pred1 = model.predict(&windows).unwrap()[0];

        let tmp = std::env::temp_dir().join("cropcast_test_model.safetensors");
        varmap.save(&tmp).unwrap();

        let loaded = PriceLstm::load(&tmp, &Device::Cpu).unwrap();
        let pred2 = loaded.predict(&windows).unwrap()[0];

        assert!(
            (pred1 - pred2).abs() < 1e-5,
            "loaded model should give same predictions: {pred1} vs {pred2}"
        );

        std::fs::remove_file(&tmp).ok();
    }
}
