use anyhow::Result;

use cropcast_core::traits::FeatureScaler;
use cropcast_core::types::FeatureVector;

/// Fields with a range below this are treated as constant and divided by 1
/// instead, so constant columns transform to 0 and invert back to their
/// minimum.
const DEGENERATE_RANGE: f64 = 1e-12;

/// Per-field min-max normalization statistics fitted on training data.
///
/// Loaded from a JSON sidecar file alongside the model weights. Ensures
/// inference uses the exact same normalization the model was trained with.
/// `transform` maps each field into [0, 1] over its training range;
/// `inverse_transform` is the exact affine inverse.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl MinMaxScaler {
    /// Load scaler stats from a JSON file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let scaler: MinMaxScaler = serde_json::from_str(&data)?;
        anyhow::ensure!(
            scaler.data_min.len() == FeatureVector::NUM_FIELDS,
            "scaler data_min has {} elements, expected {}",
            scaler.data_min.len(),
            FeatureVector::NUM_FIELDS
        );
        anyhow::ensure!(
            scaler.data_max.len() == FeatureVector::NUM_FIELDS,
            "scaler data_max has {} elements, expected {}",
            scaler.data_max.len(),
            FeatureVector::NUM_FIELDS
        );
        Ok(scaler)
    }

    /// Save scaler stats to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Fit stats over a set of raw rows.
    pub fn fit(rows: &[FeatureVector]) -> Result<Self> {
        anyhow::ensure!(!rows.is_empty(), "cannot fit a scaler on zero rows");
        let mut data_min = vec![f64::INFINITY; FeatureVector::NUM_FIELDS];
        let mut data_max = vec![f64::NEG_INFINITY; FeatureVector::NUM_FIELDS];
        for row in rows {
            for (i, v) in row.to_array().into_iter().enumerate() {
                data_min[i] = data_min[i].min(v);
                data_max[i] = data_max[i].max(v);
            }
        }
        Ok(Self { data_min, data_max })
    }

    /// Per-field scale denominator, with constant fields pinned to 1.
    fn range(&self, i: usize) -> f64 {
        let range = self.data_max[i] - self.data_min[i];
        if range.abs() > DEGENERATE_RANGE {
            range
        } else {
            1.0
        }
    }
}

impl FeatureScaler for MinMaxScaler {
    fn transform(&self, rows: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
        Ok(rows
            .iter()
            .map(|row| {
                let mut out = row.to_array();
                for (i, v) in out.iter_mut().enumerate() {
                    *v = (*v - self.data_min[i]) / self.range(i);
                }
                FeatureVector::from_array(out)
            })
            .collect())
    }

    fn inverse_transform(&self, rows: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
        Ok(rows
            .iter()
            .map(|row| {
                let mut out = row.to_array();
                for (i, v) in out.iter_mut().enumerate() {
                    *v = *v * self.range(i) + self.data_min[i];
                }
                FeatureVector::from_array(out)
            })
            .collect())
    }
}
