use serde::{Deserialize, Serialize};

/// One day's feature row for price prediction.
///
/// 4 fields in fixed order: maximum temperature, minimum temperature,
/// rainfall, price. The order is an invariant shared by the scaler, the
/// model, and the window buffer; [`FeatureVector::to_array`] is the single
/// place it is written down.
///
/// The same struct carries both raw and normalized values — which space a
/// row lives in is determined by where it came from
/// ([`FeatureScaler::transform`](crate::traits::FeatureScaler) produces
/// normalized rows, history files produce raw ones), never by the type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Maximum temperature for the day, °C.
    pub max_temp: f64,
    /// Minimum temperature for the day, °C.
    pub min_temp: f64,
    /// Rainfall for the day, mm.
    pub rainfall: f64,
    /// Market price for the day.
    pub price: f64,
}

impl FeatureVector {
    pub const NUM_FIELDS: usize = 4;

    /// Index of the price field in [`FeatureVector::to_array`] order.
    pub const PRICE_IDX: usize = 3;

    /// Convert to a fixed-size array in the canonical field order.
    pub fn to_array(&self) -> [f64; Self::NUM_FIELDS] {
        [self.max_temp, self.min_temp, self.rainfall, self.price]
    }

    /// Rebuild a row from an array in the canonical field order.
    pub fn from_array(values: [f64; Self::NUM_FIELDS]) -> Self {
        Self {
            max_temp: values[0],
            min_temp: values[1],
            rainfall: values[2],
            price: values[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_order() {
        let row = FeatureVector {
            max_temp: 31.0,
            min_temp: 18.5,
            rainfall: 4.2,
            price: 41250.0,
        };
        assert_eq!(row.to_array(), [31.0, 18.5, 4.2, 41250.0]);
    }

    #[test]
    fn test_price_idx_matches_array_order() {
        let row = FeatureVector {
            max_temp: 0.0,
            min_temp: 0.0,
            rainfall: 0.0,
            price: 99.0,
        };
        assert_eq!(row.to_array()[FeatureVector::PRICE_IDX], 99.0);
    }

    #[test]
    fn test_array_roundtrip() {
        let row = FeatureVector {
            max_temp: 29.3,
            min_temp: 17.1,
            rainfall: 0.0,
            price: 38900.0,
        };
        assert_eq!(FeatureVector::from_array(row.to_array()), row);
    }
}
