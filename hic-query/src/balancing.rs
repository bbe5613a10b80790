use std::fmt;

use ndarray::Array1;

/// Name of a balancing vector stored next to the bin table. `NONE` disables balancing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalization(String);

impl Normalization {
    pub fn new(name: &str) -> Normalization {
        Normalization(name.to_string())
    }

    pub fn none() -> Normalization {
        Normalization::new("NONE")
    }

    pub fn is_none(&self) -> bool {
        self.0 == "NONE"
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::none()
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightType {
    Multiplicative,
    Divisive,
}

impl WeightType {
    /// Used when the vector carries no `divisive_weights` attribute.
    pub fn infer(name: &str) -> WeightType {
        match name {
            "weight" | "ICE" => WeightType::Multiplicative,
            _ => WeightType::Divisive,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Weights {
    values: Array1<f64>,
    kind: WeightType,
}

impl Weights {
    pub fn new(values: Array1<f64>, kind: WeightType) -> Weights {
        Weights { values, kind }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// NaN when either bin is outside the vector or masked.
    pub fn balance(&self, bin1_id: u64, bin2_id: u64, count: f64) -> f64 {
        let (w1, w2) = match (self.values.get(bin1_id as usize), self.values.get(bin2_id as usize)) {
            (Some(&w1), Some(&w2)) => (w1, w2),
            _ => return f64::NAN,
        };
        match self.kind {
            WeightType::Multiplicative => count * w1 * w2,
            WeightType::Divisive => count / (w1 * w2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_weight_type_from_name() {
        assert_eq!(WeightType::infer("weight"), WeightType::Multiplicative);
        assert_eq!(WeightType::infer("ICE"), WeightType::Multiplicative);
        assert_eq!(WeightType::infer("KR"), WeightType::Divisive);
        assert_eq!(WeightType::infer("VC"), WeightType::Divisive);
    }

    #[test]
    fn balances_counts() {
        let values = Array1::from(vec![0.5, 2.0, f64::NAN]);
        let mul = Weights::new(values.clone(), WeightType::Multiplicative);
        let div = Weights::new(values, WeightType::Divisive);

        assert_eq!(mul.balance(0, 1, 3.0), 3.0);
        assert_eq!(div.balance(1, 1, 8.0), 2.0);
        assert!(mul.balance(0, 2, 1.0).is_nan());
        assert!(div.balance(0, 7, 1.0).is_nan());
    }

    #[test]
    fn none_disables_balancing() {
        assert!(Normalization::default().is_none());
        assert!(!Normalization::new("weight").is_none());
    }
}
