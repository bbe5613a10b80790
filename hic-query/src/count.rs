use std::fmt;
use std::str::FromStr;

use num_traits::{NumCast, Zero};
use serde::{Deserialize, Serialize};

use super::errors::HicError;

/// Numeric type a pixel count can be materialized as.
///
/// Raw cooler counts are integers, balanced counts are always floating point;
/// the same fill and table code is instantiated for both.
pub trait Count: Copy + Zero + NumCast + PartialEq + fmt::Debug + fmt::Display + Serialize + 'static {
    const INTEGRAL: bool;

    /// `None` when `value` is out of range, or fractional for an integer type.
    fn from_f64(value: f64) -> Option<Self> {
        if Self::INTEGRAL && value.fract() != 0.0 {
            return None;
        }
        num_traits::cast(value)
    }
}

impl Count for i32 {
    const INTEGRAL: bool = true;
}

impl Count for i64 {
    const INTEGRAL: bool = true;
}

impl Count for f32 {
    const INTEGRAL: bool = false;
}

impl Count for f64 {
    const INTEGRAL: bool = false;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountType {
    Int,
    Float,
}

impl Default for CountType {
    fn default() -> Self {
        CountType::Int
    }
}

impl FromStr for CountType {
    type Err = HicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(CountType::Int),
            "float" => Ok(CountType::Float),
            _ => Err(HicError::InvalidArgument(format!(
                "count_type should be either \"int\" or \"float\", found \"{}\"", s
            ))),
        }
    }
}

impl fmt::Display for CountType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CountType::Int => write!(f, "int"),
            CountType::Float => write!(f, "float"),
        }
    }
}
