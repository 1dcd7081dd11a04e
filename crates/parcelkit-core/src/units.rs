//! Weight and dimension units reported by carriers.
//!
//! Units are metadata: parcelkit does not convert package measurements.
//! A carrier states which unit it expects for a given shipment and the
//! caller is responsible for supplying measurements in that unit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit for package weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Grams.
    G,
    /// Kilograms.
    Kg,
    /// Pounds.
    Lb,
    /// Ounces.
    Oz,
}

impl WeightUnit {
    /// Lower-case symbol, e.g. `"kg"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Kg => "kg",
            Self::Lb => "lb",
            Self::Oz => "oz",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit for package dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    /// Millimetres.
    Mm,
    /// Centimetres.
    Cm,
    /// Inches.
    In,
}

impl DimensionUnit {
    /// Lower-case symbol, e.g. `"cm"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::In => "in",
        }
    }
}

impl fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_symbol() {
        assert_eq!(WeightUnit::Kg.to_string(), "kg");
        assert_eq!(WeightUnit::Lb.to_string(), "lb");
        assert_eq!(DimensionUnit::In.to_string(), "in");
        assert_eq!(DimensionUnit::Mm.to_string(), "mm");
    }

    #[test]
    fn serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&WeightUnit::G).unwrap(), "\"g\"");
        let unit: DimensionUnit = serde_json::from_str("\"cm\"").unwrap();
        assert_eq!(unit, DimensionUnit::Cm);
    }
}
