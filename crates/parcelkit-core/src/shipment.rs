//! # Shipment Model
//!
//! What the caller wants to ship: an origin, a destination, an ordered
//! list of packages and the currency quotes should be expressed in.
//!
//! Measurements are optional. An unset weight or dimension means
//! "unconstrained" for box matching and is reported as `0.0` by the
//! accessor helpers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::country::CountryCode;
use crate::error::ShipmentError;

/// A postal address. Only the country is required; carriers that need
/// more (API-backed carriers building labels) read the optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub country_code: CountryCode,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub street1: Option<String>,
    #[serde(default)]
    pub street2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub residential: bool,
}

impl Address {
    /// An address with only its country set.
    pub fn new(country_code: CountryCode) -> Self {
        Self {
            country_code,
            first_name: None,
            last_name: None,
            company_name: None,
            street1: None,
            street2: None,
            city: None,
            state_province: None,
            postal_code: None,
            email: None,
            phone: None,
            residential: false,
        }
    }

    /// First and last name joined by a space, skipping absent parts.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One of the three package dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => write!(f, "length"),
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// A single physical package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// Declared value, used for customs and insurance.
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Package {
    /// A package with weight and dimensions set.
    pub fn new(weight: f64, length: f64, width: f64, height: f64) -> Self {
        Self {
            weight: Some(weight),
            length: Some(length),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Weight, treating unset as zero.
    pub fn weight_or_zero(&self) -> f64 {
        self.weight.unwrap_or(0.0)
    }

    /// `[length, width, height]`, treating unset as zero.
    pub fn dimensions(&self) -> [f64; 3] {
        [
            self.length.unwrap_or(0.0),
            self.width.unwrap_or(0.0),
            self.height.unwrap_or(0.0),
        ]
    }

    /// Length × width × height, zero if any dimension is unset.
    pub fn volume(&self) -> f64 {
        self.dimensions().iter().product()
    }

    /// Declared value, zero when unset.
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    fn validate(&self, index: usize) -> Result<(), ShipmentError> {
        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ShipmentError::InvalidWeight { index, weight });
            }
        }
        for (axis, value) in [
            (Axis::Length, self.length),
            (Axis::Width, self.width),
            (Axis::Height, self.height),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ShipmentError::InvalidDimension { index, axis, value });
                }
            }
        }
        Ok(())
    }
}

/// A request to move packages from one address to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub from: Address,
    pub to: Address,
    pub packages: Vec<Package>,
    /// ISO 4217 currency code, e.g. `"EUR"`.
    pub currency: String,
}

impl Shipment {
    /// Build a shipment.
    pub fn new(from: Address, to: Address, packages: Vec<Package>, currency: &str) -> Self {
        Self {
            from,
            to,
            packages,
            currency: currency.to_ascii_uppercase(),
        }
    }

    /// True when origin and destination are in the same country.
    pub fn is_domestic(&self) -> bool {
        self.from.country_code == self.to.country_code
    }

    /// Sum of package weights, unset weights counting as zero.
    pub fn total_weight(&self) -> f64 {
        self.packages.iter().map(Package::weight_or_zero).sum()
    }

    /// Structural validation every carrier runs before quoting.
    ///
    /// # Errors
    ///
    /// - [`ShipmentError::NoPackages`] for an empty package list.
    /// - [`ShipmentError::InvalidWeight`] / [`ShipmentError::InvalidDimension`]
    ///   for negative, NaN or infinite measurements.
    /// - [`ShipmentError::InvalidCurrency`] unless the currency is three
    ///   ASCII letters.
    pub fn validate(&self) -> Result<(), ShipmentError> {
        if self.packages.is_empty() {
            return Err(ShipmentError::NoPackages);
        }
        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ShipmentError::InvalidCurrency(self.currency.clone()));
        }
        for (index, package) in self.packages.iter().enumerate() {
            package.validate(index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(code: &str) -> Address {
        Address::new(CountryCode::new(code).unwrap())
    }

    fn shipment(packages: Vec<Package>) -> Shipment {
        Shipment::new(address("FR"), address("DE"), packages, "eur")
    }

    #[test]
    fn currency_is_upper_cased() {
        assert_eq!(shipment(vec![Package::default()]).currency, "EUR");
    }

    #[test]
    fn domestic_compares_country_codes() {
        let mut s = shipment(vec![Package::default()]);
        assert!(!s.is_domestic());
        s.to = address("fr");
        assert!(s.is_domestic());
    }

    #[test]
    fn unset_measurements_read_as_zero() {
        let p = Package::default();
        assert_eq!(p.weight_or_zero(), 0.0);
        assert_eq!(p.dimensions(), [0.0, 0.0, 0.0]);
        assert_eq!(p.volume(), 0.0);
    }

    #[test]
    fn total_weight_sums_packages() {
        let s = shipment(vec![
            Package::new(1.5, 1.0, 1.0, 1.0),
            Package::default(),
            Package::new(2.0, 1.0, 1.0, 1.0),
        ]);
        assert_eq!(s.total_weight(), 3.5);
    }

    #[test]
    fn validate_rejects_empty_shipment() {
        assert_eq!(shipment(vec![]).validate(), Err(ShipmentError::NoPackages));
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let s = shipment(vec![Package::default(), Package::new(-1.0, 1.0, 1.0, 1.0)]);
        assert!(matches!(
            s.validate(),
            Err(ShipmentError::InvalidWeight { index: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_nan_dimension() {
        let p = Package {
            height: Some(f64::NAN),
            ..Package::default()
        };
        assert!(matches!(
            shipment(vec![p]).validate(),
            Err(ShipmentError::InvalidDimension {
                index: 0,
                axis: Axis::Height,
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_bad_currency() {
        let mut s = shipment(vec![Package::default()]);
        s.currency = "EURO".into();
        assert!(matches!(s.validate(), Err(ShipmentError::InvalidCurrency(_))));
    }

    #[test]
    fn validate_accepts_unset_measurements() {
        assert!(shipment(vec![Package::default()]).validate().is_ok());
    }

    #[test]
    fn full_name_skips_missing_parts() {
        let mut a = address("US");
        assert_eq!(a.full_name(), "");
        a.last_name = Some("Lovelace".into());
        assert_eq!(a.full_name(), "Lovelace");
        a.first_name = Some("Ada".into());
        assert_eq!(a.full_name(), "Ada Lovelace");
    }
}
