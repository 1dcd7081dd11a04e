//! # Error Types
//!
//! Structural problems with a shipment that make it unusable for any
//! carrier. Carriers surface these as invalid-request failures before any
//! catalog lookup or network call happens.

use thiserror::Error;

use crate::shipment::Axis;

/// A shipment or one of its parts failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShipmentError {
    /// The shipment has no packages to quote.
    #[error("shipment has no packages")]
    NoPackages,

    /// A package declares a negative or non-finite weight.
    #[error("package {index} has an invalid weight: {weight}")]
    InvalidWeight {
        /// Zero-based position of the package in the shipment.
        index: usize,
        /// The offending value.
        weight: f64,
    },

    /// A package declares a negative or non-finite dimension.
    #[error("package {index} has an invalid {axis}: {value}")]
    InvalidDimension {
        /// Zero-based position of the package in the shipment.
        index: usize,
        /// Which dimension failed.
        axis: Axis,
        /// The offending value.
        value: f64,
    },

    /// The currency is not a three-letter ISO 4217 code.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// A country code is not two ASCII letters.
    #[error("invalid country code: {0:?}")]
    InvalidCountryCode(String),
}
