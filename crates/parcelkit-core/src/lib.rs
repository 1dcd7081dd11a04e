//! # parcelkit-core: Shipment and Result Model
//!
//! The leaf crate of the parcelkit workspace. It defines the values that
//! flow in and out of every carrier: what is being shipped, from where to
//! where, and what a carrier answered.
//!
//! ## Key Design Principles
//!
//! 1. **Validated country codes.** `CountryCode` is a newtype over an
//!    upper-case ISO 3166-1 alpha-2 string. Zone classification and
//!    domestic detection compare `CountryCode` values, never raw strings.
//!
//! 2. **Decimal money.** Prices on results are `rust_decimal::Decimal` in
//!    major currency units. Floats are only used for physical measurements.
//!
//! 3. **Results are immutable records.** A `Rate`, `Label` or `Tracking`
//!    is built once from a carrier answer and carries the raw upstream
//!    JSON for traceability.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `parcelkit-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod country;
pub mod error;
pub mod result;
pub mod shipment;
pub mod temporal;
pub mod units;

pub use country::CountryCode;
pub use error::ShipmentError;
pub use result::{
    Label, LabelResponse, Rate, RateResponse, Tracking, TrackingDetail, TrackingResponse,
    TrackingStatus,
};
pub use shipment::{Address, Axis, Package, Shipment};
pub use units::{DimensionUnit, WeightUnit};
