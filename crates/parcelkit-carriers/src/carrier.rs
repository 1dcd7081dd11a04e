//! # Carrier Contract
//!
//! The operation set every carrier offers, whether it prices shipments
//! from a local rate table or calls a remote API. Callers hold carriers as
//! `Arc<dyn Carrier>` and never need to know which kind they have.
//!
//! ## Outcomes
//!
//! - `Ok` with an empty response: the carrier has nothing for this
//!   request. Not retried.
//! - `Err(e)` with `e.is_transient()`: the request could not be answered
//!   right now. Safe to retry.
//! - Any other `Err`: definitive (bad configuration, unusable shipment,
//!   unsupported operation).
//!
//! ## Units
//!
//! Package measurements are interpreted in the carrier's units as reported
//! by [`Carrier::weight_unit`] and [`Carrier::dimension_unit`]. Those may
//! depend on the shipment's origin.

use async_trait::async_trait;
use serde_json::{Map, Value};

use parcelkit_core::{
    DimensionUnit, LabelResponse, Rate, RateResponse, Shipment, TrackingResponse, WeightUnit,
};

use crate::error::CarrierError;
use crate::service::ServiceDirectory;

/// Carrier-specific options for label and tracking requests, keyed by the
/// carrier's own field names. Unset keys take the carrier's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    values: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The value under `key`, or `default` when unset.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).cloned().unwrap_or_else(|| default.into())
    }
}

/// A shipping carrier.
#[async_trait]
pub trait Carrier: Send + Sync {
    /// Display name, also stamped on every result.
    fn name(&self) -> &str;

    fn weight_unit(&self, shipment: &Shipment) -> WeightUnit;

    fn dimension_unit(&self, shipment: &Shipment) -> DimensionUnit;

    fn is_domestic(&self, shipment: &Shipment) -> bool {
        shipment.is_domestic()
    }

    /// Public tracking page for a number, if the carrier has one.
    fn tracking_url(&self, _tracking_number: &str) -> Option<String> {
        None
    }

    fn service_codes(&self) -> &ServiceDirectory;

    /// Quote every service the carrier offers for `shipment`.
    async fn get_rates(&self, shipment: &Shipment) -> Result<RateResponse, CarrierError>;

    /// Purchase labels for `shipment` at a previously quoted `rate`.
    async fn get_labels(
        &self,
        shipment: &Shipment,
        rate: &Rate,
        options: &RequestOptions,
    ) -> Result<LabelResponse, CarrierError>;

    async fn get_tracking_status(
        &self,
        tracking_numbers: &[String],
        options: &RequestOptions,
    ) -> Result<TrackingResponse, CarrierError>;
}
