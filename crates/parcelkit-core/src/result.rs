//! # Result Model
//!
//! Uniform answers returned by every carrier, whether the answer was
//! computed from a static price table or mapped from a carrier API.
//!
//! Each record keeps the raw upstream data in `response` so a caller can
//! trace a price or status back to what the carrier actually said.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// -- Rates --------------------------------------------------------------------

/// One quoted service for a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// Name of the carrier that produced the quote.
    pub carrier: String,
    /// Human-readable service name, empty when the code is not in the
    /// carrier's service directory.
    pub service_name: String,
    pub service_code: String,
    /// Price in major currency units.
    pub price: Decimal,
    pub currency: String,
    #[serde(default)]
    pub delivery_date: Option<NaiveDateTime>,
    /// Boxes chosen by a static-table carrier, one per package (or a single
    /// box when packages were consolidated). Empty for API carriers.
    #[serde(default)]
    pub box_ids: Vec<String>,
    #[serde(default)]
    pub response: serde_json::Value,
}

/// All rates a carrier returned for one shipment.
///
/// An empty `rates` list is a definitive "no rate available", not a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateResponse {
    pub rates: Vec<Rate>,
    #[serde(default)]
    pub response: serde_json::Value,
}

impl RateResponse {
    /// A response carrying the given rates and no upstream payload.
    pub fn from_rates(rates: Vec<Rate>) -> Self {
        Self {
            rates,
            response: serde_json::Value::Null,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// The lowest-priced rate, first one wins on ties.
    pub fn cheapest(&self) -> Option<&Rate> {
        self.rates.iter().min_by(|a, b| a.price.cmp(&b.price))
    }
}

// -- Labels -------------------------------------------------------------------

/// A purchased shipping label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub carrier: String,
    /// The rate the label was bought against.
    pub rate: Rate,
    pub tracking_number: String,
    /// Label document, base64-encoded as delivered by the carrier.
    pub label_data: String,
    pub label_mime: String,
    #[serde(default)]
    pub response: serde_json::Value,
}

/// All labels a carrier returned for one label request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelResponse {
    pub labels: Vec<Label>,
    #[serde(default)]
    pub response: serde_json::Value,
}

// -- Tracking -----------------------------------------------------------------

/// Normalized shipment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Unknown,
    AvailableForPickup,
    InTransit,
    OutForDelivery,
    Delivered,
    ReturnToSender,
    Cancelled,
    Error,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::AvailableForPickup => write!(f, "available_for_pickup"),
            Self::InTransit => write!(f, "in_transit"),
            Self::OutForDelivery => write!(f, "out_for_delivery"),
            Self::Delivered => write!(f, "delivered"),
            Self::ReturnToSender => write!(f, "return_to_sender"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single scan or status event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingDetail {
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
}

/// Current state of one tracking number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    pub carrier: String,
    pub tracking_number: String,
    pub status: TrackingStatus,
    #[serde(default)]
    pub estimated_delivery: Option<NaiveDateTime>,
    #[serde(default)]
    pub details: Vec<TrackingDetail>,
    #[serde(default)]
    pub response: serde_json::Value,
}

/// All tracking results a carrier returned for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub tracking: Vec<Tracking>,
    #[serde(default)]
    pub response: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(code: &str, price: Decimal) -> Rate {
        Rate {
            carrier: "Test".into(),
            service_name: String::new(),
            service_code: code.into(),
            price,
            currency: "EUR".into(),
            delivery_date: None,
            box_ids: vec![],
            response: serde_json::Value::Null,
        }
    }

    #[test]
    fn cheapest_picks_lowest_price() {
        let resp = RateResponse::from_rates(vec![
            rate("a", Decimal::new(1200, 2)),
            rate("b", Decimal::new(495, 2)),
            rate("c", Decimal::new(700, 2)),
        ]);
        assert_eq!(resp.cheapest().unwrap().service_code, "b");
    }

    #[test]
    fn cheapest_tie_keeps_first() {
        let resp = RateResponse::from_rates(vec![
            rate("a", Decimal::new(500, 2)),
            rate("b", Decimal::new(500, 2)),
        ]);
        assert_eq!(resp.cheapest().unwrap().service_code, "a");
    }

    #[test]
    fn empty_response_has_no_cheapest() {
        let resp = RateResponse::default();
        assert!(resp.is_empty());
        assert!(resp.cheapest().is_none());
    }

    #[test]
    fn tracking_status_serializes_snake_case() {
        let json = serde_json::to_string(&TrackingStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out_for_delivery\"");
        assert_eq!(TrackingStatus::ReturnToSender.to_string(), "return_to_sender");
    }
}
