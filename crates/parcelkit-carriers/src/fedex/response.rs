//! Mapping FedEx JSON replies into parcelkit results.
//!
//! Only the fields parcelkit surfaces are read. Every result keeps the raw
//! JSON object it came from in its `response` field.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use parcelkit_core::temporal::parse_carrier_datetime;
use parcelkit_core::{Label, Rate, Tracking, TrackingDetail, TrackingStatus};

use super::NAME;
use crate::service::ServiceDirectory;

pub(crate) const LABEL_MIME: &str = "application/pdf";

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

fn array_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// A JSON number or numeric string as a decimal.
fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Rates from `output.rateReplyDetails`. Entries without a usable charge
/// are skipped.
pub(crate) fn rates(data: &Value, services: &ServiceDirectory, region: &str) -> Vec<Rate> {
    array_at(data, "/output/rateReplyDetails")
        .iter()
        .filter_map(|detail| {
            let service_code = str_at(detail, "/serviceType").unwrap_or_default();
            let Some(price) = detail
                .pointer("/ratedShipmentDetails/0/totalNetCharge")
                .and_then(decimal)
            else {
                tracing::debug!(carrier = NAME, service = service_code, "rate reply without a charge");
                return None;
            };
            Some(Rate {
                carrier: NAME.to_string(),
                service_name: services
                    .name(region, service_code)
                    .unwrap_or_default()
                    .to_string(),
                service_code: service_code.to_string(),
                price,
                currency: str_at(detail, "/ratedShipmentDetails/0/shipmentRateDetail/currency")
                    .unwrap_or_default()
                    .to_string(),
                delivery_date: str_at(detail, "/commit/dateDetail/dayFormat")
                    .and_then(parse_carrier_datetime),
                box_ids: Vec::new(),
                response: detail.clone(),
            })
        })
        .collect()
}

/// Labels from `output.transactionShipments`.
pub(crate) fn labels(data: &Value, rate: &Rate) -> Vec<Label> {
    array_at(data, "/output/transactionShipments")
        .iter()
        .map(|shipment| Label {
            carrier: NAME.to_string(),
            rate: rate.clone(),
            tracking_number: str_at(shipment, "/masterTrackingNumber")
                .unwrap_or_default()
                .to_string(),
            label_data: str_at(shipment, "/pieceResponses/0/packageDocuments/0/encodedLabel")
                .unwrap_or_default()
                .to_string(),
            label_mime: LABEL_MIME.to_string(),
            response: shipment.clone(),
        })
        .collect()
}

/// Tracking results from `output.completeTrackResults`.
pub(crate) fn tracking(data: &Value) -> Vec<Tracking> {
    array_at(data, "/output/completeTrackResults")
        .iter()
        .map(|result| Tracking {
            carrier: NAME.to_string(),
            tracking_number: str_at(result, "/trackingNumber")
                .unwrap_or_default()
                .to_string(),
            status: status(
                str_at(result, "/trackResults/0/latestStatusDetail/code").unwrap_or_default(),
            ),
            estimated_delivery: None,
            details: array_at(result, "/trackResults/0/scanEvents")
                .iter()
                .map(scan_event)
                .collect(),
            response: result.clone(),
        })
        .collect()
}

fn scan_event(event: &Value) -> TrackingDetail {
    let location = ["city", "postalCode", "stateOrProvinceCode", "countryName"]
        .iter()
        .filter_map(|field| str_at(event, &format!("/scanLocation/{field}")))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    TrackingDetail {
        location,
        description: str_at(event, "/eventDescription")
            .unwrap_or_default()
            .to_string(),
        date: str_at(event, "/date").and_then(parse_carrier_datetime),
    }
}

/// FedEx latest-status codes.
pub(crate) fn status(code: &str) -> TrackingStatus {
    match code {
        "AP" => TrackingStatus::AvailableForPickup,
        "IT" | "IX" => TrackingStatus::InTransit,
        "OD" => TrackingStatus::OutForDelivery,
        "DL" => TrackingStatus::Delivered,
        "RS" => TrackingStatus::ReturnToSender,
        "CA" => TrackingStatus::Cancelled,
        "CD" | "DY" | "DE" | "HL" | "CH" | "SE" => TrackingStatus::Error,
        _ => TrackingStatus::Unknown,
    }
}
