//! Request payloads for the FedEx rate, ship and track APIs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use parcelkit_core::{Address, Package, Rate, Shipment};

use super::config::FedExConfig;
use super::{dimension_unit_for, weight_unit_for};
use crate::carrier::RequestOptions;

pub(crate) const RATE_ENDPOINT: &str = "rate/v1/rates/quotes";
pub(crate) const SHIP_ENDPOINT: &str = "ship/v1/shipments";
pub(crate) const TRACK_ENDPOINT: &str = "track/v1/trackingnumbers";

/// Label specification fields and their defaults.
const LABEL_DEFAULTS: [(&str, &str); 6] = [
    ("labelFormatType", "COMMON2D"),
    ("labelOrder", "SHIPPING_LABEL_FIRST"),
    ("labelStockType", "PAPER_85X11_TOP_HALF_LABEL"),
    ("labelRotation", "UPSIDE_DOWN"),
    ("imageType", "PDF"),
    ("labelPrintingOrientation", "TOP_EDGE_OF_TEXT_FIRST"),
];

pub(crate) fn rate_request(config: &FedExConfig, account: &str, shipment: &Shipment) -> Value {
    let mut requested = json!({
        "shipper": { "address": address(&shipment.from) },
        "recipient": { "address": address(&shipment.to) },
        "preferredCurrency": shipment.currency,
        "rateRequestType": ["LIST", "ACCOUNT"],
        "pickupType": config.pickup_type,
        "packagingType": config.packaging_type,
        "shippingChargesPayment": sender_payment(account),
        "packageCount": shipment.packages.len(),
        "requestedPackageLineItems": line_items(shipment),
    });

    if !shipment.is_domestic() {
        requested["customsClearanceDetail"] = json!({
            "commodities": commodities(shipment, false),
        });
    }
    if let Some(amount) = config.insurance_amount.filter(|a| *a > Decimal::ZERO) {
        requested["totalInsuredValue"] = money(amount, &shipment.currency);
    }

    json!({
        "accountNumber": { "value": account },
        "rateRequestControlParameters": {
            "returnTransitTimes": true,
            "servicesNeededOnRateFailure": true,
        },
        "requestedShipment": requested,
    })
}

pub(crate) fn label_request(
    config: &FedExConfig,
    account: &str,
    shipment: &Shipment,
    rate: &Rate,
    options: &RequestOptions,
) -> Value {
    let mut label_spec = serde_json::Map::new();
    for (key, default) in LABEL_DEFAULTS {
        label_spec.insert(key.to_string(), options.get_or(key, default));
    }
    if let Some(detail) = options.get("customerSpecifiedDetail") {
        label_spec.insert("customerSpecifiedDetail".to_string(), detail.clone());
    }
    label_spec.insert(
        "returnedDispositionDetail".to_string(),
        options.get_or("returnedDispositionDetail", true),
    );

    let mut requested = json!({
        "shipper": {
            "address": address(&shipment.from),
            "contact": contact(&shipment.from),
        },
        "recipients": [{
            "address": address(&shipment.to),
            "contact": contact(&shipment.to),
        }],
        "pickupType": config.pickup_type,
        "serviceType": rate.service_code,
        "packagingType": config.packaging_type,
        "shippingChargesPayment": sender_payment(account),
        "labelSpecification": label_spec,
        "rateRequestType": ["LIST", "ACCOUNT"],
        "preferredCurrency": shipment.currency,
        "requestedPackageLineItems": line_items(shipment),
    });

    if !shipment.is_domestic() {
        requested["customsClearanceDetail"] = json!({
            "dutiesPayment": { "paymentType": "SENDER" },
            "commodities": commodities(shipment, true),
        });
    }

    json!({
        "requestedShipment": requested,
        "labelResponseOptions": options.get_or("labelResponseOptions", "LABEL"),
        "accountNumber": { "value": account },
        "shipAction": options.get_or("shipAction", "CONFIRM"),
        "processingOptionType": options.get_or("processingOptionType", "ALLOW_ASYNCHRONOUS"),
        "oneLabelAtATime": options.get_or("oneLabelAtATime", true),
    })
}

pub(crate) fn tracking_request(tracking_numbers: &[String]) -> Value {
    let info: Vec<Value> = tracking_numbers
        .iter()
        .map(|n| {
            let number: String = n.chars().filter(|c| !c.is_whitespace()).collect();
            json!({ "trackingNumberInfo": { "trackingNumber": number } })
        })
        .collect();
    json!({
        "includeDetailedScans": true,
        "trackingInfo": info,
    })
}

fn address(address: &Address) -> Value {
    let state: String = address
        .state_province
        .as_deref()
        .unwrap_or_default()
        .chars()
        .take(2)
        .collect();
    json!({
        "streetLines": [
            address.street1.as_deref().unwrap_or_default(),
            address.street2.as_deref().unwrap_or_default(),
        ],
        "city": address.city,
        "stateOrProvinceCode": state,
        "postalCode": address.postal_code,
        "countryCode": address.country_code.as_str(),
        "residential": address.residential,
    })
}

fn contact(address: &Address) -> Value {
    json!({
        "personName": address.full_name(),
        "emailAddress": address.email,
        "phoneNumber": address.phone,
    })
}

fn sender_payment(account: &str) -> Value {
    json!({
        "paymentType": "SENDER",
        "payor": {
            "responsibleParty": {
                "accountNumber": { "value": account },
            },
        },
    })
}

fn line_items(shipment: &Shipment) -> Vec<Value> {
    let weight_unit = weight_unit_for(shipment).as_str().to_ascii_uppercase();
    let dimension_unit = dimension_unit_for(shipment).as_str().to_ascii_uppercase();
    shipment
        .packages
        .iter()
        .map(|p| {
            let [length, width, height] = p.dimensions();
            json!({
                "groupPackageCount": 1,
                "weight": { "units": weight_unit, "value": p.weight_or_zero() },
                "dimensions": {
                    "length": length,
                    "width": width,
                    "height": height,
                    "units": dimension_unit,
                },
            })
        })
        .collect()
}

/// One commodity line per package. Label requests also declare the
/// country of manufacture.
fn commodities(shipment: &Shipment, with_origin: bool) -> Vec<Value> {
    let weight_unit = weight_unit_for(shipment).as_str().to_ascii_uppercase();
    shipment
        .packages
        .iter()
        .map(|p: &Package| {
            let value = money(p.price_or_zero(), &shipment.currency);
            let mut line = json!({
                "description": "Products",
                "quantity": 1,
                "quantityUnits": "PCS",
                "weight": { "units": weight_unit, "value": p.weight_or_zero() },
                "unitPrice": value,
                "customsValue": value,
            });
            if with_origin {
                line["countryOfManufacture"] = json!("US");
            }
            line
        })
        .collect()
}

fn money(amount: Decimal, currency: &str) -> Value {
    json!({
        "amount": amount.to_f64().unwrap_or_default(),
        "currency": currency,
    })
}
