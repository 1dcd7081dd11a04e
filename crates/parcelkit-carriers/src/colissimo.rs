//! # Colissimo
//!
//! La Poste's parcel service. Colissimo has no public rating API, so rates
//! come from the built-in box tariffs in
//! [`parcelkit_rates::tables::colissimo`]. Quoting never performs I/O and
//! never fails on network grounds. Labels and tracking are not offered.
//!
//! Package weights are read in grams and dimensions in millimetres.

use async_trait::async_trait;

use parcelkit_core::{
    DimensionUnit, LabelResponse, Rate, RateResponse, Shipment, TrackingResponse, WeightUnit,
};
use parcelkit_rates::tables::colissimo as tariffs;
use parcelkit_rates::{PackingPolicy, RateTable};

use crate::carrier::{Carrier, RequestOptions};
use crate::error::CarrierError;
use crate::service::{Service, ServiceDirectory, ServiceRegion, INTERNATIONAL};

pub const NAME: &str = "Colissimo";

/// Tariffs are published in euros.
const CURRENCY: &str = "EUR";

const SERVICES: &[Service] = &[
    Service {
        code: tariffs::SERVICE_FRANCE,
        name: "Colissimo France",
    },
    Service {
        code: tariffs::SERVICE_EMBALLAGE_FRANCE,
        name: "Colissimo Emballage France",
    },
    Service {
        code: tariffs::SERVICE_ECONOMIQUE_OUTREMER,
        name: "Colissimo Economique Outre-Mer",
    },
    Service {
        code: tariffs::SERVICE_OUTREMER,
        name: "Colissimo Outre-Mer",
    },
    Service {
        code: tariffs::SERVICE_EUROPE,
        name: "Colissimo Europe",
    },
    Service {
        code: tariffs::SERVICE_INTERNATIONAL,
        name: "Colissimo International",
    },
    Service {
        code: tariffs::SERVICE_EMBALLAGE_INTERNATIONAL,
        name: "Colissimo Emballage International",
    },
];

pub static SERVICE_CODES: ServiceDirectory = ServiceDirectory::new(&[
    ServiceRegion {
        key: "FR",
        services: SERVICES,
    },
    ServiceRegion {
        key: INTERNATIONAL,
        services: SERVICES,
    },
]);

/// Which services to quote and how to pack multi-package shipments.
#[derive(Debug, Clone, Default)]
pub struct ColissimoOptions {
    /// Service codes to quote. `None` quotes every service.
    pub services: Option<Vec<String>>,
    pub packing: PackingPolicy,
}

/// Static-table Colissimo carrier.
#[derive(Debug, Clone)]
pub struct ColissimoCarrier {
    options: ColissimoOptions,
    table: RateTable<'static>,
}

impl Default for ColissimoCarrier {
    fn default() -> Self {
        Self::new(ColissimoOptions::default())
    }
}

impl ColissimoCarrier {
    pub fn new(options: ColissimoOptions) -> Self {
        Self {
            options,
            table: tariffs::rate_table(),
        }
    }

    pub fn options(&self) -> &ColissimoOptions {
        &self.options
    }

    fn enabled(&self, code: &str) -> bool {
        match &self.options.services {
            Some(codes) => codes.iter().any(|c| c == code),
            None => true,
        }
    }

    fn quote(&self, shipment: &Shipment, service: &Service) -> Option<Rate> {
        let quote = self.table.quote(
            &shipment.to.country_code,
            service.code,
            &shipment.packages,
            self.options.packing,
        )?;
        Some(Rate {
            carrier: NAME.to_string(),
            service_name: service.name.to_string(),
            service_code: service.code.to_string(),
            price: quote.resolution.total,
            currency: CURRENCY.to_string(),
            delivery_date: None,
            box_ids: quote.resolution.box_ids(),
            response: raw_quote(&quote, service.code),
        })
    }
}

/// The quote as JSON for [`Rate::response`]. Serialization failures are
/// logged and leave the raw response `null`.
fn raw_quote<T: serde::Serialize>(quote: &T, service_code: &str) -> serde_json::Value {
    serde_json::to_value(quote).unwrap_or_else(|e| {
        tracing::warn!(
            carrier = NAME,
            service = %service_code,
            "cannot serialize quote, raw response left empty: {e}"
        );
        serde_json::Value::Null
    })
}

#[async_trait]
impl Carrier for ColissimoCarrier {
    fn name(&self) -> &str {
        NAME
    }

    fn weight_unit(&self, _shipment: &Shipment) -> WeightUnit {
        WeightUnit::G
    }

    fn dimension_unit(&self, _shipment: &Shipment) -> DimensionUnit {
        DimensionUnit::Mm
    }

    fn tracking_url(&self, tracking_number: &str) -> Option<String> {
        Some(format!(
            "https://www.laposte.fr/outils/suivre-vos-envois?code={tracking_number}"
        ))
    }

    fn service_codes(&self) -> &ServiceDirectory {
        &SERVICE_CODES
    }

    async fn get_rates(&self, shipment: &Shipment) -> Result<RateResponse, CarrierError> {
        shipment
            .validate()
            .map_err(|e| CarrierError::invalid_shipment(NAME, e))?;

        let origin = shipment.from.country_code.as_str();
        let rates: Vec<Rate> = SERVICE_CODES
            .services_for(origin)
            .iter()
            .filter(|s| self.enabled(s.code))
            .filter_map(|s| self.quote(shipment, s))
            .collect();

        tracing::debug!(
            carrier = NAME,
            destination = %shipment.to.country_code,
            quoted = rates.len(),
            "static rates resolved"
        );
        Ok(RateResponse::from_rates(rates))
    }

    async fn get_labels(
        &self,
        _shipment: &Shipment,
        _rate: &Rate,
        _options: &RequestOptions,
    ) -> Result<LabelResponse, CarrierError> {
        Err(CarrierError::not_supported(NAME, "labels"))
    }

    async fn get_tracking_status(
        &self,
        _tracking_numbers: &[String],
        _options: &RequestOptions,
    ) -> Result<TrackingResponse, CarrierError> {
        Err(CarrierError::not_supported(NAME, "tracking"))
    }
}
