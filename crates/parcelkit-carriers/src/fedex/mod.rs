//! # FedEx
//!
//! API-backed carrier for the FedEx REST APIs (rates, ship, track).
//!
//! ## Request flow
//!
//! 1. Check the credentials the operation needs. Missing ones fail with
//!    `InvalidRequest` before any I/O.
//! 2. Obtain an OAuth token (cached across calls).
//! 3. POST the JSON payload through the injected [`HttpTransport`] with a
//!    fresh `x-customer-transaction-id`.
//! 4. Map the reply. A 401 drops the cached token and retries once.
//!
//! ## Units
//!
//! Shipments from the US are measured in pounds and inches, all others in
//! kilograms and centimetres.

pub mod config;

mod auth;
mod request;
mod response;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use parcelkit_core::{
    DimensionUnit, LabelResponse, Rate, RateResponse, Shipment, TrackingResponse, WeightUnit,
};

use crate::carrier::{Carrier, RequestOptions};
use crate::error::CarrierError;
use crate::service::{Service, ServiceDirectory, ServiceRegion, INTERNATIONAL};
use crate::transport::{HttpTransport, Replay, ReqwestTransport, TransportRequest};

use self::auth::TokenCache;
pub use self::config::{ConfigError, FedExConfig};

pub const NAME: &str = "FedEx";

const TRANSACTION_HEADER: &str = "x-customer-transaction-id";

macro_rules! services {
    ($($code:literal => $name:literal),* $(,)?) => {
        &[$(Service { code: $code, name: $name }),*]
    };
}

pub static SERVICE_CODES: ServiceDirectory = ServiceDirectory::new(&[
    ServiceRegion {
        key: "US",
        services: services! {
            "FEDEX_1_DAY_FREIGHT" => "FedEx 1 Day Freight",
            "FEDEX_2_DAY" => "FedEx 2 Day",
            "FEDEX_2_DAY_AM" => "FedEx 2 Day AM",
            "FEDEX_2_DAY_FREIGHT" => "FedEx 2 DAY Freight",
            "FEDEX_3_DAY_FREIGHT" => "FedEx 3 Day Freight",
            "FEDEX_EXPRESS_SAVER" => "FedEx Express Saver",
            "FEDEX_FIRST_FREIGHT" => "FedEx First Freight",
            "FEDEX_FREIGHT_ECONOMY" => "FedEx Freight Economy",
            "FEDEX_FREIGHT_PRIORITY" => "FedEx Freight Priority",
            "FEDEX_GROUND" => "FedEx Ground",
            "FIRST_OVERNIGHT" => "FedEx First Overnight",
            "PRIORITY_OVERNIGHT" => "FedEx Priority Overnight",
            "STANDARD_OVERNIGHT" => "FedEx Standard Overnight",
            "GROUND_HOME_DELIVERY" => "FedEx Ground Home Delivery",
            "SAME_DAY" => "FedEx Same Day",
            "SAME_DAY_CITY" => "FedEx Same Day City",
            "SMART_POST" => "FedEx Smart Post",
        },
    },
    ServiceRegion {
        key: "UK",
        services: services! {
            "FEDEX_DISTANCE_DEFERRED" => "FedEx Distance Deferred",
            "FEDEX_NEXT_DAY_EARLY_MORNING" => "FedEx Next Day Early Morning",
            "FEDEX_NEXT_DAY_MID_MORNING" => "FedEx Next Day Mid Morning",
            "FEDEX_NEXT_DAY_AFTERNOON" => "FedEx Next Day Afternoon",
            "FEDEX_NEXT_DAY_END_OF_DAY" => "FedEx Next Day End of Day",
            "FEDEX_NEXT_DAY_FREIGHT" => "FedEx Next Day Freight",
        },
    },
    ServiceRegion {
        key: INTERNATIONAL,
        services: services! {
            "INTERNATIONAL_ECONOMY" => "FedEx International Economy",
            "INTERNATIONAL_ECONOMY_FREIGHT" => "FedEx International Economy Freight",
            "INTERNATIONAL_ECONOMY_DISTRIBUTION" => "FedEx International Economy Distribution",
            "INTERNATIONAL_FIRST" => "FedEx International First",
            "INTERNATIONAL_PRIORITY" => "FedEx International Priority",
            "INTERNATIONAL_PRIORITY_FREIGHT" => "FedEx International Priority Freight",
            "INTERNATIONAL_PRIORITY_DISTRIBUTION" => "FedEx International Priority Distribution",
            "INTERNATIONAL_PRIORITY_EXPRESS" => "FedEx International Priority Express",
            "EUROPE_FIRST_INTERNATIONAL_PRIORITY" => "FedEx Europe First International Priority",
            "INTERNATIONAL_DISTRIBUTION_FREIGHT" => "FedEx International Distribution",
        },
    },
]);

pub(crate) fn weight_unit_for(shipment: &Shipment) -> WeightUnit {
    if shipment.from.country_code == "US" {
        WeightUnit::Lb
    } else {
        WeightUnit::Kg
    }
}

pub(crate) fn dimension_unit_for(shipment: &Shipment) -> DimensionUnit {
    if shipment.from.country_code == "US" {
        DimensionUnit::In
    } else {
        DimensionUnit::Cm
    }
}

/// Service-directory region for an origin country. The directory keys the
/// United Kingdom as `UK`, not its ISO code.
fn service_region(origin: &str) -> &str {
    match origin {
        "GB" => "UK",
        other => other,
    }
}

#[derive(Debug, Clone, Copy)]
enum Credential {
    ClientId,
    ClientSecret,
    AccountNumber,
}

impl Credential {
    fn field(self) -> &'static str {
        match self {
            Self::ClientId => "client_id",
            Self::ClientSecret => "client_secret",
            Self::AccountNumber => "account_number",
        }
    }
}

const SHIPPING_CREDENTIALS: [Credential; 3] = [
    Credential::ClientId,
    Credential::ClientSecret,
    Credential::AccountNumber,
];
const TRACKING_CREDENTIALS: [Credential; 2] = [Credential::ClientId, Credential::ClientSecret];

/// FedEx REST API carrier.
pub struct FedExCarrier {
    config: FedExConfig,
    root: Url,
    transport: Arc<dyn HttpTransport>,
    token: TokenCache,
}

impl std::fmt::Debug for FedExCarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedExCarrier")
            .field("config", &self.config)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl FedExCarrier {
    /// Build a carrier over an injected transport.
    pub fn new(config: FedExConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, ConfigError> {
        let root = config.api_root()?;
        Ok(Self {
            config,
            root,
            transport,
            token: TokenCache::new(),
        })
    }

    /// Build a carrier with a [`ReqwestTransport`] using the configured
    /// timeout.
    pub fn from_config(config: FedExConfig) -> Result<Self, CarrierError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs)).map_err(
            |e| CarrierError::InvalidRequest {
                carrier: NAME.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            },
        )?;
        Ok(Self::new(config, Arc::new(transport))?)
    }

    pub fn config(&self) -> &FedExConfig {
        &self.config
    }

    fn credential(&self, credential: Credential) -> Option<&str> {
        let value = match credential {
            Credential::ClientId => &self.config.client_id,
            Credential::ClientSecret => &self.config.client_secret,
            Credential::AccountNumber => &self.config.account_number,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Fail fast unless every listed credential is set.
    fn require(&self, credentials: &[Credential]) -> Result<(), CarrierError> {
        let missing: Vec<&str> = credentials
            .iter()
            .filter(|c| self.credential(**c).is_none())
            .map(|c| c.field())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(CarrierError::InvalidRequest {
            carrier: NAME.to_string(),
            reason: format!("missing {}", missing.join(", ")),
        })
    }

    fn account(&self) -> &str {
        self.credential(Credential::AccountNumber).unwrap_or_default()
    }

    async fn bearer(&self) -> Result<String, CarrierError> {
        self.token
            .access_token(
                self.transport.as_ref(),
                &self.root,
                self.credential(Credential::ClientId).unwrap_or_default(),
                self.credential(Credential::ClientSecret).unwrap_or_default(),
            )
            .await
    }

    async fn post_once(
        &self,
        url: &Url,
        body: &Value,
        replay: Replay,
    ) -> Result<Value, CarrierError> {
        let token = self.bearer().await?;
        let request = TransportRequest::post_json(url.clone(), body.clone())
            .header("Authorization", format!("Bearer {token}"))
            .header(TRANSACTION_HEADER, Uuid::new_v4().to_string())
            .replay(replay);
        let endpoint = request.endpoint().to_string();
        tracing::debug!(carrier = NAME, %endpoint, "calling carrier API");
        self.transport.send(request).await?.into_json(&endpoint)
    }

    /// POST to an API endpoint, refreshing the token once on 401.
    async fn post(
        &self,
        endpoint: &str,
        body: Value,
        replay: Replay,
    ) -> Result<Value, CarrierError> {
        let url = self
            .root
            .join(endpoint)
            .map_err(|e| CarrierError::InvalidRequest {
                carrier: NAME.to_string(),
                reason: format!("cannot build URL for {endpoint}: {e}"),
            })?;
        match self.post_once(&url, &body, replay).await {
            Err(CarrierError::Api { status: 401, .. }) => {
                tracing::info!(carrier = NAME, %endpoint, "access token rejected, refreshing");
                self.token.invalidate().await;
                self.post_once(&url, &body, replay).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl Carrier for FedExCarrier {
    fn name(&self) -> &str {
        NAME
    }

    fn weight_unit(&self, shipment: &Shipment) -> WeightUnit {
        weight_unit_for(shipment)
    }

    fn dimension_unit(&self, shipment: &Shipment) -> DimensionUnit {
        dimension_unit_for(shipment)
    }

    fn tracking_url(&self, tracking_number: &str) -> Option<String> {
        Some(format!(
            "https://www.fedex.com/Tracking?action=track&tracknumbers={tracking_number}"
        ))
    }

    fn service_codes(&self) -> &ServiceDirectory {
        &SERVICE_CODES
    }

    async fn get_rates(&self, shipment: &Shipment) -> Result<RateResponse, CarrierError> {
        self.require(&SHIPPING_CREDENTIALS)?;
        shipment
            .validate()
            .map_err(|e| CarrierError::invalid_shipment(NAME, e))?;

        let body = request::rate_request(&self.config, self.account(), shipment);
        let data = self.post(request::RATE_ENDPOINT, body, Replay::Safe).await?;
        let region = service_region(shipment.from.country_code.as_str());
        let rates = response::rates(&data, &SERVICE_CODES, region);

        tracing::debug!(carrier = NAME, quoted = rates.len(), "rates received");
        Ok(RateResponse {
            rates,
            response: data,
        })
    }

    async fn get_labels(
        &self,
        shipment: &Shipment,
        rate: &Rate,
        options: &RequestOptions,
    ) -> Result<LabelResponse, CarrierError> {
        self.require(&SHIPPING_CREDENTIALS)?;
        shipment
            .validate()
            .map_err(|e| CarrierError::invalid_shipment(NAME, e))?;

        let body = request::label_request(&self.config, self.account(), shipment, rate, options);
        // Each accepted ship request buys a label.
        let data = self
            .post(request::SHIP_ENDPOINT, body, Replay::ConnectOnly)
            .await?;
        Ok(LabelResponse {
            labels: response::labels(&data, rate),
            response: data,
        })
    }

    async fn get_tracking_status(
        &self,
        tracking_numbers: &[String],
        _options: &RequestOptions,
    ) -> Result<TrackingResponse, CarrierError> {
        self.require(&TRACKING_CREDENTIALS)?;
        if tracking_numbers.is_empty() {
            return Err(CarrierError::InvalidRequest {
                carrier: NAME.to_string(),
                reason: "no tracking numbers".to_string(),
            });
        }

        let body = request::tracking_request(tracking_numbers);
        let data = self.post(request::TRACK_ENDPOINT, body, Replay::Safe).await?;
        Ok(TrackingResponse {
            tracking: response::tracking(&data),
            response: data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelkit_core::{Address, CountryCode, Package};

    struct Unreachable;

    #[async_trait]
    impl HttpTransport for Unreachable {
        async fn send(
            &self,
            _request: TransportRequest,
        ) -> Result<crate::transport::TransportResponse, CarrierError> {
            panic!("no request expected");
        }
    }

    fn shipment(from: &str, to: &str) -> Shipment {
        Shipment::new(
            Address::new(CountryCode::new(from).unwrap()),
            Address::new(CountryCode::new(to).unwrap()),
            vec![Package::new(1.0, 1.0, 1.0, 1.0)],
            "USD",
        )
    }

    fn carrier(config: FedExConfig) -> FedExCarrier {
        FedExCarrier::new(config, Arc::new(Unreachable)).unwrap()
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_io() {
        let c = carrier(FedExConfig {
            client_id: Some("id".into()),
            ..FedExConfig::default()
        });
        match c.get_rates(&shipment("US", "US")).await {
            Err(CarrierError::InvalidRequest { reason, .. }) => {
                assert_eq!(reason, "missing client_secret, account_number");
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tracking_needs_no_account_number() {
        let c = carrier(FedExConfig {
            client_id: Some("id".into()),
            ..FedExConfig::default()
        });
        let err = c
            .get_tracking_status(&["123".into()], &RequestOptions::new())
            .await
            .unwrap_err();
        match err {
            CarrierError::InvalidRequest { reason, .. } => assert_eq!(reason, "missing client_secret"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_shipment_is_invalid_request() {
        let c = carrier(FedExConfig::new("id", "secret", "acct"));
        let mut s = shipment("US", "US");
        s.packages.clear();
        assert!(matches!(
            c.get_rates(&s).await,
            Err(CarrierError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn units_follow_origin() {
        let c = carrier(FedExConfig::default());
        let us = shipment("US", "CA");
        let fr = shipment("FR", "US");
        assert_eq!(c.weight_unit(&us), WeightUnit::Lb);
        assert_eq!(c.dimension_unit(&us), DimensionUnit::In);
        assert_eq!(c.weight_unit(&fr), WeightUnit::Kg);
        assert_eq!(c.dimension_unit(&fr), DimensionUnit::Cm);
        assert!(!c.is_domestic(&us));
    }

    #[test]
    fn service_regions() {
        assert_eq!(service_region("GB"), "UK");
        assert_eq!(
            SERVICE_CODES.name(service_region("GB"), "FEDEX_NEXT_DAY_FREIGHT"),
            Some("FedEx Next Day Freight")
        );
        assert_eq!(SERVICE_CODES.name("US", "FEDEX_GROUND"), Some("FedEx Ground"));
        assert_eq!(SERVICE_CODES.services_for("DE").len(), 10);
    }

    #[test]
    fn tracking_url_template() {
        let c = carrier(FedExConfig::default());
        assert_eq!(
            c.tracking_url("794621467890").as_deref(),
            Some("https://www.fedex.com/Tracking?action=track&tracknumbers=794621467890")
        );
    }
}
