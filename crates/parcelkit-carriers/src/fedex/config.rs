//! FedEx carrier configuration.
//!
//! Credentials are optional at construction time. Each operation checks the
//! ones it needs and fails fast with `CarrierError::InvalidRequest` before
//! any network call, so a partially configured carrier can still sit in an
//! aggregator next to fully configured ones.

use rust_decimal::Decimal;
use url::Url;

pub const SANDBOX_URL: &str = "https://apis-sandbox.fedex.com/";
pub const PRODUCTION_URL: &str = "https://apis.fedex.com/";

pub const DEFAULT_PICKUP_TYPE: &str = "DROPOFF_AT_FEDEX_LOCATION";
pub const DEFAULT_PACKAGING_TYPE: &str = "YOUR_PACKAGING";

/// Configuration for the FedEx REST APIs.
///
/// Custom `Debug` implementation redacts `client_secret` to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct FedExConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub account_number: Option<String>,
    /// Default: `DROPOFF_AT_FEDEX_LOCATION`.
    pub pickup_type: String,
    /// Default: `YOUR_PACKAGING`.
    pub packaging_type: String,
    /// Declared insured value. Sent only when greater than zero.
    pub insurance_amount: Option<Decimal>,
    /// Use the production API instead of the sandbox.
    pub production: bool,
    /// Overrides the production/sandbox URL (tests, proxies).
    pub base_url: Option<Url>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FedExConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            account_number: None,
            pickup_type: DEFAULT_PICKUP_TYPE.to_string(),
            packaging_type: DEFAULT_PACKAGING_TYPE.to_string(),
            insurance_amount: None,
            production: false,
            base_url: None,
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for FedExConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedExConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("account_number", &self.account_number)
            .field("pickup_type", &self.pickup_type)
            .field("packaging_type", &self.packaging_type)
            .field("insurance_amount", &self.insurance_amount)
            .field("production", &self.production)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl FedExConfig {
    /// Sandbox configuration with the given credentials.
    pub fn new(client_id: &str, client_secret: &str, account_number: &str) -> Self {
        Self {
            client_id: Some(client_id.to_string()),
            client_secret: Some(client_secret.to_string()),
            account_number: Some(account_number.to_string()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `FEDEX_CLIENT_ID`, `FEDEX_CLIENT_SECRET`, `FEDEX_ACCOUNT_NUMBER`
    /// - `FEDEX_PICKUP_TYPE` (default: `DROPOFF_AT_FEDEX_LOCATION`)
    /// - `FEDEX_PACKAGING_TYPE` (default: `YOUR_PACKAGING`)
    /// - `FEDEX_INSURANCE_AMOUNT` (decimal, optional)
    /// - `FEDEX_PRODUCTION` (`true`/`1` for production, default sandbox)
    /// - `FEDEX_BASE_URL` (optional override)
    /// - `FEDEX_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let insurance_amount = match env_opt("FEDEX_INSURANCE_AMOUNT") {
            Some(raw) => Some(raw.parse::<Decimal>().map_err(|_| ConfigError::InvalidValue {
                var: "FEDEX_INSURANCE_AMOUNT".to_string(),
                value: raw,
            })?),
            None => None,
        };
        let base_url = match env_opt("FEDEX_BASE_URL") {
            Some(raw) => Some(parse_base_url("FEDEX_BASE_URL", &raw)?),
            None => None,
        };

        Ok(Self {
            client_id: env_opt("FEDEX_CLIENT_ID"),
            client_secret: env_opt("FEDEX_CLIENT_SECRET"),
            account_number: env_opt("FEDEX_ACCOUNT_NUMBER"),
            pickup_type: env_opt("FEDEX_PICKUP_TYPE").unwrap_or(defaults.pickup_type),
            packaging_type: env_opt("FEDEX_PACKAGING_TYPE").unwrap_or(defaults.packaging_type),
            insurance_amount,
            production: env_opt("FEDEX_PRODUCTION")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            base_url,
            timeout_secs: env_opt("FEDEX_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        })
    }

    /// Effective API root: the override, else production or sandbox. Always
    /// ends in `/` so endpoint paths join beneath it.
    pub fn api_root(&self) -> Result<Url, ConfigError> {
        match &self.base_url {
            Some(url) => parse_base_url("base_url", url.as_str()),
            None if self.production => parse_base_url("production", PRODUCTION_URL),
            None => parse_base_url("sandbox", SANDBOX_URL),
        }
    }
}

fn env_opt(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_base_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}
