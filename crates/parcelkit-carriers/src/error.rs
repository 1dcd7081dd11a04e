//! Carrier error types.
//!
//! A carrier that has no rate for a shipment returns an empty
//! `RateResponse`, never an error. Errors are reserved for requests that
//! could not be answered at all, and [`CarrierError::is_transient`] tells
//! callers which of those are worth retrying.

use parcelkit_core::ShipmentError;

use crate::fedex::config::ConfigError;

/// Errors from carrier operations.
#[derive(Debug, thiserror::Error)]
pub enum CarrierError {
    /// Required credentials are missing or the shipment is unusable.
    #[error("{carrier}: invalid request: {reason}")]
    InvalidRequest { carrier: String, reason: String },

    /// The carrier does not offer this operation.
    #[error("{carrier} does not support {operation}")]
    NotSupported {
        carrier: String,
        operation: &'static str,
    },

    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The carrier API returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body was not the JSON shape expected.
    #[error("failed to deserialize response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },

    /// The carrier did not answer within the caller's deadline.
    #[error("{carrier} timed out after {elapsed_ms}ms")]
    Timeout { carrier: String, elapsed_ms: u64 },

    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Carrier configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CarrierError {
    /// Wrap a shipment validation failure for `carrier`.
    pub fn invalid_shipment(carrier: &str, err: ShipmentError) -> Self {
        Self::InvalidRequest {
            carrier: carrier.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn not_supported(carrier: &str, operation: &'static str) -> Self {
        Self::NotSupported {
            carrier: carrier.to_string(),
            operation,
        }
    }

    /// True for failures a retry might fix: transport errors, timeouts,
    /// rate limiting and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status == 429 || (500..600).contains(status),
            Self::InvalidRequest { .. }
            | Self::NotSupported { .. }
            | Self::Deserialization { .. }
            | Self::Cancelled
            | Self::Config(_) => false,
        }
    }
}
