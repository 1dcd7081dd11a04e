//! OAuth client-credentials tokens for the FedEx APIs.
//!
//! One token is shared by every call a carrier makes and refreshed shortly
//! before it expires. Concurrent callers wait on the same lock, so a burst
//! of requests triggers a single token fetch.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::error::CarrierError;
use crate::transport::{HttpTransport, TransportRequest};

pub(crate) const TOKEN_ENDPOINT: &str = "oauth/token";

/// Refresh this long before the server-side expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the server omits `expires_in`.
const DEFAULT_LIFETIME_SECS: u64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenReply {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    current: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A valid access token, fetching a new one if needed.
    pub(crate) async fn access_token(
        &self,
        transport: &dyn HttpTransport,
        root: &Url,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, CarrierError> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let url = root
            .join(TOKEN_ENDPOINT)
            .map_err(|e| CarrierError::InvalidRequest {
                carrier: super::NAME.to_string(),
                reason: format!("cannot build token URL: {e}"),
            })?;
        let request = TransportRequest::post_form(
            url,
            vec![
                ("grant_type".to_string(), "client_credentials".to_string()),
                ("client_id".to_string(), client_id.to_string()),
                ("client_secret".to_string(), client_secret.to_string()),
            ],
        );
        let endpoint = request.endpoint().to_string();
        let body = transport.send(request).await?.into_json(&endpoint)?;
        let reply: TokenReply =
            serde_json::from_value(body).map_err(|e| CarrierError::Deserialization {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let lifetime = Duration::from_secs(reply.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS));
        let refresh_at = Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN);
        tracing::debug!(carrier = super::NAME, lifetime_secs = lifetime.as_secs(), "fetched access token");

        *current = Some(CachedToken {
            access_token: reply.access_token.clone(),
            refresh_at,
        });
        Ok(reply.access_token)
    }

    /// Drop the cached token so the next call fetches a fresh one.
    pub(crate) async fn invalidate(&self) {
        *self.current.lock().await = None;
    }
}
