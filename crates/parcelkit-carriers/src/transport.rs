//! # HTTP Transport
//!
//! API-backed carriers never touch `reqwest` directly. They build a
//! [`TransportRequest`] and hand it to an injected [`HttpTransport`],
//! which returns the status and raw body. Status interpretation and JSON
//! decoding stay with the carrier so that "no rate" and "request failed"
//! remain distinguishable.
//!
//! [`ReqwestTransport`] is the production implementation: one pooled
//! `reqwest::Client` with a request timeout, plus bounded retry on
//! transport errors (200ms, 400ms, 800ms). A request marked
//! [`Replay::ConnectOnly`] is resent only when the connection itself
//! failed, so a timed-out purchase is never sent twice.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::CarrierError;
use crate::retry::RetryPolicy;

// -- Requests -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
}

/// Which transport failures allow the request to be sent again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Replay {
    /// Read-only on the carrier side. Any transport failure is retried.
    #[default]
    Safe,
    /// Has side effects. Retried only if no connection was made.
    ConnectOnly,
}

/// A carrier call, independent of any HTTP client library.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: TransportBody,
    pub replay: Replay,
}

impl TransportRequest {
    pub fn post_json(url: Url, body: Value) -> Self {
        Self {
            method: Method::Post,
            url,
            headers: Vec::new(),
            body: TransportBody::Json(body),
            replay: Replay::Safe,
        }
    }

    pub fn post_form(url: Url, fields: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            url,
            headers: Vec::new(),
            body: TransportBody::Form(fields),
            replay: Replay::Safe,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn replay(mut self, replay: Replay) -> Self {
        self.replay = replay;
        self
    }

    /// Path of the URL, used as the endpoint label in errors and logs.
    pub fn endpoint(&self) -> &str {
        self.url.path()
    }
}

// -- Responses ----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Decode a 2xx body, mapping non-2xx statuses to
    /// [`CarrierError::Api`] and bad JSON to
    /// [`CarrierError::Deserialization`].
    pub fn into_json(self, endpoint: &str) -> Result<Value, CarrierError> {
        if !self.is_success() {
            return Err(CarrierError::Api {
                endpoint: endpoint.to_string(),
                status: self.status,
                body: self.body,
            });
        }
        self.json().map_err(|e| CarrierError::Deserialization {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

// -- Trait --------------------------------------------------------------------

/// The HTTP capability injected into API-backed carriers.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request. Non-2xx statuses are not errors at this level.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, CarrierError>;
}

// -- reqwest implementation ---------------------------------------------------

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestTransport {
    /// Build a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    fn build(&self, request: &TransportRequest) -> reqwest::RequestBuilder {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match &request.body {
            TransportBody::Empty => builder,
            TransportBody::Json(body) => builder.json(body),
            TransportBody::Form(fields) => builder.form(fields),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, CarrierError> {
        let endpoint = request.endpoint().to_string();
        let replay = request.replay;
        let resp = self
            .retry
            .run(
                &endpoint,
                || self.build(&request).send(),
                |e: &reqwest::Error| replay == Replay::Safe || e.is_connect(),
            )
            .await
            .map_err(|source| CarrierError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|source| CarrierError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;
        tracing::debug!(%endpoint, status, "carrier HTTP response");
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn into_json_decodes_success() {
        let v = response(200, r#"{"ok":true}"#).into_json("x").unwrap();
        assert_eq!(v["ok"], true);
    }

    #[test]
    fn into_json_maps_status_to_api_error() {
        match response(503, "down").into_json("rate/v1/rates/quotes") {
            Err(CarrierError::Api { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn into_json_maps_bad_body_to_deserialization() {
        let err = response(200, "<html>").into_json("x").unwrap_err();
        assert!(matches!(err, CarrierError::Deserialization { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn request_builder_collects_headers() {
        let url = Url::parse("https://apis.example.com/rate/v1/rates/quotes").unwrap();
        let req = TransportRequest::post_json(url, serde_json::json!({}))
            .header("Authorization", "Bearer t")
            .header("x-customer-transaction-id", "abc");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.endpoint(), "/rate/v1/rates/quotes");
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.replay, Replay::Safe);
        assert_eq!(req.replay(Replay::ConnectOnly).replay, Replay::ConnectOnly);
    }
}
