//! # parcelkit-carriers: Carrier Contract and Implementations
//!
//! One interface, [`Carrier`], over two kinds of carrier:
//!
//! - **Static-table carriers** ([`colissimo::ColissimoCarrier`]) price
//!   shipments from built-in box tariffs through `parcelkit-rates`. They
//!   never perform I/O.
//! - **API-backed carriers** ([`fedex::FedExCarrier`]) build a JSON
//!   request, send it through an injected [`HttpTransport`], and map the
//!   reply into the shared result model.
//!
//! [`RateAggregator`] asks any mix of them for rates concurrently, with a
//! per-carrier timeout and caller-driven cancellation.
//!
//! ## Error model
//!
//! An empty `RateResponse` means "no rate available" and is final. A
//! [`CarrierError`] means the request was not answered;
//! [`CarrierError::is_transient`] separates the retryable failures from
//! configuration and request errors.
//!
//! ## Crate Policy
//!
//! - Carriers are `Send + Sync` and meant to be shared via `Arc`.
//! - Transport retry lives in [`ReqwestTransport`], not in carriers.
//! - No `.unwrap()` outside tests.

pub mod aggregate;
pub mod carrier;
pub mod colissimo;
pub mod error;
pub mod fedex;
pub mod service;
pub mod transport;

mod retry;

pub use aggregate::{AggregateRates, CarrierOutcome, CarrierQuote, RateAggregator};
pub use carrier::{Carrier, RequestOptions};
pub use colissimo::{ColissimoCarrier, ColissimoOptions};
pub use error::CarrierError;
pub use fedex::{FedExCarrier, FedExConfig};
pub use service::{Service, ServiceDirectory, ServiceRegion};
pub use transport::{
    HttpTransport, Method, Replay, ReqwestTransport, TransportBody, TransportRequest,
    TransportResponse,
};
