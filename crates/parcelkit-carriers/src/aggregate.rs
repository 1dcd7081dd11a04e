//! # Multi-Carrier Rate Aggregation
//!
//! Asks several carriers for rates at once. Each carrier runs as its own
//! future under a per-carrier deadline, so a slow API carrier never holds
//! up a static-table carrier that answers immediately, and one carrier's
//! failure never hides another's quotes.
//!
//! Results are collected into a fresh [`AggregateRates`] owned by the
//! caller; carriers share no mutable state with each other.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, FutureExt};

use parcelkit_core::{Rate, RateResponse, Shipment};

use crate::carrier::Carrier;
use crate::error::CarrierError;

/// Default per-carrier deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What one carrier answered.
#[derive(Debug)]
pub enum CarrierOutcome {
    Quoted(RateResponse),
    Failed(CarrierError),
}

#[derive(Debug)]
pub struct CarrierQuote {
    pub carrier: String,
    pub outcome: CarrierOutcome,
}

impl CarrierQuote {
    pub fn rates(&self) -> &[Rate] {
        match &self.outcome {
            CarrierOutcome::Quoted(resp) => &resp.rates,
            CarrierOutcome::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&CarrierError> {
        match &self.outcome {
            CarrierOutcome::Quoted(_) => None,
            CarrierOutcome::Failed(e) => Some(e),
        }
    }
}

/// One outcome per carrier, in the order carriers were registered.
#[derive(Debug, Default)]
pub struct AggregateRates {
    pub quotes: Vec<CarrierQuote>,
}

impl AggregateRates {
    /// Every rate from every carrier that answered.
    pub fn rates(&self) -> impl Iterator<Item = &Rate> {
        self.quotes.iter().flat_map(CarrierQuote::rates)
    }

    /// Carriers that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &CarrierError)> {
        self.quotes
            .iter()
            .filter_map(|q| q.error().map(|e| (q.carrier.as_str(), e)))
    }

    /// The lowest-priced rate across all carriers. Earlier carriers win
    /// ties.
    pub fn cheapest(&self) -> Option<&Rate> {
        self.rates().min_by(|a, b| a.price.cmp(&b.price))
    }
}

/// Fans a shipment out to several carriers.
#[derive(Clone)]
pub struct RateAggregator {
    carriers: Vec<Arc<dyn Carrier>>,
    timeout: Duration,
}

impl Default for RateAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl RateAggregator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            carriers: Vec::new(),
            timeout,
        }
    }

    pub fn with_carrier(mut self, carrier: Arc<dyn Carrier>) -> Self {
        self.carriers.push(carrier);
        self
    }

    pub fn push(&mut self, carrier: Arc<dyn Carrier>) {
        self.carriers.push(carrier);
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Quote every carrier concurrently.
    pub async fn quote_all(&self, shipment: &Shipment) -> AggregateRates {
        self.quote_all_until(shipment, std::future::pending()).await
    }

    /// Quote every carrier concurrently until `cancel` completes. Carriers
    /// still outstanding at that point are dropped and reported as
    /// [`CarrierError::Cancelled`]; answers already received are kept.
    pub async fn quote_all_until<C>(&self, shipment: &Shipment, cancel: C) -> AggregateRates
    where
        C: Future<Output = ()>,
    {
        let cancel = cancel.shared();
        let calls = self.carriers.iter().map(|carrier| {
            let cancel = cancel.clone();
            async move {
                let name = carrier.name().to_string();
                let outcome = tokio::select! {
                    result = tokio::time::timeout(self.timeout, carrier.get_rates(shipment)) => {
                        match result {
                            Ok(Ok(resp)) => CarrierOutcome::Quoted(resp),
                            Ok(Err(e)) => CarrierOutcome::Failed(e),
                            Err(_) => CarrierOutcome::Failed(CarrierError::Timeout {
                                carrier: name.clone(),
                                elapsed_ms: u64::try_from(self.timeout.as_millis())
                                    .unwrap_or(u64::MAX),
                            }),
                        }
                    }
                    _ = cancel => CarrierOutcome::Failed(CarrierError::Cancelled),
                };
                log_outcome(&name, &outcome);
                CarrierQuote {
                    carrier: name,
                    outcome,
                }
            }
        });

        AggregateRates {
            quotes: join_all(calls).await,
        }
    }
}

fn log_outcome(carrier: &str, outcome: &CarrierOutcome) {
    match outcome {
        CarrierOutcome::Quoted(resp) => {
            tracing::debug!(%carrier, rates = resp.rates.len(), "carrier quoted");
        }
        CarrierOutcome::Failed(e) => {
            tracing::warn!(%carrier, transient = e.is_transient(), "carrier failed: {e}");
        }
    }
}
