//! Concurrent quoting across carriers: partial failure, per-carrier
//! deadlines and caller cancellation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use parcelkit_carriers::{
    Carrier, CarrierError, CarrierOutcome, ColissimoCarrier, RateAggregator, RequestOptions,
    ServiceDirectory,
};
use parcelkit_core::{
    Address, CountryCode, DimensionUnit, LabelResponse, Package, Rate, RateResponse, Shipment,
    TrackingResponse, WeightUnit,
};

static NO_SERVICES: ServiceDirectory = ServiceDirectory::new(&[]);

enum Behaviour {
    Quote(Decimal),
    Fail(u16),
    Hang,
}

struct FakeCarrier {
    name: &'static str,
    behaviour: Behaviour,
}

impl FakeCarrier {
    fn arc(name: &'static str, behaviour: Behaviour) -> Arc<dyn Carrier> {
        Arc::new(Self { name, behaviour })
    }
}

#[async_trait]
impl Carrier for FakeCarrier {
    fn name(&self) -> &str {
        self.name
    }

    fn weight_unit(&self, _shipment: &Shipment) -> WeightUnit {
        WeightUnit::G
    }

    fn dimension_unit(&self, _shipment: &Shipment) -> DimensionUnit {
        DimensionUnit::Mm
    }

    fn service_codes(&self) -> &ServiceDirectory {
        &NO_SERVICES
    }

    async fn get_rates(&self, _shipment: &Shipment) -> Result<RateResponse, CarrierError> {
        match &self.behaviour {
            Behaviour::Quote(price) => Ok(RateResponse::from_rates(vec![Rate {
                carrier: self.name.to_string(),
                service_name: "Standard".to_string(),
                service_code: "standard".to_string(),
                price: *price,
                currency: "EUR".to_string(),
                delivery_date: None,
                box_ids: Vec::new(),
                response: serde_json::Value::Null,
            }])),
            Behaviour::Fail(status) => Err(CarrierError::Api {
                endpoint: "/rates".to_string(),
                status: *status,
                body: String::new(),
            }),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(RateResponse::default())
            }
        }
    }

    async fn get_labels(
        &self,
        _shipment: &Shipment,
        _rate: &Rate,
        _options: &RequestOptions,
    ) -> Result<LabelResponse, CarrierError> {
        Err(CarrierError::not_supported(self.name, "labels"))
    }

    async fn get_tracking_status(
        &self,
        _tracking_numbers: &[String],
        _options: &RequestOptions,
    ) -> Result<TrackingResponse, CarrierError> {
        Err(CarrierError::not_supported(self.name, "tracking"))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn parcel() -> Shipment {
    Shipment::new(
        Address::new(CountryCode::new("FR").unwrap()),
        Address::new(CountryCode::new("FR").unwrap()),
        vec![Package::new(250.0, 1000.0, 990.0, 990.0)],
        "EUR",
    )
}

#[tokio::test]
async fn one_failure_does_not_hide_other_quotes() {
    init_tracing();
    let aggregator = RateAggregator::default()
        .with_carrier(Arc::new(ColissimoCarrier::default()))
        .with_carrier(FakeCarrier::arc("Broken", Behaviour::Fail(503)));

    let result = aggregator.quote_all(&parcel()).await;

    assert_eq!(result.quotes.len(), 2);
    assert_eq!(result.quotes[0].carrier, "Colissimo");
    assert_eq!(result.quotes[0].rates().len(), 1);
    assert_eq!(result.quotes[0].rates()[0].price, Decimal::new(495, 2));

    let failures: Vec<_> = result.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "Broken");
    assert!(failures[0].1.is_transient());
}

#[tokio::test]
async fn cheapest_spans_carriers() {
    let aggregator = RateAggregator::default()
        .with_carrier(Arc::new(ColissimoCarrier::default()))
        .with_carrier(FakeCarrier::arc("Budget", Behaviour::Quote(Decimal::new(399, 2))))
        .with_carrier(FakeCarrier::arc("Premium", Behaviour::Quote(Decimal::new(2500, 2))));

    let result = aggregator.quote_all(&parcel()).await;

    assert_eq!(result.rates().count(), 3);
    let cheapest = result.cheapest().expect("some rate");
    assert_eq!(cheapest.carrier, "Budget");
    assert_eq!(cheapest.price, Decimal::new(399, 2));
}

#[tokio::test]
async fn ties_go_to_the_first_carrier() {
    let price = Decimal::new(1000, 2);
    let aggregator = RateAggregator::default()
        .with_carrier(FakeCarrier::arc("First", Behaviour::Quote(price)))
        .with_carrier(FakeCarrier::arc("Second", Behaviour::Quote(price)));

    let result = aggregator.quote_all(&parcel()).await;
    assert_eq!(result.cheapest().map(|r| r.carrier.as_str()), Some("First"));
}

#[tokio::test]
async fn slow_carrier_times_out_alone() {
    init_tracing();
    let aggregator = RateAggregator::new(Duration::from_millis(100))
        .with_carrier(FakeCarrier::arc("Slow", Behaviour::Hang))
        .with_carrier(Arc::new(ColissimoCarrier::default()));

    let result = aggregator.quote_all(&parcel()).await;

    match &result.quotes[0].outcome {
        CarrierOutcome::Failed(CarrierError::Timeout {
            carrier,
            elapsed_ms,
        }) => {
            assert_eq!(carrier, "Slow");
            assert_eq!(*elapsed_ms, 100);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(result.quotes[0].error().is_some_and(CarrierError::is_transient));
    assert!(matches!(result.quotes[1].outcome, CarrierOutcome::Quoted(_)));
}

#[tokio::test]
async fn cancellation_keeps_answers_already_received() {
    let aggregator = RateAggregator::default()
        .with_carrier(Arc::new(ColissimoCarrier::default()))
        .with_carrier(FakeCarrier::arc("Slow", Behaviour::Hang));

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = tx.send(());
    });
    let cancel = async move {
        let _ = rx.await;
    };

    let result = aggregator.quote_all_until(&parcel(), cancel).await;

    assert!(matches!(result.quotes[0].outcome, CarrierOutcome::Quoted(_)));
    assert!(matches!(
        result.quotes[1].outcome,
        CarrierOutcome::Failed(CarrierError::Cancelled)
    ));
    assert!(!CarrierError::Cancelled.is_transient());
}

#[tokio::test]
async fn empty_aggregator_answers_nothing() {
    let aggregator = RateAggregator::default();
    assert!(aggregator.is_empty());
    let result = aggregator.quote_all(&parcel()).await;
    assert!(result.quotes.is_empty());
    assert!(result.cheapest().is_none());
}
