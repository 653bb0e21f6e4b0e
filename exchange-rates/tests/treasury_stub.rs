//! Treasury adapter tests against a stub Treasury API.
//!
//! The stub is a real HTTP server on an ephemeral port, so these tests
//! exercise URL encoding, status handling and timeouts end to end.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use exchange_rates::{
    RATES_OF_EXCHANGE_PATH, TreasuryClient, TreasuryConfig, TreasuryRateProvider,
};
use rust_decimal_macros::dec;
use transactions_types::{CurrencyPair, ExchangeError, ExchangeRateProvider};

const WITH_DATA: &str = r#"{"data":[{"exchange_rate":"5.5","record_date":"2024-06-30"}],"meta":{"count":1},"links":{}}"#;
const WITHOUT_DATA: &str = r#"{"data":[],"meta":{"count":0},"links":{}}"#;

struct Stub {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    hits: AtomicUsize,
    last_query: Mutex<Option<HashMap<String, String>>>,
}

impl Stub {
    fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
        Self::slow(status, body, Duration::ZERO)
    }

    fn slow(status: StatusCode, body: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            delay,
            hits: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_query(&self) -> HashMap<String, String> {
        self.last_query.lock().unwrap().clone().unwrap_or_default()
    }
}

async fn rates_of_exchange(
    State(stub): State<Arc<Stub>>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    *stub.last_query.lock().unwrap() = Some(query);
    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }
    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body,
    )
}

/// Starts the stub and returns its base URL.
async fn spawn_stub(stub: Arc<Stub>) -> String {
    let app = Router::new()
        .route(RATES_OF_EXCHANGE_PATH, get(rates_of_exchange))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn provider(base_url: String, timeout: Duration) -> TreasuryRateProvider {
    TreasuryRateProvider::new(TreasuryClient::new(TreasuryConfig { base_url, timeout }).unwrap())
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn pair(s: &str) -> CurrencyPair {
    CurrencyPair::parse(s).unwrap()
}

#[tokio::test]
async fn test_rate_found_builds_expected_query() {
    let stub = Stub::new(StatusCode::OK, WITH_DATA);
    let provider = provider(spawn_stub(stub.clone()).await, Duration::from_secs(5));

    let quote = provider
        .get_rate(&pair("United Kingdom-Pound"), date("2024-08-20"))
        .await
        .unwrap();

    assert_eq!(quote.rate, dec!(5.5));
    assert_eq!(quote.record_date, date("2024-06-30"));
    assert_eq!(quote.requested_date, date("2024-08-20"));

    let query = stub.last_query();
    assert_eq!(
        query.get("filter").map(String::as_str),
        Some(
            "country_currency_desc:eq:United Kingdom-Pound,record_date:gte:2024-02-20,record_date:lte:2024-08-20"
        )
    );
    assert_eq!(
        query.get("fields").map(String::as_str),
        Some("exchange_rate,record_date")
    );
    assert_eq!(query.get("sort").map(String::as_str), Some("-record_date"));
    assert_eq!(query.get("page[size]").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn test_cached_rate_skips_upstream() {
    let stub = Stub::new(StatusCode::OK, WITH_DATA);
    let provider = provider(spawn_stub(stub.clone()).await, Duration::from_secs(5));

    provider
        .get_rate(&pair("Brazil-Real"), date("2024-08-20"))
        .await
        .unwrap();
    assert_eq!(stub.hits(), 1);

    // Same day, then a day inside the warmed [record_date, transaction_date] range.
    provider
        .get_rate(&pair("Brazil-Real"), date("2024-08-20"))
        .await
        .unwrap();
    let warmed = provider
        .get_rate(&pair("Brazil-Real"), date("2024-07-15"))
        .await
        .unwrap();

    assert_eq!(stub.hits(), 1);
    assert_eq!(warmed.rate, dec!(5.5));
    assert_eq!(warmed.record_date, date("2024-06-30"));
    assert_eq!(provider.cache().len(), 52);
}

#[tokio::test]
async fn test_empty_data_is_no_rate() {
    let stub = Stub::new(StatusCode::OK, WITHOUT_DATA);
    let provider = provider(spawn_stub(stub.clone()).await, Duration::from_secs(5));

    let result = provider
        .get_rate(&pair("Brazil-Real"), date("2024-08-20"))
        .await;

    assert!(matches!(result, Err(ExchangeError::NoRate { .. })));
    assert!(provider.cache().is_empty());
}

#[tokio::test]
async fn test_upstream_error_status() {
    let stub = Stub::new(StatusCode::NOT_FOUND, r#"{"error":"NOT FOUND"}"#);
    let provider = provider(spawn_stub(stub.clone()).await, Duration::from_secs(5));

    let result = provider
        .get_rate(&pair("Brazil-Real"), date("2024-08-20"))
        .await;

    assert!(matches!(result, Err(ExchangeError::Upstream(_))));
}

#[tokio::test]
async fn test_undecodable_body() {
    let stub = Stub::new(StatusCode::OK, "not json");
    let provider = provider(spawn_stub(stub.clone()).await, Duration::from_secs(5));

    let result = provider
        .get_rate(&pair("Brazil-Real"), date("2024-08-20"))
        .await;

    assert!(matches!(result, Err(ExchangeError::Decode(_))));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let stub = Stub::slow(StatusCode::OK, WITH_DATA, Duration::from_secs(3));
    let provider = provider(spawn_stub(stub.clone()).await, Duration::from_millis(200));

    let result = provider
        .get_rate(&pair("Brazil-Real"), date("2024-08-20"))
        .await;

    assert!(matches!(result, Err(ExchangeError::Timeout)));
}

#[tokio::test]
async fn test_unreachable_upstream() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = provider(format!("http://{}", addr), Duration::from_secs(1));
    let result = provider
        .get_rate(&pair("Brazil-Real"), date("2024-08-20"))
        .await;

    assert!(result.is_err());
    assert!(provider.health().await.is_err());
}

#[tokio::test]
async fn test_health_up_and_down() {
    let up = provider(
        spawn_stub(Stub::new(StatusCode::OK, WITHOUT_DATA)).await,
        Duration::from_secs(5),
    );
    assert!(up.health().await.is_ok());

    let down = provider(
        spawn_stub(Stub::new(StatusCode::NOT_FOUND, r#"{"error":"NOT FOUND"}"#)).await,
        Duration::from_secs(5),
    );
    assert!(matches!(down.health().await, Err(ExchangeError::Upstream(_))));
}
