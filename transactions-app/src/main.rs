//! # Transactions Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize logging and, optionally, OpenTelemetry export
//! - Initialize the repository adapter and the exchange rate gateway
//! - Create the transaction service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, metrics::SdkMeterProvider, propagation::TraceContextPropagator, trace as sdktrace,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, LogFormat, RateSource};
use exchange_rates::{RateProvider, TreasuryConfig};
use transactions_hex::{TransactionService, inbound::HttpServer};
use transactions_repo::build_repo;

const SERVICE_NAME: &str = "transactions-service";

/// OpenTelemetry providers that must be flushed on exit.
struct Telemetry {
    tracer_provider: sdktrace::SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Telemetry {
    fn init(endpoint: &str) -> anyhow::Result<Self> {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let resource = Resource::builder().with_service_name(SERVICE_NAME).build();

        // Use gRPC exporter with batch processing (non-blocking)
        let span_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;
        let tracer_provider = sdktrace::SdkTracerProvider::builder()
            .with_resource(resource.clone())
            .with_batch_exporter(span_exporter)
            .build();
        global::set_tracer_provider(tracer_provider.clone());

        // HTTP metrics recorded by the router go through the global provider.
        let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;
        let meter_provider = SdkMeterProvider::builder()
            .with_resource(resource)
            .with_periodic_exporter(metric_exporter)
            .build();
        global::set_meter_provider(meter_provider.clone());

        Ok(Self {
            tracer_provider,
            meter_provider,
        })
    }

    fn tracer(&self) -> sdktrace::Tracer {
        use opentelemetry::trace::TracerProvider as _;
        self.tracer_provider.tracer(SERVICE_NAME)
    }

    fn shutdown(self) {
        if let Err(e) = self.tracer_provider.shutdown() {
            eprintln!("Failed to flush traces: {e}");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            eprintln!("Failed to flush metrics: {e}");
        }
    }
}

fn init_logging(config: &Config, telemetry: Option<&Telemetry>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,transactions_app=debug,transactions_hex=debug".into());

    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(telemetry.map(|t| tracing_opentelemetry::layer().with_tracer(t.tracer())))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    let telemetry = config
        .otlp_endpoint
        .as_deref()
        .map(Telemetry::init)
        .transpose()?;
    init_logging(&config, telemetry.as_ref());

    tracing::info!("Starting transactions server on port {}", config.port);

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;
    tracing::info!("Using {} store", repo.backend());

    let rates = match config.rate_source {
        RateSource::Treasury => RateProvider::treasury(TreasuryConfig {
            base_url: config.treasury_base_url.clone(),
            timeout: config.treasury_timeout,
        })?,
        RateSource::Fixed => RateProvider::fixed(),
    };
    tracing::info!("Using exchange rates from {}", rates.name());

    // Create the transaction service
    let service = TransactionService::new(repo, rates).with_retention_days(config.retention_days);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    let result = server.run(&addr).await;
    finish(result, telemetry)
}

/// Flushes traces and metrics, then hands back the server outcome.
fn finish<T>(result: anyhow::Result<T>, telemetry: Option<Telemetry>) -> anyhow::Result<T> {
    if let Some(telemetry) = telemetry {
        telemetry.shutdown();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry() -> Telemetry {
        Telemetry {
            tracer_provider: sdktrace::SdkTracerProvider::builder().build(),
            meter_provider: SdkMeterProvider::builder().build(),
        }
    }

    #[test]
    fn test_finish_flushes_telemetry_when_server_fails() {
        let telemetry = telemetry();
        let tracer_provider = telemetry.tracer_provider.clone();
        let meter_provider = telemetry.meter_provider.clone();

        let result: anyhow::Result<()> =
            finish(Err(anyhow::anyhow!("address in use")), Some(telemetry));

        assert_eq!(result.unwrap_err().to_string(), "address in use");
        // Already shut down, so a second shutdown is refused.
        assert!(tracer_provider.shutdown().is_err());
        assert!(meter_provider.shutdown().is_err());
    }

    #[test]
    fn test_finish_without_telemetry_passes_result_through() {
        assert_eq!(finish(Ok(7), None).unwrap(), 7);
    }
}
