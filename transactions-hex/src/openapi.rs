//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use transactions_types::domain::TransactionId;
use transactions_types::dto::{
    ConvertedTransactionResponse, CreateTransactionRequest, CreateTransactionResponse,
    ErrorResponse, HealthResponse, HealthStatus,
};
use utoipa::OpenApi;

use crate::inbound::ConversionQuery;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Store a purchase transaction
#[utoipa::path(
    post,
    path = "/transaction",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction stored", body = CreateTransactionResponse),
        (status = 400, description = "Invalid field values or malformed body", body = ErrorResponse,
            example = json!({
                "timestamp": "2025-08-20T14:03:11.512Z",
                "status": 400,
                "error": "Validation Error",
                "messages": {"description": "size must be between 0 and 50"},
                "path": "/transaction"
            })),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn create_transaction() {}

/// Retrieve a transaction converted to a target currency
///
/// The rate used is the latest one published on or before the transaction
/// date, within the six preceding months.
#[utoipa::path(
    get,
    path = "/transaction/{id}",
    tag = "transactions",
    params(
        ("id" = String, Path, description = "Transaction ID (UUID)"),
        ConversionQuery
    ),
    responses(
        (status = 200, description = "Converted transaction", body = ConvertedTransactionResponse),
        (status = 400, description = "Malformed id or currency", body = ErrorResponse),
        (status = 404, description = "Unknown transaction, or no exchange rate available", body = ErrorResponse,
            example = json!({
                "timestamp": "2025-08-20T14:03:11.512Z",
                "status": 404,
                "error": "Resource Not Found",
                "messages": {"resourceNotFound": "Could not retrieve exchange rates for Brazil-Real"},
                "path": "/transaction/a1b2c3d4-e5f6-7890-1234-567890abcdef"
            })),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn get_converted_transaction() {}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies are up", body = HealthResponse,
            example = json!({"status": "UP", "components": {"exchangeRates": "UP", "store": "UP"}})),
        (status = 503, description = "A dependency is down", body = HealthResponse)
    )
)]
async fn health() {}

/// OpenAPI documentation for the Transactions API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Transaction Service API",
        version = "1.0.0",
        description = "Stores purchase transactions in US dollars and retrieves them converted to other currencies using the U.S. Treasury Reporting Rates of Exchange.",
        license(name = "MIT"),
    ),
    paths(create_transaction, get_converted_transaction, health),
    components(
        schemas(
            CreateTransactionRequest,
            CreateTransactionResponse,
            ConvertedTransactionResponse,
            ErrorResponse,
            HealthResponse,
            HealthStatus,
            TransactionId,
        )
    ),
    tags(
        (name = "transactions", description = "Store and convert purchase transactions"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
