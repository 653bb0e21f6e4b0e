//! HTTP request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{
        OriginalUri, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use transactions_types::{
    AppError, CreateTransactionRequest, ErrorResponse, ExchangeRateProvider, HealthStatus,
    TransactionId, TransactionRepository,
};

use crate::TransactionService;
use crate::openapi::ApiDoc;

const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Application state shared across handlers.
pub struct AppState<R: TransactionRepository, X: ExchangeRateProvider> {
    pub service: TransactionService<R, X>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Error mapping
// ─────────────────────────────────────────────────────────────────────────────

/// An [`AppError`] bound to the request path it occurred on.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub path: String,
}

impl ApiError {
    pub fn new(error: AppError, path: impl Into<String>) -> Self {
        Self {
            error,
            path: path.into(),
        }
    }

    fn status_and_body(&self) -> (StatusCode, &'static str, BTreeMap<String, String>) {
        let single = |key: &str, message: String| BTreeMap::from([(key.to_string(), message)]);

        match &self.error {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation Error",
                errors.clone().into_map(),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Request Value error",
                single("requestValue", msg.clone()),
            ),
            e @ (AppError::NotFound(_) | AppError::RateUnavailable { .. }) => (
                StatusCode::NOT_FOUND,
                "Resource Not Found",
                single("resourceNotFound", e.to_string()),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                single("internalError", INTERNAL_ERROR_MESSAGE.to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, messages) = self.status_and_body();

        if status.is_server_error() {
            tracing::error!("Request to {} failed: {}", self.path, self.error);
        } else {
            tracing::warn!("Request to {} rejected: {}", self.path, self.error);
        }

        let body = ErrorResponse {
            timestamp: chrono::Utc::now(),
            status: status.as_u16(),
            error: error.to_string(),
            messages,
            path: self.path,
        };

        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

/// Store a purchase transaction.
#[tracing::instrument(skip(state, payload), fields(path = %uri.path()))]
pub async fn create_transaction<R: TransactionRepository, X: ExchangeRateProvider>(
    State(state): State<Arc<AppState<R, X>>>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path();
    let Json(req) = payload
        .map_err(|e| ApiError::new(AppError::BadRequest(e.body_text()), path))?;

    let created = state
        .service
        .store_transaction(req)
        .await
        .map_err(|e| ApiError::new(e, path))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Query parameters of the conversion endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversionQuery {
    /// Target currency as "Country-Currency", e.g. "Brazil-Real".
    /// Blank or absent returns the USD amount.
    pub currency: Option<String>,
}

/// Retrieve a transaction converted into another currency.
#[tracing::instrument(skip(state, query), fields(transaction_id = %id))]
pub async fn get_converted_transaction<R: TransactionRepository, X: ExchangeRateProvider>(
    State(state): State<Arc<AppState<R, X>>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    query: Result<Query<ConversionQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path();
    let Query(query) =
        query.map_err(|e| ApiError::new(AppError::BadRequest(e.body_text()), path))?;

    let transaction_id: TransactionId = id.parse().map_err(|_| {
        ApiError::new(
            AppError::BadRequest(format!("Invalid transaction id: {}", id)),
            path,
        )
    })?;

    let view = state
        .service
        .get_converted_transaction(transaction_id, query.currency.as_deref())
        .await
        .map_err(|e| ApiError::new(e, path))?;

    Ok(Json(view))
}

// ─────────────────────────────────────────────────────────────────────────────
// Operational endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Health check endpoint; 503 when any dependency is down.
pub async fn health<R: TransactionRepository, X: ExchangeRateProvider>(
    State(state): State<Arc<AppState<R, X>>>,
) -> impl IntoResponse {
    let report = state.service.health().await;
    let status = match report.status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(report))
}

/// OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Any route that is not mapped.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    let path = uri.path();
    ApiError::new(
        AppError::NotFound(format!("No resource found for request '{}'.", path)),
        path,
    )
}
