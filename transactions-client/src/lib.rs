//! # Transactions Client SDK
//!
//! A typed Rust client for the Transactions API.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::de::DeserializeOwned;

use transactions_types::error::RATE_UNAVAILABLE_MESSAGE;
use transactions_types::{
    ConvertedTransactionResponse, CreateTransactionRequest, CreateTransactionResponse,
    ErrorResponse, HealthResponse, TransactionId,
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        messages: BTreeMap<String, String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server found the transaction but had no exchange rate for it.
    pub fn is_rate_unavailable(&self) -> bool {
        match self {
            ClientError::Api {
                status: 404,
                messages,
                ..
            } => messages
                .values()
                .any(|m| m.contains(RATE_UNAVAILABLE_MESSAGE)),
            _ => false,
        }
    }
}

/// Transactions API client.
pub struct TransactionsClient {
    base_url: String,
    http: Client,
}

impl TransactionsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetches the health report; a DOWN report is returned, not an error.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        match serde_json::from_str::<HealthResponse>(&body) {
            Ok(report) => Ok(report),
            Err(_) if !status.is_success() => Err(api_error(status.as_u16(), &body)),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores a purchase transaction.
    pub async fn create_transaction(
        &self,
        req: &CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, ClientError> {
        let resp = self
            .http
            .post(format!("{}/transaction", self.base_url))
            .json(req)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Retrieves a transaction converted to `currency` (USD when `None`).
    pub async fn get_converted_transaction(
        &self,
        id: TransactionId,
        currency: Option<&str>,
    ) -> Result<ConvertedTransactionResponse, ClientError> {
        let mut req = self
            .http
            .get(format!("{}/transaction/{}", self.base_url, id));
        if let Some(currency) = currency {
            req = req.query(&[("currency", currency)]);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), &body))
        }
    }
}

/// Builds an [`ClientError::Api`] from an error body, falling back to the raw text.
fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => {
            let message = if err.messages.is_empty() {
                err.error
            } else {
                err.messages
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            ClientError::Api {
                status,
                message,
                messages: err.messages,
            }
        }
        Err(_) => ClientError::Api {
            status,
            message: body.to_string(),
            messages: BTreeMap::new(),
        },
    }
}
