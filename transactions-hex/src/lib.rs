//! # Transactions Hex
//!
//! Application service layer and HTTP adapter for the transactions service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (validation, conversion, health)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served by the HTTP adapter
//!
//! The service is generic over `R: TransactionRepository` and
//! `X: ExchangeRateProvider`, allowing different adapters to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::TransactionService;
