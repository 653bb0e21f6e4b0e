//! # Transactions Types
//!
//! Domain types and port traits for the transaction service.
//! This crate has ZERO IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Transaction, CurrencyPair, ExchangeRateQuote)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CurrencyPair, ExchangeRateQuote, FieldErrors, NewTransaction, Transaction, TransactionId,
    ValidationPolicy, round_money,
};
pub use dto::*;
pub use error::{AppError, DomainError, ExchangeError, RepoError};
pub use ports::{ExchangeRateProvider, TransactionRepository};
