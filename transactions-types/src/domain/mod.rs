//! Domain models for the transaction service.

pub mod currency;
pub mod money;
pub mod rate;
pub mod transaction;
pub mod validation;

pub use currency::CurrencyPair;
pub use money::round_money;
pub use rate::ExchangeRateQuote;
pub use transaction::{NewTransaction, Transaction, TransactionId};
pub use validation::{FieldErrors, ValidationPolicy};
