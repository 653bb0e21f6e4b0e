//! Field-level validation for incoming transactions.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum length of a transaction description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 50;

pub(crate) const MSG_BLANK: &str = "must not be blank";
pub(crate) const MSG_NULL: &str = "must not be null";
pub(crate) const MSG_SIZE: &str = "size must be between 0 and 50";
pub(crate) const MSG_FUTURE: &str = "must be a date in the past or in the present";
pub(crate) const MSG_DATE_FORMAT: &str = "must be a valid date in YYYY-MM-DD format";
pub(crate) const MSG_POSITIVE: &str = "must be greater than 0";

/// Parses a strict `YYYY-MM-DD` date; unpadded months or days are rejected.
pub(crate) fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Validation failures keyed by the JSON field name.
///
/// Every failing field is reported, not only the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`. The first error for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Date rules applied when a transaction is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Dates after this day are rejected.
    pub today: NaiveDate,
    /// When set, dates older than `today - retention_days` are rejected.
    pub retention_days: Option<u32>,
}

impl ValidationPolicy {
    /// Policy anchored at the current UTC date.
    pub fn current(retention_days: Option<u32>) -> Self {
        Self {
            today: Utc::now().date_naive(),
            retention_days,
        }
    }

    /// Policy anchored at a fixed date (tests, replays).
    pub fn at(today: NaiveDate) -> Self {
        Self {
            today,
            retention_days: None,
        }
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = Some(days);
        self
    }

    pub(crate) fn check_description(&self, description: &str, errors: &mut FieldErrors) {
        if description.trim().is_empty() {
            errors.add("description", MSG_BLANK);
        } else if description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.add("description", MSG_SIZE);
        }
    }

    pub(crate) fn check_date(&self, date: NaiveDate, errors: &mut FieldErrors) {
        if date > self.today {
            errors.add("transactionDate", MSG_FUTURE);
            return;
        }
        if let Some(days) = self.retention_days {
            // A window reaching past the calendar start has no lower bound.
            let oldest = self.today.checked_sub_days(Days::new(u64::from(days)));
            if oldest.is_some_and(|oldest| date < oldest) {
                errors.add(
                    "transactionDate",
                    format!("must be within the last {} days", days),
                );
            }
        }
    }

    pub(crate) fn check_amount(&self, rounded: Decimal, errors: &mut FieldErrors) {
        if rounded <= Decimal::ZERO {
            errors.add("purchaseAmount", MSG_POSITIVE);
        }
    }
}
