// 🧾 Expense Model - records, wire shapes, and validation rules
//
// An Expense is created once (add), read many times, and deleted by id.
// It is never edited in place, so validation only runs at creation.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// EXPENSE RECORD
// ============================================================================

/// A stored expense. `id` is assigned by storage and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// An expense that has not been saved yet.
///
/// `date` is `None` when the client did not send one; storage stamps the
/// current time in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub date: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(name: &str, category: &str, amount: f64, date: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            amount,
            date,
        }
    }

    /// Attach a storage identity, filling in the date if none was given.
    pub fn into_expense(self, id: String, now: DateTime<Utc>) -> Expense {
        Expense {
            id,
            name: self.name,
            category: self.category,
            amount: self.amount,
            date: self.date.unwrap_or(now),
        }
    }

    /// Field-level rules that do not depend on configuration.
    ///
    /// Category membership is checked by `Config::validate`, which calls this
    /// first.
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if !self.amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if self.amount < 0.0 {
            return Err(ValidationError::NegativeAmount(self.amount));
        }
        if let Some(date) = self.date {
            if !STORABLE_YEARS.contains(&date.year()) {
                return Err(ValidationError::DateOutOfRange(date.year()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Why an expense was rejected. The Display text is sent to the client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("expense name is required")]
    MissingName,

    #[error("category is required")]
    MissingCategory,

    #[error("amount must be a finite number")]
    NonFiniteAmount,

    #[error("amount must not be negative")]
    NegativeAmount(f64),

    #[error("category '{0}' is not configured")]
    UnknownCategory(String),

    #[error("date year {0} is outside 0000-9999")]
    DateOutOfRange(i32),
}

/// Years that RFC 3339 can represent once the date is in UTC
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

// ============================================================================
// WIRE SHAPES
// ============================================================================

/// Body of an add-expense request.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
}

// Missing and null text fields both reach the validator as ""
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ExpenseRequest {
    /// Normalize the request into an unsaved expense.
    ///
    /// A present date is converted to UTC. The zero instant
    /// (`0001-01-01T00:00:00Z`) counts as absent.
    pub fn into_new_expense(self) -> NewExpense {
        let date = self
            .date
            .map(|d| d.with_timezone(&Utc))
            .filter(|d| !is_zero_instant(d));

        NewExpense {
            name: self.name,
            category: self.category,
            amount: self.amount,
            date,
        }
    }
}

fn is_zero_instant(date: &DateTime<Utc>) -> bool {
    date.timestamp() == ZERO_INSTANT_SECS && date.timestamp_subsec_nanos() == 0
}

/// Seconds from the Unix epoch to 0001-01-01T00:00:00Z.
const ZERO_INSTANT_SECS: i64 = -62_135_596_800;
