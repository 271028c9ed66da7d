//! Subscription domain model.
//!
//! # Responsibility
//! - Define the single record type persisted by the record store.
//! - Own amount-input parsing and record validation rules.
//!
//! # Invariants
//! - `id` is generated once and never reused for another record.
//! - `amount` is finite and non-negative.
//! - Decoding a record runs the same validation as construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one subscription record.
///
/// Only used for list identity; callers address records by position.
pub type SubscriptionId = Uuid;

/// One tracked recurring subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSubscription")]
pub struct Subscription {
    pub id: SubscriptionId,
    /// Display name. Empty names are accepted.
    pub name: String,
    /// Currency amount per renewal.
    pub amount: f64,
    /// Next renewal day. Time of day is not tracked.
    #[serde(rename = "renewalDate")]
    pub renewal_date: NaiveDate,
}

/// Validation failures for subscription records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubscriptionValidationError {
    NilId,
    NonFiniteAmount,
    NegativeAmount(f64),
}

impl Display for SubscriptionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "subscription id must not be nil"),
            Self::NonFiniteAmount => write!(f, "amount must be a finite number"),
            Self::NegativeAmount(value) => write!(f, "amount ({value}) must be >= 0"),
        }
    }
}

impl Error for SubscriptionValidationError {}

/// Why an amount input string was not accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountParseError {
    Empty,
    NotANumber(String),
    Invalid(SubscriptionValidationError),
}

impl Display for AmountParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "amount input is empty"),
            Self::NotANumber(input) => write!(f, "amount `{input}` is not a number"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AmountParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

/// Parses user-entered amount text.
///
/// The whole input must be a number; padding, thousands separators and
/// currency symbols are rejected, as are `NaN`, infinities and negative
/// values.
pub fn parse_amount(input: &str) -> Result<f64, AmountParseError> {
    if input.is_empty() {
        return Err(AmountParseError::Empty);
    }
    let value = input
        .parse::<f64>()
        .map_err(|_| AmountParseError::NotANumber(input.to_string()))?;
    validate_amount(value).map_err(AmountParseError::Invalid)?;
    Ok(value)
}

fn validate_amount(amount: f64) -> Result<(), SubscriptionValidationError> {
    if !amount.is_finite() {
        return Err(SubscriptionValidationError::NonFiniteAmount);
    }
    if amount < 0.0 {
        return Err(SubscriptionValidationError::NegativeAmount(amount));
    }
    Ok(())
}

impl Subscription {
    /// Creates a record with a freshly generated id.
    ///
    /// Does not validate `amount`; go through [`parse_amount`] for user input
    /// or call [`Subscription::validate`] before persisting.
    pub fn new(name: impl Into<String>, amount: f64, renewal_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            renewal_date,
        }
    }

    /// Creates a record with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: SubscriptionId,
        name: impl Into<String>,
        amount: f64,
        renewal_date: NaiveDate,
    ) -> Result<Self, SubscriptionValidationError> {
        let subscription = Self {
            id,
            name: name.into(),
            amount,
            renewal_date,
        };
        subscription.validate()?;
        Ok(subscription)
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), SubscriptionValidationError> {
        if self.id.is_nil() {
            return Err(SubscriptionValidationError::NilId);
        }
        validate_amount(self.amount)
    }
}

#[derive(Deserialize)]
struct RawSubscription {
    id: SubscriptionId,
    name: String,
    amount: f64,
    #[serde(rename = "renewalDate")]
    renewal_date: NaiveDate,
}

impl TryFrom<RawSubscription> for Subscription {
    type Error = SubscriptionValidationError;

    fn try_from(raw: RawSubscription) -> Result<Self, Self::Error> {
        Subscription::with_id(raw.id, raw.name, raw.amount, raw.renewal_date)
    }
}
