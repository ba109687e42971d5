//! Typed rejections produced by the normalization pipeline.
//!
//! Every variant is local to one field (or one cross-field rule) and carries
//! enough detail for a presentation layer to render a specific hint.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Candidate record fields a rejection can point at, named as they appear
/// on the wire. `notes` is free text and never rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Description,
    Amount,
    Currency,
    Account,
    Date,
    ExpenseCategories,
    IncomeCategories,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Currency => "currency",
            Field::Account => "account",
            Field::Date => "date",
            Field::ExpenseCategories => "expense_categories",
            Field::IncomeCategories => "income_categories",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable discriminant of a [`ValidationError`], for callers that branch on
/// the kind of failure rather than its payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyField,
    MissingField,
    MalformedField,
    UnknownValue,
    NonPositiveAmount,
    UnsupportedCurrency,
    UnsupportedAccount,
    DateOutOfRange,
    TooManyCategories,
    AmbiguousClassification,
    MissingClassification,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: Field },

    #[error("{field} is required")]
    MissingField { field: Field },

    #[error("{field} is malformed ({value:?}): {reason}")]
    MalformedField {
        field: Field,
        value: String,
        reason: String,
    },

    #[error("unknown {field} value(s): {}", values.join(", "))]
    UnknownValue {
        field: Field,
        values: Vec<String>,
        allowed: Vec<String>,
    },

    #[error("amount must be > 0 (got {amount})")]
    NonPositiveAmount { amount: Decimal },

    #[error("unsupported currency: {currency}")]
    UnsupportedCurrency {
        currency: String,
        allowed: Vec<String>,
    },

    #[error("unsupported account: {account}")]
    UnsupportedAccount {
        account: String,
        allowed: Vec<String>,
    },

    #[error("date {date} outside {earliest}..={latest}")]
    DateOutOfRange {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },

    #[error("{field} allows at most {max} value(s), got {count}")]
    TooManyCategories {
        field: Field,
        count: usize,
        max: usize,
    },

    #[error("a transaction cannot be both expense ({}) and income ({})", expense.join(", "), income.join(", "))]
    AmbiguousClassification {
        expense: Vec<String>,
        income: Vec<String>,
    },

    #[error("provide at least one of expense_categories or income_categories")]
    MissingClassification,
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::EmptyField { .. } => ErrorKind::EmptyField,
            ValidationError::MissingField { .. } => ErrorKind::MissingField,
            ValidationError::MalformedField { .. } => ErrorKind::MalformedField,
            ValidationError::UnknownValue { .. } => ErrorKind::UnknownValue,
            ValidationError::NonPositiveAmount { .. } => ErrorKind::NonPositiveAmount,
            ValidationError::UnsupportedCurrency { .. } => ErrorKind::UnsupportedCurrency,
            ValidationError::UnsupportedAccount { .. } => ErrorKind::UnsupportedAccount,
            ValidationError::DateOutOfRange { .. } => ErrorKind::DateOutOfRange,
            ValidationError::TooManyCategories { .. } => ErrorKind::TooManyCategories,
            ValidationError::AmbiguousClassification { .. } => ErrorKind::AmbiguousClassification,
            ValidationError::MissingClassification => ErrorKind::MissingClassification,
        }
    }

    /// The field the failure is attached to. Cross-field classification
    /// failures have none.
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::MissingField { field }
            | ValidationError::MalformedField { field, .. }
            | ValidationError::UnknownValue { field, .. }
            | ValidationError::TooManyCategories { field, .. } => Some(*field),
            ValidationError::NonPositiveAmount { .. } => Some(Field::Amount),
            ValidationError::UnsupportedCurrency { .. } => Some(Field::Currency),
            ValidationError::UnsupportedAccount { .. } => Some(Field::Account),
            ValidationError::DateOutOfRange { .. } => Some(Field::Date),
            ValidationError::AmbiguousClassification { .. }
            | ValidationError::MissingClassification => None,
        }
    }

    /// Allowed-set summary, when the failure is a taxonomy mismatch.
    pub fn allowed(&self) -> Option<&[String]> {
        match self {
            ValidationError::UnknownValue { allowed, .. }
            | ValidationError::UnsupportedCurrency { allowed, .. }
            | ValidationError::UnsupportedAccount { allowed, .. } => Some(allowed),
            _ => None,
        }
    }
}
