//! Final gate: field-level and cross-field checks on an assembled record.
//!
//! Checks run in a fixed order and stop at the first failure:
//! description, amount, currency, account, date, classification.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Field, ValidationError};
use crate::money::{Currency, round_half_up};
use crate::record::{CandidateRecord, FieldInput, ValidatedTransaction};
use crate::taxonomy::Taxonomy;

pub const MAX_EXPENSE_CATEGORIES: usize = 2;
pub const MAX_INCOME_CATEGORIES: usize = 1;

/// Accepted dates relative to "today", both ends inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub past_days: u32,
    pub future_days: u32,
}

impl Default for DateWindow {
    fn default() -> Self {
        Self {
            past_days: 366,
            future_days: 3,
        }
    }
}

impl DateWindow {
    /// Earliest and latest accepted dates. Bounds past the calendar range
    /// clamp to `NaiveDate::MIN`/`MAX`.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            today
                .checked_sub_days(Days::new(self.past_days.into()))
                .unwrap_or(NaiveDate::MIN),
            today
                .checked_add_days(Days::new(self.future_days.into()))
                .unwrap_or(NaiveDate::MAX),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    pub window: DateWindow,
}

impl RecordValidator {
    pub fn new(window: DateWindow) -> Self {
        Self { window }
    }

    /// Validate a record whose account and categories were already
    /// canonicalized and resolved.
    pub fn validate(
        &self,
        record: &CandidateRecord,
        taxonomy: &Taxonomy,
        today: NaiveDate,
    ) -> Result<ValidatedTransaction, ValidationError> {
        let description = check_description(record.description.as_deref())?;
        let amount = check_amount(record)?;
        let currency = check_currency(record.currency.as_deref())?;
        let account = check_account(record.account.as_ref(), taxonomy)?;
        let date = self.check_date(record.date.as_deref(), today)?;
        let (expense_categories, income_categories) = check_classification(record, taxonomy)?;

        Ok(ValidatedTransaction {
            description,
            amount,
            currency,
            account,
            date,
            expense_categories,
            income_categories,
            notes: record
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }

    fn check_date(&self, raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingField { field: Field::Date })?;
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ValidationError::MalformedField {
            field: Field::Date,
            value: raw.to_string(),
            reason: format!("expected YYYY-MM-DD: {e}"),
        })?;

        let (earliest, latest) = self.window.bounds(today);
        if date < earliest || date > latest {
            return Err(ValidationError::DateOutOfRange {
                date,
                earliest,
                latest,
            });
        }
        Ok(date)
    }
}

fn check_description(raw: Option<&str>) -> Result<String, ValidationError> {
    match raw.map(str::trim) {
        Some(d) if !d.is_empty() => Ok(d.to_string()),
        _ => Err(ValidationError::EmptyField {
            field: Field::Description,
        }),
    }
}

fn check_amount(record: &CandidateRecord) -> Result<Decimal, ValidationError> {
    let raw = record
        .amount
        .as_ref()
        .ok_or(ValidationError::MissingField { field: Field::Amount })?;
    let amount = raw.to_decimal().ok_or_else(|| ValidationError::MalformedField {
        field: Field::Amount,
        value: raw.display(),
        reason: "not a number".to_string(),
    })?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount { amount });
    }
    // Rounding can only reach zero from below 0.005.
    let rounded = round_half_up(amount);
    if rounded <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount { amount: rounded });
    }
    Ok(rounded)
}

fn check_currency(raw: Option<&str>) -> Result<Currency, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Currency::default()),
        Some(code) => Currency::parse(code).ok_or_else(|| ValidationError::UnsupportedCurrency {
            currency: code.to_string(),
            allowed: Currency::allowed_codes(),
        }),
    }
}

fn check_account(raw: Option<&FieldInput>, taxonomy: &Taxonomy) -> Result<String, ValidationError> {
    let account = raw
        .map(FieldInput::display)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField { field: Field::Account })?;
    if !taxonomy.has_account(&account) {
        return Err(ValidationError::UnsupportedAccount {
            account,
            allowed: taxonomy.accounts.clone(),
        });
    }
    Ok(account)
}

type Classification = (Option<Vec<String>>, Option<Vec<String>>);

fn check_classification(record: &CandidateRecord, taxonomy: &Taxonomy) -> Result<Classification, ValidationError> {
    let expense = distinct(record.expense_categories.as_ref());
    let income = distinct(record.income_categories.as_ref());

    if !expense.is_empty() && !income.is_empty() {
        return Err(ValidationError::AmbiguousClassification { expense, income });
    }
    if expense.is_empty() && income.is_empty() {
        return Err(ValidationError::MissingClassification);
    }

    check_members(
        &expense,
        Field::ExpenseCategories,
        &taxonomy.expense_categories,
        MAX_EXPENSE_CATEGORIES,
    )?;
    check_members(
        &income,
        Field::IncomeCategories,
        &taxonomy.income_categories,
        MAX_INCOME_CATEGORIES,
    )?;

    let some = |v: Vec<String>| if v.is_empty() { None } else { Some(v) };
    Ok((some(expense), some(income)))
}

fn check_members(values: &[String], field: Field, allowed: &[String], max: usize) -> Result<(), ValidationError> {
    let unknown: Vec<String> = values.iter().filter(|v| !allowed.contains(v)).cloned().collect();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownValue {
            field,
            values: unknown,
            allowed: allowed.to_vec(),
        });
    }
    if values.len() > max {
        return Err(ValidationError::TooManyCategories {
            field,
            count: values.len(),
            max,
        });
    }
    Ok(())
}

fn distinct(input: Option<&FieldInput>) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .map(FieldInput::tokens)
        .unwrap_or_default()
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawAmount;
    use chrono::Duration;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(["Cash"], ["Groceries", "Dining", "Food"], ["Salary"])
    }

    fn record() -> CandidateRecord {
        CandidateRecord {
            description: Some(" bought bread ".into()),
            amount: Some(RawAmount::Text("12.999".into())),
            currency: Some("EUR".into()),
            account: Some("Cash".into()),
            date: Some("2026-10-16".into()),
            expense_categories: Some(FieldInput::List(vec!["Groceries".into()])),
            income_categories: None,
            notes: Some("  ".into()),
        }
    }

    fn validate(rec: &CandidateRecord) -> Result<ValidatedTransaction, ValidationError> {
        RecordValidator::default().validate(rec, &taxonomy(), today())
    }

    fn with_date(d: NaiveDate) -> CandidateRecord {
        CandidateRecord {
            date: Some(d.format("%Y-%m-%d").to_string()),
            ..record()
        }
    }

    #[test]
    fn test_valid_record() {
        let tx = validate(&record()).unwrap();
        assert_eq!(tx.description, "bought bread");
        assert_eq!(tx.amount.to_string(), "13.00");
        assert_eq!(tx.currency, Currency::Eur);
        assert_eq!(tx.expense_categories, Some(vec!["Groceries".to_string()]));
        assert_eq!(tx.income_categories, None);
        assert_eq!(tx.notes, None);
    }

    #[test]
    fn test_blank_description() {
        let rec = CandidateRecord {
            description: Some("   ".into()),
            ..record()
        };
        assert_eq!(
            validate(&rec),
            Err(ValidationError::EmptyField {
                field: Field::Description
            })
        );
    }

    #[test]
    fn test_non_positive_amount() {
        for raw in ["0", "-5"] {
            let rec = CandidateRecord {
                amount: Some(RawAmount::Text(raw.into())),
                ..record()
            };
            assert!(matches!(validate(&rec), Err(ValidationError::NonPositiveAmount { .. })));
        }
        let rec = CandidateRecord {
            amount: Some(RawAmount::Text("0.004".into())),
            ..record()
        };
        assert!(matches!(validate(&rec), Err(ValidationError::NonPositiveAmount { .. })));
    }

    #[test]
    fn test_half_up_rounding() {
        let rec = CandidateRecord {
            amount: Some(RawAmount::Text("1.005".into())),
            ..record()
        };
        assert_eq!(validate(&rec).unwrap().amount, Decimal::from_str("1.01").unwrap());
    }

    #[test]
    fn test_amount_missing_or_malformed() {
        let rec = CandidateRecord {
            amount: None,
            ..record()
        };
        assert_eq!(
            validate(&rec),
            Err(ValidationError::MissingField { field: Field::Amount })
        );
        let rec = CandidateRecord {
            amount: Some(RawAmount::Text("tanti".into())),
            ..record()
        };
        assert!(matches!(
            validate(&rec),
            Err(ValidationError::MalformedField { field: Field::Amount, .. })
        ));
    }

    #[test]
    fn test_currency() {
        let rec = CandidateRecord {
            currency: Some("usd".into()),
            ..record()
        };
        assert!(matches!(
            validate(&rec),
            Err(ValidationError::UnsupportedCurrency { ref currency, .. }) if currency == "usd"
        ));
        let rec = CandidateRecord {
            currency: None,
            ..record()
        };
        assert_eq!(validate(&rec).unwrap().currency, Currency::Eur);
    }

    #[test]
    fn test_unsupported_account() {
        let rec = CandidateRecord {
            account: Some("Bank".into()),
            ..record()
        };
        assert_eq!(
            validate(&rec),
            Err(ValidationError::UnsupportedAccount {
                account: "Bank".into(),
                allowed: vec!["Cash".into()],
            })
        );
    }

    #[test]
    fn test_date_window_boundaries() {
        let t = today();
        assert!(validate(&with_date(t + Duration::days(3))).is_ok());
        assert!(matches!(
            validate(&with_date(t + Duration::days(4))),
            Err(ValidationError::DateOutOfRange { .. })
        ));
        assert!(validate(&with_date(t - Duration::days(366))).is_ok());
        assert!(matches!(
            validate(&with_date(t - Duration::days(367))),
            Err(ValidationError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_malformed_date() {
        let rec = CandidateRecord {
            date: Some("16/10/2026".into()),
            ..record()
        };
        assert!(matches!(
            validate(&rec),
            Err(ValidationError::MalformedField { field: Field::Date, .. })
        ));
    }

    #[test]
    fn test_classification_rules() {
        let both = CandidateRecord {
            income_categories: Some("Salary".into()),
            ..record()
        };
        assert!(matches!(
            validate(&both),
            Err(ValidationError::AmbiguousClassification { .. })
        ));

        let neither = CandidateRecord {
            expense_categories: None,
            ..record()
        };
        assert_eq!(validate(&neither), Err(ValidationError::MissingClassification));

        let three = CandidateRecord {
            expense_categories: Some("Groceries, Dining, Food".into()),
            ..record()
        };
        assert_eq!(
            validate(&three),
            Err(ValidationError::TooManyCategories {
                field: Field::ExpenseCategories,
                count: 3,
                max: 2,
            })
        );

        let pair = CandidateRecord {
            expense_categories: Some("Food, Dining, Food".into()),
            ..record()
        };
        assert_eq!(
            validate(&pair).unwrap().expense_categories,
            Some(vec!["Food".to_string(), "Dining".to_string()])
        );
    }

    #[test]
    fn test_checks_run_in_order() {
        // Every field is wrong; the description is reported first.
        let rec = CandidateRecord {
            description: None,
            amount: Some(RawAmount::Text("-1".into())),
            currency: Some("USD".into()),
            account: Some("Bank".into()),
            date: Some("1999-01-01".into()),
            expense_categories: None,
            income_categories: None,
            notes: None,
        };
        assert_eq!(
            validate(&rec),
            Err(ValidationError::EmptyField {
                field: Field::Description
            })
        );
        let rec = CandidateRecord {
            description: Some("x".into()),
            ..rec
        };
        assert!(matches!(validate(&rec), Err(ValidationError::NonPositiveAmount { .. })));

        let rec = CandidateRecord {
            amount: Some(RawAmount::Text("5".into())),
            ..rec
        };
        assert!(matches!(validate(&rec), Err(ValidationError::UnsupportedCurrency { .. })));

        let rec = CandidateRecord {
            currency: Some("EUR".into()),
            ..rec
        };
        assert!(matches!(validate(&rec), Err(ValidationError::UnsupportedAccount { .. })));

        let rec = CandidateRecord {
            account: Some("Cash".into()),
            ..rec
        };
        assert!(matches!(validate(&rec), Err(ValidationError::DateOutOfRange { .. })));

        let rec = CandidateRecord {
            date: Some("2026-10-16".into()),
            ..rec
        };
        assert_eq!(validate(&rec), Err(ValidationError::MissingClassification));

        let rec = CandidateRecord {
            expense_categories: Some("Groceries".into()),
            ..rec
        };
        assert!(validate(&rec).is_ok());
    }

    #[test]
    fn test_huge_window_clamps_instead_of_overflowing() {
        let window = DateWindow {
            past_days: u32::MAX,
            future_days: u32::MAX,
        };
        assert_eq!(window.bounds(today()), (NaiveDate::MIN, NaiveDate::MAX));

        let validator = RecordValidator::new(window);
        let rec = with_date(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        assert!(validator.validate(&rec, &taxonomy(), today()).is_ok());
    }

    #[test]
    fn test_zero_window_accepts_only_today() {
        let validator = RecordValidator::new(DateWindow {
            past_days: 0,
            future_days: 0,
        });
        assert!(validator.validate(&record(), &taxonomy(), today()).is_ok());
        let yesterday = with_date(today() - Duration::days(1));
        assert!(matches!(
            validator.validate(&yesterday, &taxonomy(), today()),
            Err(ValidationError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_taxonomy_rejects_account() {
        let empty = Taxonomy::default();
        let err = RecordValidator::default().validate(&record(), &empty, today()).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedAccount { .. }));
    }
}
