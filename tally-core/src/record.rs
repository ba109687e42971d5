//! Candidate records (untrusted extractor output) and validated transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{Currency, parse_amount};

/// A field that may arrive as a single string, a comma-separated string,
/// or a list of strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldInput {
    Text(String),
    List(Vec<String>),
}

impl FieldInput {
    /// Non-empty trimmed tokens. Text is split on commas; list items are
    /// taken as-is.
    pub fn tokens(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            FieldInput::Text(s) => s.split(',').collect(),
            FieldInput::List(items) => items.iter().map(|s| s.as_str()).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The input as one display string, for error payloads.
    pub fn display(&self) -> String {
        match self {
            FieldInput::Text(s) => s.trim().to_string(),
            FieldInput::List(items) => items
                .iter()
                .map(|s| s.trim())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Text(s.to_string())
    }
}

impl From<Vec<String>> for FieldInput {
    fn from(items: Vec<String>) -> Self {
        FieldInput::List(items)
    }
}

/// Amount as sent by the extractor: usually a JSON number, sometimes text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawAmount::Number(n) => parse_amount(&n.to_string()),
            RawAmount::Text(s) => parse_amount(s),
        }
    }

    pub fn display(&self) -> String {
        match self {
            RawAmount::Number(n) => n.to_string(),
            RawAmount::Text(s) => s.clone(),
        }
    }
}

/// Loosely-typed record produced upstream. No invariants hold yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateRecord {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub account: Option<FieldInput>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "outcome_categories")]
    pub expense_categories: Option<FieldInput>,
    #[serde(default)]
    pub income_categories: Option<FieldInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CandidateRecord {
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

/// A transaction that passed every check. Exactly one of the category
/// lists is populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatedTransaction {
    pub description: String,
    /// Positive, exactly two fractional digits
    pub amount: Decimal,
    pub currency: Currency,
    pub account: String,
    pub date: NaiveDate,
    /// 0-2 entries, [macro, specific] when two
    pub expense_categories: Option<Vec<String>>,
    /// 0-1 entries
    pub income_categories: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl ValidatedTransaction {
    pub fn kind(&self) -> TransactionKind {
        if self.income_categories.as_ref().is_some_and(|c| !c.is_empty()) {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }

    /// Whichever category list is populated.
    pub fn categories(&self) -> &[String] {
        self.expense_categories
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.income_categories.as_deref())
            .unwrap_or(&[])
    }

    /// Most specific category: the last entry of the populated list.
    pub fn primary_category(&self) -> Option<&str> {
        self.categories().last().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_field_input_tokens() {
        assert_eq!(FieldInput::from(" Food , ,Fun ").tokens(), vec!["Food", "Fun"]);
        let list = FieldInput::List(vec![" Food ".into(), "".into(), "A, B".into()]);
        assert_eq!(list.tokens(), vec!["Food", "A, B"]);
        assert_eq!(list.display(), "Food, , A, B");
    }

    #[test]
    fn test_candidate_from_loose_json() {
        let rec = CandidateRecord::from_value(json!({
            "description": "caffe",
            "amount": 1.2,
            "account": "Hype",
            "date": "2026-10-16",
            "outcome_categories": ["Eating Out and Takeway"],
            "income_categories": null,
        }))
        .unwrap();
        assert_eq!(rec.amount.unwrap().to_decimal(), Some(Decimal::from_str("1.2").unwrap()));
        assert_eq!(
            rec.expense_categories,
            Some(FieldInput::List(vec!["Eating Out and Takeway".into()]))
        );
        assert_eq!(rec.income_categories, None);
        assert_eq!(rec.currency, None);
    }

    #[test]
    fn test_amount_as_text() {
        let rec = CandidateRecord::from_value(json!({ "amount": "3,40" })).unwrap();
        assert_eq!(rec.amount.unwrap().to_decimal(), Some(Decimal::from_str("3.40").unwrap()));
    }

    #[test]
    fn test_kind_and_categories() {
        let tx = ValidatedTransaction {
            description: "stipendio".into(),
            amount: Decimal::from_str("1820.00").unwrap(),
            currency: Currency::Eur,
            account: "Revolut".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            expense_categories: None,
            income_categories: Some(vec!["Salary".into()]),
            notes: None,
        };
        assert_eq!(tx.kind(), TransactionKind::Income);
        assert_eq!(tx.categories(), &["Salary".to_string()]);
        assert_eq!(tx.primary_category(), Some("Salary"));

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["amount"], json!("1820.00"));
        assert_eq!(value["currency"], json!("EUR"));
        assert_eq!(value["date"], json!("2026-10-01"));
    }
}
