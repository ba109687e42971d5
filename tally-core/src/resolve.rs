//! Expense/income mutual exclusivity.
//!
//! [`XorResolver::resolve`] is a total function over four cases:
//!
//! 1. expense only -> expense passes through
//! 2. income only -> income passes through
//! 3. both -> the description decides; income, then expense; on a tie
//!    the policy's `tie_break` side wins
//! 4. neither -> keyword inference, expense first, then income, then the
//!    optional fallback expense category
//!
//! Inputs are always intersected with the currently allowed sets first.

use serde::{Deserialize, Serialize};

use crate::classifier::{infer_expense_category, infer_income_category, looks_like_income};
use crate::lexicon::KeywordRules;

/// Which side wins when both are populated and the text gives no hint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    #[default]
    Income,
    Expense,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvePolicy {
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Degraded-mode acceptance: expense category used when nothing else
    /// can be determined and the text does not look like income.
    #[serde(default)]
    pub fallback_expense: Option<String>,
}

/// Why the resolver produced its output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionBasis {
    ExpenseOnly,
    IncomeOnly,
    TextSuggestsIncome,
    TextSuggestsExpense,
    TieBreak,
    InferredExpense,
    InferredIncome,
    Fallback,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub expense: Option<Vec<String>>,
    pub income: Option<Vec<String>>,
    pub basis: ResolutionBasis,
}

impl Resolution {
    fn expense(values: Vec<String>, basis: ResolutionBasis) -> Self {
        Self {
            expense: Some(values),
            income: None,
            basis,
        }
    }

    fn income(values: Vec<String>, basis: ResolutionBasis) -> Self {
        Self {
            expense: None,
            income: Some(values),
            basis,
        }
    }

    fn unresolved() -> Self {
        Self {
            expense: None,
            income: None,
            basis: ResolutionBasis::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.expense.is_some() || self.income.is_some()
    }

    pub fn into_pair(self) -> (Option<Vec<String>>, Option<Vec<String>>) {
        (self.expense, self.income)
    }
}

#[derive(Debug, Clone)]
pub struct XorResolver<'a> {
    rules: &'a KeywordRules,
    policy: &'a ResolvePolicy,
}

impl<'a> XorResolver<'a> {
    pub fn new(rules: &'a KeywordRules, policy: &'a ResolvePolicy) -> Self {
        Self { rules, policy }
    }

    pub fn resolve(
        &self,
        description: &str,
        expense_in: Option<&[String]>,
        income_in: Option<&[String]>,
        allowed_expense: &[String],
        allowed_income: &[String],
    ) -> Resolution {
        let expense = keep_allowed(expense_in, allowed_expense);
        let income = keep_allowed(income_in, allowed_income);

        match (expense.is_empty(), income.is_empty()) {
            (false, true) => Resolution::expense(expense, ResolutionBasis::ExpenseOnly),
            (true, false) => Resolution::income(income, ResolutionBasis::IncomeOnly),
            (false, false) => {
                if infer_income_category(description, allowed_income, self.rules).is_some() {
                    Resolution::income(income, ResolutionBasis::TextSuggestsIncome)
                } else if infer_expense_category(description, allowed_expense, self.rules).is_some() {
                    Resolution::expense(expense, ResolutionBasis::TextSuggestsExpense)
                } else {
                    match self.policy.tie_break {
                        TieBreak::Income => Resolution::income(income, ResolutionBasis::TieBreak),
                        TieBreak::Expense => Resolution::expense(expense, ResolutionBasis::TieBreak),
                    }
                }
            }
            (true, true) => self.infer(description, allowed_expense, allowed_income),
        }
    }

    fn infer(&self, description: &str, allowed_expense: &[String], allowed_income: &[String]) -> Resolution {
        if let Some(cat) = infer_expense_category(description, allowed_expense, self.rules) {
            return Resolution::expense(vec![cat], ResolutionBasis::InferredExpense);
        }
        if let Some(cat) = infer_income_category(description, allowed_income, self.rules) {
            return Resolution::income(vec![cat], ResolutionBasis::InferredIncome);
        }

        let fallback = self
            .policy
            .fallback_expense
            .as_deref()
            .filter(|f| allowed_expense.iter().any(|c| c == f));
        match fallback {
            Some(f) if !looks_like_income(description, self.rules) => {
                Resolution::expense(vec![f.to_string()], ResolutionBasis::Fallback)
            }
            _ => Resolution::unresolved(),
        }
    }
}

/// Free-function form of [`XorResolver::resolve`] returning the bare pair.
pub fn resolve(
    description: &str,
    expense_in: Option<&[String]>,
    income_in: Option<&[String]>,
    allowed_expense: &[String],
    allowed_income: &[String],
    rules: &KeywordRules,
    policy: &ResolvePolicy,
) -> (Option<Vec<String>>, Option<Vec<String>>) {
    XorResolver::new(rules, policy)
        .resolve(description, expense_in, income_in, allowed_expense, allowed_income)
        .into_pair()
}

fn keep_allowed(values: Option<&[String]>, allowed: &[String]) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .filter(|v| allowed.contains(v))
        .cloned()
        .collect()
}
