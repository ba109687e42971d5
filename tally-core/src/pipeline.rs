//! End-to-end normalization of one candidate record.
//!
//! canonicalize (account, categories) -> resolve (fills gaps, enforces
//! expense/income exclusivity) -> validate. The taxonomy is read once per
//! call; nothing here blocks or performs I/O.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::canonicalize::{UnknownTokens, canonicalize_account, canonicalize_field};
use crate::error::{Field, ValidationError};
use crate::lexicon::Lexicon;
use crate::record::{CandidateRecord, FieldInput, ValidatedTransaction};
use crate::resolve::{ResolutionBasis, ResolvePolicy, XorResolver};
use crate::taxonomy::TaxonomyStore;
use crate::validate::{DateWindow, RecordValidator};

/// A validated transaction plus how its classification was reached.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Normalized {
    pub transaction: ValidatedTransaction,
    pub basis: ResolutionBasis,
    pub taxonomy_version: u64,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    store: Arc<TaxonomyStore>,
    lexicon: Lexicon,
    policy: ResolvePolicy,
    validator: RecordValidator,
}

impl Normalizer {
    pub fn new(store: Arc<TaxonomyStore>) -> Self {
        Self {
            store,
            lexicon: Lexicon::default(),
            policy: ResolvePolicy::default(),
            validator: RecordValidator::default(),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_window(mut self, window: DateWindow) -> Self {
        self.validator = RecordValidator::new(window);
        self
    }

    pub fn store(&self) -> &Arc<TaxonomyStore> {
        &self.store
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn policy(&self) -> &ResolvePolicy {
        &self.policy
    }

    pub fn normalize(&self, candidate: &CandidateRecord, today: NaiveDate) -> Result<Normalized, ValidationError> {
        let taxonomy = self.store.snapshot();
        if !taxonomy.is_loaded() {
            warn!(version = taxonomy.version, "normalizing against an incomplete taxonomy");
        }

        let account = canonicalize_account(
            candidate.account.as_ref(),
            &taxonomy.accounts,
            &self.lexicon.account_synonyms,
        );
        let expense = canonicalize_field(
            candidate.expense_categories.as_ref(),
            &taxonomy.expense_categories,
            &self.lexicon.expense_synonyms,
        )
        .map_err(|u| unknown(Field::ExpenseCategories, u, &taxonomy.expense_categories))?;
        let income = canonicalize_field(
            candidate.income_categories.as_ref(),
            &taxonomy.income_categories,
            &self.lexicon.income_synonyms,
        )
        .map_err(|u| unknown(Field::IncomeCategories, u, &taxonomy.income_categories))?;

        let description = candidate.description.as_deref().unwrap_or_default().trim();
        let resolution = XorResolver::new(&self.lexicon.rules, &self.policy).resolve(
            description,
            expense.as_deref(),
            income.as_deref(),
            &taxonomy.expense_categories,
            &taxonomy.income_categories,
        );
        debug!(
            basis = ?resolution.basis,
            expense = ?resolution.expense,
            income = ?resolution.income,
            "classification resolved"
        );

        let basis = resolution.basis;
        let assembled = CandidateRecord {
            account: account.map(FieldInput::Text),
            expense_categories: resolution.expense.map(FieldInput::List),
            income_categories: resolution.income.map(FieldInput::List),
            ..candidate.clone()
        };
        let transaction = self.validator.validate(&assembled, &taxonomy, today)?;

        Ok(Normalized {
            transaction,
            basis,
            taxonomy_version: taxonomy.version,
        })
    }
}

fn unknown(field: Field, tokens: UnknownTokens, allowed: &[String]) -> ValidationError {
    ValidationError::UnknownValue {
        field,
        values: tokens.0,
        allowed: allowed.to_vec(),
    }
}
