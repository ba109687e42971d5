//! Runtime-mutable taxonomy of accounts and categories.
//!
//! The store hands out immutable [`Taxonomy`] snapshots. Replacement swaps
//! all three sets at once, so a reader never sees accounts from one load
//! next to categories from another. Components hold an `Arc<TaxonomyStore>`
//! built before the first load; they observe every later `replace` without
//! re-acquiring anything.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::info;

/// One immutable taxonomy load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxonomy {
    /// 0 for the empty startup taxonomy, then increments on every replace
    pub version: u64,
    pub accounts: Vec<String>,
    pub expense_categories: Vec<String>,
    pub income_categories: Vec<String>,
}

impl Taxonomy {
    /// Build a snapshot, trimming entries and dropping blanks and duplicates
    /// (first occurrence wins).
    pub fn new<A, E, I>(accounts: A, expense_categories: E, income_categories: I) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            version: 0,
            accounts: clean_set(accounts),
            expense_categories: clean_set(expense_categories),
            income_categories: clean_set(income_categories),
        }
    }

    /// True only when all three sets are non-empty.
    pub fn is_loaded(&self) -> bool {
        !self.accounts.is_empty()
            && !self.expense_categories.is_empty()
            && !self.income_categories.is_empty()
    }

    pub fn has_account(&self, name: &str) -> bool {
        self.accounts.iter().any(|a| a == name)
    }

    pub fn has_expense_category(&self, name: &str) -> bool {
        self.expense_categories.iter().any(|c| c == name)
    }

    pub fn has_income_category(&self, name: &str) -> bool {
        self.income_categories.iter().any(|c| c == name)
    }
}

fn clean_set<T>(items: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Shared, swappable holder of the current taxonomy.
#[derive(Debug, Default)]
pub struct TaxonomyStore {
    current: RwLock<Arc<Taxonomy>>,
    version: AtomicU64,
}

impl TaxonomyStore {
    /// An empty store: nothing is valid until the first `replace`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<Taxonomy> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Atomically replace all three sets. Returns the new version.
    pub fn replace<A, E, I>(&self, accounts: A, expense_categories: E, income_categories: I) -> u64
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.install(Taxonomy::new(accounts, expense_categories, income_categories))
    }

    /// Install a prepared snapshot; its version is overwritten by the store.
    pub fn install(&self, mut taxonomy: Taxonomy) -> u64 {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        taxonomy.version = version;
        info!(
            version,
            accounts = taxonomy.accounts.len(),
            expense = taxonomy.expense_categories.len(),
            income = taxonomy.income_categories.len(),
            "taxonomy replaced"
        );
        *guard = Arc::new(taxonomy);
        version
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_loaded()
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version
    }
}
