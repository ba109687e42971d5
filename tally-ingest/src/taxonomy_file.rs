//! Taxonomy source file: the three allowed sets plus an optional lexicon.
//!
//! ```toml
//! accounts = ["Hype", "Revolut", "Contanti"]
//! expense_categories = ["Supermarket", "Benzina"]
//! income_categories = ["Salary"]
//!
//! [lexicon]
//! version = "2026-10"
//! [lexicon.account_synonyms]
//! cash = "Contanti"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tally_core::{Lexicon, TaxonomyStore};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomySource {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default, alias = "outcome_categories")]
    pub expense_categories: Vec<String>,
    #[serde(default)]
    pub income_categories: Vec<String>,
    /// Absent means the built-in vocabulary.
    #[serde(default)]
    pub lexicon: Option<Lexicon>,
}

impl TaxonomySource {
    /// Swap this source's sets into `store`. Returns the new version.
    pub fn install(&self, store: &TaxonomyStore) -> u64 {
        store.replace(&self.accounts, &self.expense_categories, &self.income_categories)
    }

    pub fn lexicon(&self) -> Lexicon {
        self.lexicon.clone().unwrap_or_default()
    }
}

pub fn parse_taxonomy_toml(s: &str) -> Result<TaxonomySource> {
    toml::from_str(s).context("parse taxonomy file")
}

pub fn load_taxonomy_file(path: impl AsRef<Path>) -> Result<TaxonomySource> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let source = parse_taxonomy_toml(&s).with_context(|| format!("in {}", path.display()))?;
    info!(
        path = %path.display(),
        accounts = source.accounts.len(),
        expense = source.expense_categories.len(),
        income = source.income_categories.len(),
        lexicon = source.lexicon.as_ref().map(|l| l.version.as_str()).unwrap_or("builtin"),
        "taxonomy file loaded"
    );
    Ok(source)
}

/// Starter file written by `tally config init`.
pub const SAMPLE_TAXONOMY: &str = r#"# Allowed values. Re-read on every command.
accounts = ["Hype", "Revolut", "Contanti", "Poste Italiane"]

expense_categories = [
    "Supermarket",
    "Eating Out and Takeway",
    "Benzina",
    "Travel",
    "Casa",
    "Subscriptions",
    "Learning",
    "Fun",
    "Gifts & Donations",
    "Salute",
    "Car",
    "Barbiere",
    "Palestra",
    "Salvadanaio Winnies",
    "Other Outcome",
]

income_categories = ["Salary", "Gifts", "Prelievo", "Risparmio", "Risparmio Car", "Other Income"]

# Uncomment to replace the built-in synonyms and keyword rules.
# [lexicon]
# version = "custom-1"
#
# [lexicon.account_synonyms]
# cash = "Contanti"
#
# [lexicon.rules]
# dining_out = { category = "Eating Out and Takeway", keywords = ["bar", "pizzeria"] }
# expense = [{ category = "Supermarket", keywords = ["spesa", "supermercato"] }]
# income = [{ category = "Salary", keywords = ["stipendio"] }]
"#;
