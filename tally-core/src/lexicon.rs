//! Vocabulary data: synonym tables and keyword rules.
//!
//! This is configuration, not code. A `Lexicon` is deserialized from the
//! same file as the taxonomy and can be replaced without touching the
//! matching logic. `Lexicon::default()` carries the built-in Italian
//! vocabulary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::text::fold;

/// Alias -> canonical spelling. Keys are folded (lowercase, no accents)
/// on lookup, so table authors may write them either way.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Synonyms(BTreeMap<String, String>);

impl Synonyms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl AsRef<str>, canonical: impl Into<String>) {
        self.0.insert(fold(alias.as_ref()), canonical.into());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        let key = fold(alias);
        self.0
            .get(&key)
            .or_else(|| self.0.iter().find(|(k, _)| fold(k) == key).map(|(_, v)| v))
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: AsRef<str>, C: Into<String>> FromIterator<(A, C)> for Synonyms {
    fn from_iter<T: IntoIterator<Item = (A, C)>>(iter: T) -> Self {
        let mut s = Synonyms::new();
        for (alias, canonical) in iter {
            s.insert(alias, canonical);
        }
        s
    }
}

/// A keyword set pointing at one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            category: category.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Priority-ordered keyword tables. First match wins within each table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordRules {
    /// Checked before `expense`, so narrower rules cannot shadow it.
    #[serde(default)]
    pub dining_out: Option<KeywordRule>,
    #[serde(default)]
    pub expense: Vec<KeywordRule>,
    #[serde(default)]
    pub income: Vec<KeywordRule>,
}

impl KeywordRules {
    pub fn empty() -> Self {
        Self {
            dining_out: None,
            expense: Vec::new(),
            income: Vec::new(),
        }
    }

    /// Expense rules in evaluation order.
    pub fn expense_rules(&self) -> impl Iterator<Item = &KeywordRule> {
        self.dining_out.iter().chain(self.expense.iter())
    }
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            dining_out: Some(KeywordRule::new(
                "Eating Out and Takeway",
                &[
                    "caffe",
                    "espresso",
                    "cappuccino",
                    "cornetto",
                    "brioche",
                    "bar",
                    "colazione",
                    "pranzo",
                    "cena",
                    "pizzeria",
                    "ristorante",
                    "aperitivo",
                ],
            )),
            expense: vec![
                KeywordRule::new(
                    "Fun",
                    &[
                        "videogioco",
                        "videogame",
                        "gioco",
                        "gaming",
                        "steam",
                        "epic",
                        "epic games",
                        "gog",
                        "uplay",
                        "origin",
                        "playstation store",
                        "ps store",
                        "nintendo eshop",
                        "xbox",
                        "game pass",
                    ],
                ),
                KeywordRule::new("Supermarket", &["supermercato", "spesa", "esselunga"]),
                KeywordRule::new("Benzina", &["benzina", "carburante", "gas"]),
                KeywordRule::new("Barbiere", &["parrucchiere", "barbiere", "taglio", "barber"]),
                KeywordRule::new("Palestra", &["palestra", "abbonamento palestra"]),
                KeywordRule::new("Salute", &["farmacia", "medicina", "medicinale"]),
                KeywordRule::new("Subscriptions", &["spotify", "netflix", "abbonamento", "subscription"]),
                KeywordRule::new("Travel", &["taxi", "treno", "bus", "aereo"]),
                KeywordRule::new(
                    "Car",
                    &["olio motore", "cambio olio", "carrozzeria", "assicurazione auto"],
                ),
                KeywordRule::new("Gifts & Donations", &["regalo", "donazione", "donation"]),
                KeywordRule::new("Salvadanaio Winnies", &["salvadanaio", "winnies"]),
            ],
            income: vec![
                KeywordRule::new("Salary", &["stipendio", "salary"]),
                KeywordRule::new("Gifts", &["regalo", "gift"]),
                KeywordRule::new("Prelievo", &["prelievo"]),
                KeywordRule::new("Risparmio Car", &["risparmio car"]),
                KeywordRule::new("Risparmio", &["risparmio"]),
                KeywordRule::new("Other Income", &["other income"]),
            ],
        }
    }
}

/// Synonyms and keyword rules, versioned together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lexicon {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub account_synonyms: Synonyms,
    #[serde(default)]
    pub expense_synonyms: Synonyms,
    #[serde(default)]
    pub income_synonyms: Synonyms,
    /// Absent: the built-in rules
    #[serde(default)]
    pub rules: KeywordRules,
}

fn default_version() -> String {
    "builtin".to_string()
}

impl Lexicon {
    /// No synonyms and no keyword rules.
    pub fn empty() -> Self {
        Self {
            version: "empty".to_string(),
            account_synonyms: Synonyms::new(),
            expense_synonyms: Synonyms::new(),
            income_synonyms: Synonyms::new(),
            rules: KeywordRules::empty(),
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            version: default_version(),
            account_synonyms: [
                ("hype next", "Hype"),
                ("hype card", "Hype"),
                ("contante", "Contanti"),
                ("cash", "Contanti"),
                ("poste", "Poste Italiane"),
            ]
            .into_iter()
            .collect(),
            expense_synonyms: [
                ("other", "Other Outcome"),
                ("altro", "Other Outcome"),
                ("donation", "Gifts & Donations"),
                ("donazione", "Gifts & Donations"),
            ]
            .into_iter()
            .collect(),
            income_synonyms: Synonyms::new(),
            rules: KeywordRules::default(),
        }
    }
}
