//! Keyword-based category inference from a transaction description.
//!
//! Only a gap-filler: it is consulted when the extractor supplied no
//! usable category, or to break a tie when it supplied both kinds.

use crate::lexicon::{KeywordRule, KeywordRules};
use crate::text::{contains_phrase, word_padded};

/// First rule (in order) with a keyword present in `padded` and, when
/// `allowed` is given, a category that is still in the taxonomy.
fn first_match<'r, I>(padded: &str, rules: I, allowed: Option<&[String]>) -> Option<&'r str>
where
    I: IntoIterator<Item = &'r KeywordRule>,
{
    rules
        .into_iter()
        .filter(|rule| allowed.is_none_or(|set| set.iter().any(|c| c == &rule.category)))
        .find(|rule| rule.keywords.iter().any(|k| contains_phrase(padded, k)))
        .map(|rule| rule.category.as_str())
}

/// Propose an expense category. Dining-out keywords are checked first.
pub fn infer_expense_category(description: &str, allowed: &[String], rules: &KeywordRules) -> Option<String> {
    let padded = word_padded(description);
    first_match(&padded, rules.expense_rules(), Some(allowed)).map(str::to_string)
}

/// Propose an income category.
pub fn infer_income_category(description: &str, allowed: &[String], rules: &KeywordRules) -> Option<String> {
    let padded = word_padded(description);
    first_match(&padded, &rules.income, Some(allowed)).map(str::to_string)
}

/// Whether any income rule fires, regardless of the current taxonomy.
pub fn looks_like_income(description: &str, rules: &KeywordRules) -> bool {
    let padded = word_padded(description);
    first_match(&padded, &rules.income, None).is_some()
}
