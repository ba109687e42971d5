//! Map free-form account/category input to official taxonomy spelling.

use std::collections::HashSet;

use crate::lexicon::Synonyms;
use crate::record::FieldInput;
use crate::text::fold;

/// Tokens that resolved to nothing in the allowed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTokens(pub Vec<String>);

/// Lookup of `value` in `allowed`, returning the official spelling.
///
/// Tried from strictest to loosest: exact, case-insensitive, then
/// accent-folded. An entry that is already official always maps to itself,
/// even when the taxonomy holds accent variants of it ("Caffe", "Caffè").
pub fn match_allowed<'a>(value: &str, allowed: &'a [String]) -> Option<&'a str> {
    let value = value.trim();
    if let Some(exact) = allowed.iter().find(|a| a.as_str() == value) {
        return Some(exact.as_str());
    }
    let lower = value.to_lowercase();
    if let Some(cased) = allowed.iter().find(|a| a.to_lowercase() == lower) {
        return Some(cased.as_str());
    }
    let key = fold(value);
    allowed.iter().find(|a| fold(a) == key).map(|a| a.as_str())
}

/// Resolve one token: synonym first, then the allowed set directly.
pub fn canonicalize_token<'a>(token: &str, allowed: &'a [String], synonyms: &Synonyms) -> Option<&'a str> {
    synonyms
        .get(token)
        .and_then(|target| match_allowed(target, allowed))
        .or_else(|| match_allowed(token, allowed))
}

/// Canonicalize a whole field.
///
/// Returns the ordered, de-duplicated canonical values, `None` when the
/// input holds no tokens, or every offending token when any token fails
/// to resolve. Never returns a partial list.
pub fn canonicalize_field(
    value: Option<&FieldInput>,
    allowed: &[String],
    synonyms: &Synonyms,
) -> Result<Option<Vec<String>>, UnknownTokens> {
    let Some(value) = value else {
        return Ok(None);
    };

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut unknown = Vec::new();

    for token in value.tokens() {
        match canonicalize_token(&token, allowed, synonyms) {
            Some(canon) => {
                if seen.insert(canon) {
                    out.push(canon.to_string());
                }
            }
            None => unknown.push(token),
        }
    }

    if !unknown.is_empty() {
        return Err(UnknownTokens(unknown));
    }
    Ok(if out.is_empty() { None } else { Some(out) })
}

/// Lenient variant for the single-valued account field: a value that
/// resolves to exactly one account is replaced by its official spelling,
/// anything else is passed through trimmed so the validator can reject it
/// as an unsupported account.
pub fn canonicalize_account(value: Option<&FieldInput>, allowed: &[String], synonyms: &Synonyms) -> Option<String> {
    let value = value?;
    match canonicalize_field(Some(value), allowed, synonyms) {
        Ok(None) => None,
        Ok(Some(mut accounts)) if accounts.len() == 1 => accounts.pop(),
        _ => Some(value.display()).filter(|s| !s.is_empty()),
    }
}
