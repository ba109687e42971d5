//! Parse the extractor's reply into a candidate record.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tally_core::CandidateRecord;

/// Strip a surrounding Markdown code fence (```json ... ```), if any.
pub fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();
    if !content.starts_with("```") {
        return content;
    }
    let mut parts = content.split("```");
    let _ = parts.next();
    match (parts.next(), parts.next()) {
        (Some(inner), Some(_)) => {
            let inner = inner.trim_start();
            let inner = match inner.get(..4) {
                Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
                _ => inner,
            };
            inner.trim()
        }
        _ => content,
    }
}

pub fn parse_extractor_reply(content: &str) -> Result<CandidateRecord> {
    let body = strip_code_fence(content);
    let value: Value = serde_json::from_str(body).context("extractor reply is not valid JSON")?;
    if !value.is_object() {
        bail!("extractor returned non-object JSON");
    }
    CandidateRecord::from_value(value).context("extractor reply does not fit a transaction record")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::FieldInput;

    #[test]
    fn test_plain_json() {
        let rec = parse_extractor_reply(r#"{"description":"benzina","amount":45,"account":"Hype"}"#).unwrap();
        assert_eq!(rec.description.as_deref(), Some("benzina"));
        assert_eq!(rec.account, Some(FieldInput::Text("Hype".into())));
    }

    #[test]
    fn test_fenced_json() {
        let reply = "```json\n{\"description\": \"spesa\", \"outcome_categories\": [\"Supermarket\"]}\n```";
        let rec = parse_extractor_reply(reply).unwrap();
        assert_eq!(
            rec.expense_categories,
            Some(FieldInput::List(vec!["Supermarket".into()]))
        );
    }

    #[test]
    fn test_fence_without_language_tag() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = parse_extractor_reply("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("non-object"));
        assert!(parse_extractor_reply("not json").is_err());
    }
}
