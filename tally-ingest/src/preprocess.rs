//! Message text cleanup before extraction.
//!
//! "caffè 1,20€ ieri" -> "caffè 1.20 EUR 2026-10-15"

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use regex::Regex;

/// Relative day words and their offset from today. Longer phrases first so
/// "l'altro ieri" is not consumed as "ieri".
const RELATIVE_DAYS: &[(&str, i64)] = &[
    ("l'altro ieri", -2),
    ("altroieri", -2),
    ("ieri", -1),
    ("oggi", 0),
];

/// Compiled cleanup patterns. Build once per session and reuse across messages.
pub struct Preprocessor {
    euro_re: Regex,
    comma_amount_re: Regex,
    spaces_re: Regex,
    relative: Vec<(Regex, i64)>,
}

impl Preprocessor {
    pub fn new() -> Result<Self> {
        let relative = RELATIVE_DAYS
            .iter()
            .map(|(phrase, offset)| -> Result<(Regex, i64)> {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))?;
                Ok((re, *offset))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            euro_re: Regex::new(r"\s*€")?,
            // No lookahead in `regex`: capture the following char and put it back.
            comma_amount_re: Regex::new(r"(\d+),(\d{1,2})(\D|$)")?,
            spaces_re: Regex::new(r"\s+")?,
            relative,
        })
    }

    /// Euro sign to " EUR", decimal commas to dots, collapsed whitespace.
    pub fn normalize_text(&self, text: &str) -> String {
        let t = self.euro_re.replace_all(text.trim(), " EUR");
        let t = self.comma_amount_re.replace_all(&t, "${1}.${2}${3}");
        let t = self.spaces_re.replace_all(&t, " ");
        t.trim().to_string()
    }

    /// Replace Italian relative day words with ISO dates.
    pub fn resolve_relative_dates(&self, text: &str, today: NaiveDate) -> String {
        let mut out = text.to_string();
        for (re, offset) in &self.relative {
            let date = (today + Duration::days(*offset)).format("%Y-%m-%d").to_string();
            out = re.replace_all(&out, date.as_str()).into_owned();
        }
        out
    }

    pub fn preprocess(&self, text: &str, today: NaiveDate) -> String {
        self.resolve_relative_dates(&self.normalize_text(text), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn pre() -> Preprocessor {
        Preprocessor::new().unwrap()
    }

    #[test]
    fn test_normalize_text_amounts() {
        assert_eq!(pre().normalize_text("caffè 1,20€ con Hype"), "caffè 1.20 EUR con Hype");
        assert_eq!(pre().normalize_text("  benzina   45 €  "), "benzina 45 EUR");
        assert_eq!(pre().normalize_text("spesa 27,9"), "spesa 27.9");
    }

    #[test]
    fn test_normalize_text_leaves_thousands_alone() {
        assert_eq!(pre().normalize_text("bonifico 1,234 euro"), "bonifico 1,234 euro");
    }

    #[test]
    fn test_relative_dates() {
        assert_eq!(
            pre().resolve_relative_dates("pranzo oggi", today()),
            "pranzo 2026-10-16"
        );
        assert_eq!(
            pre().resolve_relative_dates("Ieri benzina", today()),
            "2026-10-15 benzina"
        );
        assert_eq!(
            pre().resolve_relative_dates("cena l'altro ieri", today()),
            "cena 2026-10-14"
        );
    }

    #[test]
    fn test_relative_dates_whole_word_only() {
        assert_eq!(
            pre().resolve_relative_dates("oggetto regalo", today()),
            "oggetto regalo"
        );
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(
            pre().preprocess("ho preso un caffè 1,20€ con Hype ieri", today()),
            "ho preso un caffè 1.20 EUR con Hype 2026-10-15"
        );
    }

    #[test]
    fn test_preprocessor_reused_across_messages() {
        let pre = Preprocessor::new().unwrap();
        let messages = [
            ("caffè 1,20€ oggi", "caffè 1.20 EUR 2026-10-16"),
            ("benzina 45 € ieri", "benzina 45 EUR 2026-10-15"),
            ("spesa 27,9 l'altro ieri", "spesa 27.9 2026-10-14"),
            ("oggetto regalo", "oggetto regalo"),
        ];
        for (raw, want) in messages {
            assert_eq!(pre.preprocess(raw, today()), want);
        }
        // Same instance, different day.
        let tomorrow = today() + Duration::days(1);
        assert_eq!(pre.preprocess("pranzo oggi", tomorrow), "pranzo 2026-10-17");
        for (raw, want) in messages {
            assert_eq!(pre.preprocess(raw, today()), want);
        }
    }
}
