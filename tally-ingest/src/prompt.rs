//! Extractor instructions and response schema, built from the current
//! taxonomy snapshot so the model only sees values that can validate.

use chrono::NaiveDate;
use serde_json::{Value, json};
use tally_core::{Currency, Taxonomy};

pub const SCHEMA_NAME: &str = "transaction_schema";

/// JSON schema for the `json_schema` response format.
pub fn response_schema(taxonomy: &Taxonomy) -> Value {
    let currencies: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
    json!({
        "name": SCHEMA_NAME,
        "schema": {
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "description": { "type": "string" },
                "amount": { "type": "number" },
                "currency": { "type": "string", "enum": currencies },
                "account": { "type": "string", "enum": taxonomy.accounts },
                "date": { "type": "string", "format": "date" },
                "expense_categories": {
                    "type": ["array", "null"],
                    "items": { "type": "string", "enum": taxonomy.expense_categories },
                },
                "income_categories": {
                    "type": ["array", "null"],
                    "items": { "type": "string", "enum": taxonomy.income_categories },
                },
                "notes": { "type": ["string", "null"] },
            },
            "required": ["description", "amount", "currency", "account", "date"],
        },
    })
}

pub fn system_prompt(taxonomy: &Taxonomy, timezone: &str) -> String {
    let lines = [
        "You extract a single financial transaction from a short message, usually written in Italian \
         (e.g. 'ho comprato un caffè 1.20 EUR con Hype 2026-10-15')."
            .to_string(),
        "Return ONLY a JSON object matching the provided schema.".to_string(),
        "Rules:".to_string(),
        "- 'amount' is a positive number with a dot as decimal separator (1.20).".to_string(),
        format!("- 'date' is YYYY-MM-DD, interpreted in the {timezone} timezone."),
        format!("- 'account' is one of {:?}.", taxonomy.accounts),
        format!(
            "- For a purchase or payment, pick up to two 'expense_categories' from {:?} ([macro, specific]).",
            taxonomy.expense_categories
        ),
        format!(
            "- For money received, pick one 'income_categories' entry from {:?}.",
            taxonomy.income_categories
        ),
        "- Fill only one of expense_categories or income_categories; set the other to null.".to_string(),
        "- Never invent new categories or accounts.".to_string(),
    ];
    lines.join("\n") + "\n"
}

pub fn user_message(text: &str, today: NaiveDate) -> String {
    format!("Today is {}. Text: {text}", today.format("%Y-%m-%d"))
}

/// Extra instruction appended when retrying without a response schema.
pub const JSON_ONLY_SUFFIX: &str = "\nReply with valid JSON only.";
