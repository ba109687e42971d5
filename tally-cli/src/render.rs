//! Human-facing text: confirmations and rejection hints, Italian style.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::{ErrorKind, TransactionKind, ValidatedTransaction, ValidationError, round_half_up};

const OK: &str = "✅";
const ERR: &str = "⚠️";
const DESC: &str = "📝";
const AMOUNT: &str = "💶";
const DATE: &str = "📅";

pub const EXAMPLE_MESSAGE: &str = "10€ benzina con Hype ieri";

pub fn emoji_for_category(category: Option<&str>) -> &'static str {
    match category.unwrap_or_default() {
        "Supermarket" => "🛒",
        "Eating Out and Takeway" => "🍽️",
        "Benzina" => "⛽",
        "Travel" => "✈️",
        "Casa" => "🏠",
        "Subscriptions" => "🔁",
        "Savings" | "Risparmio" | "Risparmio Car" => "🏦",
        "Learning" => "📚",
        "Fun" => "🎉",
        "Ballo" => "🕺",
        "Gifts & Donations" | "Gifts" => "🎁",
        "Salute" => "🩺",
        "Integratori" => "💊",
        "Car" => "🚗",
        "Barbiere" => "💈",
        "Salary" => "💼",
        _ => "📦",
    }
}

pub fn emoji_for_account(account: &str) -> &'static str {
    match account {
        "Contanti" => "💵",
        "Poste Italiane" => "🏤",
        _ => "💳",
    }
}

/// "1234.5" -> "1.234,50€"
pub fn fmt_amount_eur(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let s = rounded.abs().to_string();
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part:0<2}€")
}

pub fn fmt_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

pub fn confirmation_message(tx: &ValidatedTransaction) -> String {
    let title = match tx.kind() {
        TransactionKind::Expense => "Spesa registrata",
        TransactionKind::Income => "Entrata registrata",
    };
    let mut parts = vec![
        format!("{OK} {title}"),
        format!("{DESC} {}", tx.description),
    ];
    if let Some(category) = tx.primary_category() {
        parts.push(format!("{} {}", emoji_for_category(Some(category)), tx.categories().join(" / ")));
    }
    parts.push(format!("{} {}", emoji_for_account(&tx.account), tx.account));
    parts.push(format!("{AMOUNT} {}", fmt_amount_eur(tx.amount)));
    parts.push(format!("{DATE} {}", fmt_date(tx.date)));
    parts.join("\n")
}

/// What the user should change to get the message accepted.
pub fn hint(err: &ValidationError) -> String {
    let base = match err.kind() {
        ErrorKind::EmptyField | ErrorKind::MissingField => match err.field() {
            Some(f) => format!("Manca il campo {f}: aggiungilo al messaggio."),
            None => "Manca un campo obbligatorio.".to_string(),
        },
        ErrorKind::MalformedField => "Controlla il formato: importo come 12,50 e data come YYYY-MM-DD.".to_string(),
        ErrorKind::NonPositiveAmount => "L'importo deve essere maggiore di zero.".to_string(),
        ErrorKind::UnsupportedCurrency => "Sono supportati solo importi in euro.".to_string(),
        ErrorKind::UnsupportedAccount => "Indica un account valido.".to_string(),
        ErrorKind::UnknownValue => "Usa una delle categorie esistenti.".to_string(),
        ErrorKind::DateOutOfRange => "La data è troppo lontana da oggi.".to_string(),
        ErrorKind::TooManyCategories => "Troppe categorie: al massimo due per una spesa, una per un'entrata.".to_string(),
        ErrorKind::AmbiguousClassification => "Specifica se è una spesa o un'entrata.".to_string(),
        ErrorKind::MissingClassification => "Non riesco a capire la categoria: aggiungi una parola chiave (es. spesa, benzina, stipendio).".to_string(),
    };
    match err.allowed() {
        Some(allowed) if !allowed.is_empty() => format!("{base}\nValori ammessi: {}", allowed.join(", ")),
        _ => base,
    }
}

pub fn rejection_message(err: &ValidationError) -> String {
    format!(
        "{ERR} Non ho capito bene.\n{err}\n{}\n\nEsempio: {EXAMPLE_MESSAGE}",
        hint(err)
    )
}
