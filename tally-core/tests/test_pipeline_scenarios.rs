use chrono::{Duration, NaiveDate};
use serde_json::json;
use std::sync::Arc;
use std::thread;
use tally_core::{
    CandidateRecord, KeywordRule, KeywordRules, Lexicon, Normalizer, ResolutionBasis, TaxonomyStore,
    ValidationError,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Small English taxonomy with a matching lexicon.
fn normalizer() -> Normalizer {
    let store = TaxonomyStore::shared();
    store.replace(["Cash"], ["Groceries", "Dining"], ["Salary"]);

    let lexicon = Lexicon {
        version: "test".to_string(),
        rules: KeywordRules {
            dining_out: Some(KeywordRule::new("Dining", &["restaurant", "lunch", "dinner"])),
            expense: vec![KeywordRule::new("Groceries", &["bread", "supermarket"])],
            income: vec![KeywordRule::new("Salary", &["salary", "payroll"])],
        },
        ..Lexicon::default()
    };
    Normalizer::new(store).with_lexicon(lexicon)
}

fn candidate(v: serde_json::Value) -> CandidateRecord {
    CandidateRecord::from_value(v).unwrap()
}

#[test]
fn test_scenario_canonical_expense() {
    let out = normalizer()
        .normalize(
            &candidate(json!({
                "account": "cash",
                "amount": 12.999,
                "currency": "EUR",
                "date": iso(today()),
                "expense_categories": ["groceries"],
                "income_categories": null,
                "description": "bought bread",
            })),
            today(),
        )
        .unwrap();

    let tx = out.transaction;
    assert_eq!(tx.account, "Cash");
    assert_eq!(tx.amount.to_string(), "13.00");
    assert_eq!(tx.expense_categories, Some(vec!["Groceries".to_string()]));
    assert_eq!(tx.income_categories, None);
    assert_eq!(out.basis, ResolutionBasis::ExpenseOnly);
}

#[test]
fn test_scenario_both_sides_salary_text() {
    let out = normalizer()
        .normalize(
            &candidate(json!({
                "account": "Cash",
                "amount": 1500,
                "currency": "EUR",
                "date": iso(today()),
                "expense_categories": ["Groceries"],
                "income_categories": ["Salary"],
                "description": "October salary",
            })),
            today(),
        )
        .unwrap();

    assert_eq!(out.transaction.income_categories, Some(vec!["Salary".to_string()]));
    assert_eq!(out.transaction.expense_categories, None);
    assert_eq!(out.basis, ResolutionBasis::TextSuggestsIncome);
}

#[test]
fn test_scenario_unsupported_account() {
    let err = normalizer()
        .normalize(
            &candidate(json!({
                "account": "Bank",
                "amount": 5,
                "currency": "EUR",
                "date": iso(today()),
                "expense_categories": ["Groceries"],
                "description": "bought bread",
            })),
            today(),
        )
        .unwrap_err();

    assert_eq!(
        err,
        ValidationError::UnsupportedAccount {
            account: "Bank".to_string(),
            allowed: vec!["Cash".to_string()],
        }
    );
}

#[test]
fn test_scenario_missing_classification() {
    let err = normalizer()
        .normalize(
            &candidate(json!({
                "account": "Cash",
                "amount": 5,
                "currency": "EUR",
                "date": iso(today()),
                "expense_categories": [],
                "income_categories": null,
                "description": "something unclear",
            })),
            today(),
        )
        .unwrap_err();

    assert_eq!(err, ValidationError::MissingClassification);
}

#[test]
fn test_boundary_dates() {
    let n = normalizer();
    let run = |d: NaiveDate| {
        n.normalize(
            &candidate(json!({
                "account": "Cash",
                "amount": 5,
                "date": iso(d),
                "description": "dinner out",
            })),
            today(),
        )
    };

    assert!(run(today() + Duration::days(3)).is_ok());
    assert!(matches!(
        run(today() + Duration::days(4)),
        Err(ValidationError::DateOutOfRange { .. })
    ));
    assert!(run(today() - Duration::days(366)).is_ok());
    assert!(matches!(
        run(today() - Duration::days(367)),
        Err(ValidationError::DateOutOfRange { .. })
    ));
}

#[test]
fn test_deterministic_for_fixed_input() {
    let n = normalizer();
    let c = candidate(json!({
        "account": "CASH",
        "amount": "1,005",
        "date": iso(today()),
        "expense_categories": "groceries",
        "income_categories": "salary",
        "description": "mystery",
    }));
    let a = n.normalize(&c, today());
    let b = n.normalize(&c, today());
    assert_eq!(a, b);
    let tx = a.unwrap().transaction;
    assert_eq!(tx.amount.to_string(), "1.01");
    assert_eq!(tx.income_categories, Some(vec!["Salary".to_string()]));
}

#[test]
fn test_concurrent_normalize_during_taxonomy_reload() {
    let n = Arc::new(normalizer());
    let c = candidate(json!({
        "account": "Cash",
        "amount": 9.5,
        "date": iso(today()),
        "description": "supermarket run",
    }));

    let writer = {
        let store = Arc::clone(n.store());
        thread::spawn(move || {
            for _ in 0..100 {
                store.replace(["Cash", "Card"], ["Groceries", "Dining"], ["Salary"]);
                store.replace(["Cash"], ["Groceries", "Dining"], ["Salary"]);
            }
        })
    };

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let n = Arc::clone(&n);
            let c = c.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let out = n.normalize(&c, today()).unwrap();
                    assert_eq!(out.transaction.expense_categories, Some(vec!["Groceries".to_string()]));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for w in workers {
        w.join().unwrap();
    }
}
