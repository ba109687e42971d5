use serde::{Deserialize, Serialize};

/// Expected outcome of a sample message in a batch file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Expense,
    Income,
    Reject,
}

/// One row of a batch file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMessage {
    pub text: String,
    #[serde(default)]
    pub expect: Option<Expectation>,
}
