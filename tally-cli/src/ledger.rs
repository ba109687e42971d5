//! Append-only JSONL ledger of accepted transactions.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tally_core::ValidatedTransaction;

pub fn append(path: &Path, tx: &ValidatedTransaction) -> Result<()> {
    let line = serde_json::to_string(tx).context("serialize transaction")?;
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    writeln!(f, "{line}").with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
