//! Batch files of sample messages.
//!
//! CSV with a header row:
//!   text,expect
//!   "cappuccino e cornetto 3,40€ contanti oggi",expense
//!   "stipendio 1820€ su Revolut oggi",income

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::types::BatchMessage;

pub fn read_batch(path: impl AsRef<Path>) -> Result<Vec<BatchMessage>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_batch_from(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_batch_from<R: Read>(reader: R) -> Result<Vec<BatchMessage>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<BatchMessage>().enumerate() {
        let msg = row.with_context(|| format!("row {}", i + 2))?;
        if msg.text.is_empty() {
            continue;
        }
        out.push(msg);
    }
    Ok(out)
}
