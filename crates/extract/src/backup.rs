//! Plain-text backup of extracted tuples, one pipe-delimited record per
//! line. Lets graph construction be re-run without re-invoking the LLM.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::schema::{parse_tuples, FactTuple};

pub async fn write_tuples(path: &Path, tuples: &[FactTuple]) -> Result<()> {
    let mut content = String::new();
    for tuple in tuples {
        content.push_str(&tuple.to_line());
        content.push('\n');
    }

    fs::write(path, content)
        .await
        .context(format!("Failed to write backup file: {:?}", path))?;

    tracing::info!(tuples = tuples.len(), path = ?path, "wrote tuple backup");
    Ok(())
}

pub async fn read_tuples(path: &Path) -> Result<Vec<FactTuple>> {
    let content = fs::read_to_string(path)
        .await
        .context(format!("Failed to read backup file: {:?}", path))?;

    Ok(parse_tuples(&content))
}
