//! Indexing phase of the pipeline: PDF -> chunks -> LLM fact extraction
//! -> backup file -> graph load. With --from-backup the PDF and LLM are
//! skipped and the graph is rebuilt from the backup artifact.

use anyhow::{bail, Result};
use std::path::Path;

use api::AppConfig;
use extract::{backup, ChatClient, Extractor, FactTuple};
use graph::GraphStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let tuples: Vec<FactTuple> = match args.as_slice() {
        [flag] if flag.as_str() == "--from-backup" => {
            tracing::info!(path = ?config.backup_path, "rebuilding from backup");
            backup::read_tuples(&config.backup_path).await?
        }
        [pdf_path] => extract_from_pdf(&config, Path::new(pdf_path)).await?,
        _ => bail!("usage: build_graph <pdf-path> | build_graph --from-backup"),
    };

    if tuples.is_empty() {
        bail!("no fact tuples to load; nothing was extracted");
    }

    let store = GraphStore::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await?;

    store.init_schema().await?;
    store.load_facts(&tuples).await?;

    let stats = store.stats().await?;
    tracing::info!(
        offences = stats.offences,
        relationships = stats.relationships,
        "graph build complete"
    );

    Ok(())
}

async fn extract_from_pdf(config: &AppConfig, pdf_path: &Path) -> Result<Vec<FactTuple>> {
    let chunks = ingest::ingest_pdf(pdf_path).await?;

    let llm = ChatClient::new(
        config.llm_base_url.clone(),
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    );
    let extractor = Extractor::new(llm);
    let tuples = extractor.extract_chunks(&chunks).await?;

    // Write the backup before touching the graph, so a failed load can be
    // re-run without re-invoking the LLM.
    if let Some(parent) = config.backup_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    backup::write_tuples(&config.backup_path, &tuples).await?;

    Ok(tuples)
}
