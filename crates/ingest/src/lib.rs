pub mod chunk;
pub mod chunker;
pub mod reader;

pub use chunk::Chunk;
pub use chunker::{Chunker, ChunkerConfig};
pub use reader::PdfReader;

use anyhow::Result;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Generate a stable document ID from file path
pub fn generate_doc_id(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

/// Main ingestion pipeline: PDF text extraction followed by
/// length-based chunking with overlap.
pub async fn ingest_pdf(path: &Path) -> Result<Vec<Chunk>> {
    let content = PdfReader::read(path).await?;
    let path_str = path.to_string_lossy().to_string();
    let doc_id = generate_doc_id(&path_str);

    let chunker = Chunker::new(ChunkerConfig::default());
    let chunks = chunker.chunk_text(&doc_id, &content, &path_str);

    tracing::info!(
        chunks = chunks.len(),
        source = %path_str,
        "ingested document"
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_id_is_stable_per_path() {
        assert_eq!(generate_doc_id("a.pdf"), generate_doc_id("a.pdf"));
        assert_ne!(generate_doc_id("a.pdf"), generate_doc_id("b.pdf"));
    }
}
