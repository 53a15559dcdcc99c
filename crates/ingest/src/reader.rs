use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

pub struct PdfReader;

impl PdfReader {
    /// Extract the full text of a PDF file.
    ///
    /// A missing or unreadable file is a hard error; indexing cannot
    /// proceed without the source corpus.
    pub async fn read(path: &Path) -> Result<String> {
        let bytes = fs::read(path)
            .await
            .context(format!("Failed to read PDF file: {:?}", path))?;

        let text = pdf_extract::extract_text_from_mem(&bytes)
            .context(format!("Failed to extract text from PDF: {:?}", path))?;

        Ok(text)
    }
}
