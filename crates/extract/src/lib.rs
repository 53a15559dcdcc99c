pub mod backup;
pub mod llm;
pub mod prompt;
pub mod schema;

pub use llm::{ChatClient, LlmClient};
pub use schema::{parse_tuples, FactTuple};

use anyhow::Result;
use ingest::Chunk;

/// Runs the fixed extraction prompt over chunks and collects fact tuples.
pub struct Extractor<C: LlmClient> {
    llm: C,
}

impl<C: LlmClient> Extractor<C> {
    pub fn new(llm: C) -> Self {
        Self { llm }
    }

    /// Extract tuples from a single chunk of statute text.
    pub async fn extract_from_text(&self, text: &str) -> Result<Vec<FactTuple>> {
        let prompt = prompt::build_extraction_prompt(text);
        let response = self.llm.generate(&prompt).await?;
        Ok(parse_tuples(&response))
    }

    /// Extract tuples from every chunk, one LLM call per chunk.
    ///
    /// A failed call or unparseable response drops that chunk's facts and
    /// moves on; there is no retry. Failures elsewhere in the pipeline
    /// still abort the run.
    pub async fn extract_chunks(&self, chunks: &[Chunk]) -> Result<Vec<FactTuple>> {
        let mut tuples = Vec::new();

        for chunk in chunks {
            match self.extract_from_text(&chunk.text).await {
                Ok(found) => {
                    if found.is_empty() {
                        tracing::debug!(chunk_id = %chunk.chunk_id, "no facts in chunk");
                    }
                    tuples.extend(found);
                }
                Err(e) => {
                    tracing::warn!(
                        chunk_id = %chunk.chunk_id,
                        error = %e,
                        "extraction failed for chunk, skipping"
                    );
                }
            }
        }

        tracing::info!(
            chunks = chunks.len(),
            tuples = tuples.len(),
            "extraction finished"
        );

        Ok(tuples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns one scripted response per call, in order.
    struct ScriptedLlm {
        responses: Vec<Result<String, String>>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<Result<String, String>>) -> Self {
            Self {
                responses,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.responses[i] {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(anyhow::anyhow!(e.clone())),
            }
        }
    }

    fn chunk(text: &str) -> Chunk {
        Chunk::new("doc".into(), text.into(), "t.pdf".into(), (0, text.len()))
    }

    #[tokio::test]
    async fn failed_chunk_does_not_suppress_others() {
        let llm = ScriptedLlm::new(vec![
            Ok("Theft | Chapter XVII | 303 | Imprisonment up to 3 years".into()),
            Err("connection reset".into()),
            Ok("Robbery | Chapter XVII | 309 | Rigorous imprisonment".into()),
        ]);
        let extractor = Extractor::new(llm);

        let chunks = vec![chunk("a"), chunk("b"), chunk("c")];
        let tuples = extractor.extract_chunks(&chunks).await.unwrap();

        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[0].offence, "Theft");
        assert_eq!(tuples[1].offence, "Robbery");
    }

    #[tokio::test]
    async fn unparseable_response_is_skipped() {
        let llm = ScriptedLlm::new(vec![
            Ok("I could not find anything structured here, sorry.".into()),
            Ok("Cheating | Chapter XVII | 318 | Fine".into()),
        ]);
        let extractor = Extractor::new(llm);

        let chunks = vec![chunk("a"), chunk("b")];
        let tuples = extractor.extract_chunks(&chunks).await.unwrap();

        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0].offence, "Cheating");
    }
}
