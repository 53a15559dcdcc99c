use crate::chunk::Chunk;

pub struct ChunkerConfig {
    /// Maximum characters per chunk
    pub max_chars: usize,
    /// Characters carried over from the end of one chunk into the next
    pub overlap_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chars: 2000,
            overlap_chars: 200,
        }
    }
}

pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        assert!(
            config.overlap_chars < config.max_chars,
            "overlap must be smaller than chunk size"
        );
        Self { config }
    }

    /// Split text into fixed-size character windows with overlap.
    ///
    /// Splitting is purely length-based. The overlap keeps provisions that
    /// straddle a window boundary visible to both neighbouring chunks.
    pub fn chunk_text(&self, doc_id: &str, text: &str, source: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();

        if chars.is_empty() {
            return chunks;
        }

        let step = self.config.max_chars - self.config.overlap_chars;
        let mut start = 0;

        loop {
            let end = (start + self.config.max_chars).min(chars.len());
            let piece: String = chars[start..end].iter().collect();

            chunks.push(Chunk::new(
                doc_id.to_string(),
                piece,
                source.to_string(),
                (start, end),
            ));

            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(chunks: &[Chunk]) -> String {
        // Take the first chunk whole, then drop each successor's overlap
        // prefix using the recorded character offsets.
        let mut out = String::new();
        let mut prev_end = 0;

        for chunk in chunks {
            let skip = prev_end - chunk.offset.0;
            out.extend(chunk.text.chars().skip(skip));
            prev_end = chunk.offset.1;
        }

        out
    }

    #[test]
    fn single_chunk_for_short_text() {
        let chunker = Chunker::new(ChunkerConfig::default());
        let chunks = chunker.chunk_text("doc", "short text", "t.pdf");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text");
        assert_eq!(chunks[0].offset, (0, 10));
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let chunker = Chunker::new(ChunkerConfig {
            max_chars: 10,
            overlap_chars: 4,
        });
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunker.chunk_text("doc", text, "t.pdf");

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].text.chars().skip(pair[0].text.chars().count() - 4).collect();
            let head: String = pair[1].text.chars().take(4).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn concatenation_reconstructs_source() {
        let chunker = Chunker::new(ChunkerConfig {
            max_chars: 50,
            overlap_chars: 10,
        });
        let text = "Whoever commits theft shall be punished with imprisonment \
                    of either description for a term which may extend to three \
                    years, or with fine, or with both.";
        let chunks = chunker.chunk_text("doc", text, "t.pdf");

        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn reconstruction_holds_for_multibyte_text() {
        let chunker = Chunker::new(ChunkerConfig {
            max_chars: 8,
            overlap_chars: 3,
        });
        let text = "धारा ३०३ के अंतर्गत चोरी दंडनीय है";
        let chunks = chunker.chunk_text("doc", text, "t.pdf");

        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = Chunker::new(ChunkerConfig::default());
        assert!(chunker.chunk_text("doc", "", "t.pdf").is_empty());
    }
}
