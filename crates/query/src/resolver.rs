use anyhow::{Context, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::embeddings::EmbeddingClient;
use graph::{ContextBundle, GraphStore};

/// The best-matching offence and its graph neighborhood, ready for the
/// answer composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedContext {
    pub offence: String,
    pub similarity: f32,
    pub bundle: ContextBundle,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

/// Index of the most similar candidate, or None when there are no
/// candidates. Ties go to the first candidate in iteration order.
pub fn rank_offences(query: &[f32], candidates: &[Vec<f32>]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (i, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate);
        match best {
            Some((_, best_score)) if score > best_score => best = Some((i, score)),
            None => best = Some((i, score)),
            _ => {}
        }
    }

    best
}

/// Embeds the user query, scores it against every Offence node, and
/// collects the winner's neighborhood from the graph.
pub struct QueryResolver {
    store: GraphStore,
    embeddings: EmbeddingClient,
    // Offence texts change only when the graph is rebuilt, so their
    // embeddings are cached per process. Query embeddings are not.
    offence_cache: DashMap<String, Vec<f32>>,
}

impl QueryResolver {
    pub fn new(store: GraphStore, embeddings: EmbeddingClient) -> Self {
        Self {
            store,
            embeddings,
            offence_cache: DashMap::new(),
        }
    }

    /// Resolve a free-text query to its nearest offence context.
    ///
    /// Returns Ok(None) when the graph holds no Offence nodes.
    pub async fn resolve(&self, query: &str) -> Result<Option<RetrievedContext>> {
        let offences = self
            .store
            .offence_texts()
            .await
            .context("Failed to list offence nodes")?;

        if offences.is_empty() {
            tracing::info!("no offence nodes found in graph");
            return Ok(None);
        }

        let query_embedding = self
            .embeddings
            .embed(query)
            .await
            .context("Failed to embed query")?;

        let mut candidates = Vec::with_capacity(offences.len());
        for offence in &offences {
            let embedding = match self.offence_cache.get(offence) {
                Some(cached) => cached.value().clone(),
                None => {
                    let embedding = self
                        .embeddings
                        .embed(offence)
                        .await
                        .context(format!("Failed to embed offence '{}'", offence))?;
                    self.offence_cache
                        .insert(offence.clone(), embedding.clone());
                    embedding
                }
            };
            candidates.push(embedding);
        }

        // Non-empty candidate list, so rank always yields a winner.
        let (best, similarity) = rank_offences(&query_embedding, &candidates)
            .context("Ranking produced no result")?;
        let offence = offences[best].clone();

        tracing::info!(offence = %offence, similarity, "matched offence");

        let bundle = self
            .store
            .neighborhood(&offence)
            .await
            .context("Failed to retrieve offence neighborhood")?;

        Ok(Some(RetrievedContext {
            offence,
            similarity,
            bundle,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_self_match() {
        let query = vec![0.3, 0.5, 0.2];
        let candidates = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.3, 0.5, 0.2],
            vec![0.0, 1.0, 0.0],
        ];

        let (best, score) = rank_offences(&query, &candidates).unwrap();
        assert_eq!(best, 1);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn no_candidates_means_no_match() {
        assert!(rank_offences(&[1.0, 0.0], &[]).is_none());
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let query = vec![1.0, 0.0];
        // Same direction, different magnitudes: identical cosine scores.
        let candidates = vec![vec![2.0, 0.0], vec![1.0, 0.0]];

        let (best, _) = rank_offences(&query, &candidates).unwrap();
        assert_eq!(best, 0);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
