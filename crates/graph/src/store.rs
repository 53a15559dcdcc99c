use anyhow::{Context, Result};
use neo4rs::{Graph, Query};
use serde::{Deserialize, Serialize};

use extract::FactTuple;

/// Node labels used by the legal fact graph, each keyed on `text`.
const NODE_LABELS: [&str; 4] = ["Offence", "Chapter", "Section", "Punishment"];

/// The text connected to a matched offence through its relationships.
/// Fields are absent when the graph lacks the corresponding edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBundle {
    pub offence: String,
    pub chapter: Option<String>,
    pub section: Option<String>,
    pub punishment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub offences: usize,
    pub relationships: usize,
}

/// Long-lived Neo4j connection shared by the graph builder and the
/// query resolver.
#[derive(Clone)]
pub struct GraphStore {
    graph: Graph,
}

impl GraphStore {
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;
        Ok(Self { graph })
    }

    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// Create lookup indexes on each label's text key.
    pub async fn init_schema(&self) -> Result<()> {
        for label in NODE_LABELS {
            let query = Query::new(format!(
                "CREATE INDEX {}_text_index IF NOT EXISTS FOR (n:{}) ON (n.text)",
                label.to_lowercase(),
                label
            ));
            self.graph
                .run(query)
                .await
                .context(format!("Failed to create index on {}.text", label))?;
        }
        Ok(())
    }

    /// Upsert one fact tuple: four node merges, then three relationship
    /// merges. MERGE-on-key makes repeated runs idempotent; there is no
    /// transaction around the seven writes.
    pub async fn merge_fact(&self, fact: &FactTuple) -> Result<()> {
        self.merge_node("Offence", &fact.offence).await?;
        self.merge_node("Chapter", &fact.chapter).await?;
        self.merge_node("Section", &fact.section).await?;
        self.merge_node("Punishment", &fact.punishment).await?;

        self.merge_relationship("Offence", &fact.offence, "DEFINED_IN", "Section", &fact.section)
            .await?;
        self.merge_relationship("Offence", &fact.offence, "PART_OF", "Chapter", &fact.chapter)
            .await?;
        self.merge_relationship(
            "Section",
            &fact.section,
            "PRESCRIBES",
            "Punishment",
            &fact.punishment,
        )
        .await?;

        Ok(())
    }

    async fn merge_node(&self, label: &str, text: &str) -> Result<()> {
        // Labels cannot be parameterized in Cypher; they come from the
        // fixed NODE_LABELS set, never from input.
        let query = Query::new(format!("MERGE (n:{} {{text: $text}})", label))
            .param("text", text.to_string());

        self.graph
            .run(query)
            .await
            .context(format!("Failed to merge {} node", label))?;

        Ok(())
    }

    async fn merge_relationship(
        &self,
        from_label: &str,
        from_text: &str,
        rel_type: &str,
        to_label: &str,
        to_text: &str,
    ) -> Result<()> {
        let query = Query::new(format!(
            r#"
            MATCH (a:{} {{text: $from_text}})
            MATCH (b:{} {{text: $to_text}})
            MERGE (a)-[:{}]->(b)
            "#,
            from_label, to_label, rel_type
        ))
        .param("from_text", from_text.to_string())
        .param("to_text", to_text.to_string());

        self.graph
            .run(query)
            .await
            .context(format!("Failed to merge {} relationship", rel_type))?;

        Ok(())
    }

    /// Load every tuple into the graph, sequentially. A failure aborts the
    /// current tuple; earlier tuples' writes stay in place (at-least-once).
    pub async fn load_facts(&self, facts: &[FactTuple]) -> Result<usize> {
        for fact in facts {
            self.merge_fact(fact)
                .await
                .context(format!("Failed to load tuple for offence '{}'", fact.offence))?;
        }

        tracing::info!(tuples = facts.len(), "loaded facts into graph");
        Ok(facts.len())
    }

    /// All offence node texts, in database return order.
    pub async fn offence_texts(&self) -> Result<Vec<String>> {
        let query = Query::new("MATCH (o:Offence) RETURN o.text as text".to_string());

        let mut result = self.graph.execute(query).await?;
        let mut texts = Vec::new();

        while let Some(row) = result.next().await? {
            texts.push(row.get::<String>("text")?);
        }

        Ok(texts)
    }

    /// Collect the chapter, section and punishment connected to an offence.
    pub async fn neighborhood(&self, offence: &str) -> Result<ContextBundle> {
        let query = Query::new(
            r#"
            MATCH (o:Offence {text: $text})
            OPTIONAL MATCH (o)-[:PART_OF]->(c:Chapter)
            OPTIONAL MATCH (o)-[:DEFINED_IN]->(s:Section)
            OPTIONAL MATCH (s)-[:PRESCRIBES]->(p:Punishment)
            RETURN c.text as chapter, s.text as section, p.text as punishment
            LIMIT 1
            "#
            .to_string(),
        )
        .param("text", offence.to_string());

        let mut result = self.graph.execute(query).await?;

        let row = result
            .next()
            .await?
            .context(format!("Offence node not found: '{}'", offence))?;

        Ok(ContextBundle {
            offence: offence.to_string(),
            chapter: row.get::<String>("chapter").ok(),
            section: row.get::<String>("section").ok(),
            punishment: row.get::<String>("punishment").ok(),
        })
    }

    pub async fn stats(&self) -> Result<GraphStats> {
        let query = Query::new("MATCH (o:Offence) RETURN count(o) as count".to_string());
        let mut result = self.graph.execute(query).await?;
        let offences = if let Some(row) = result.next().await? {
            row.get::<i64>("count").unwrap_or(0) as usize
        } else {
            0
        };

        let query = Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string());
        let mut result = self.graph.execute(query).await?;
        let relationships = if let Some(row) = result.next().await? {
            row.get::<i64>("count").unwrap_or(0) as usize
        } else {
            0
        };

        Ok(GraphStats {
            offences,
            relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact() -> FactTuple {
        FactTuple {
            offence: "theft".into(),
            chapter: "Chapter XVII".into(),
            section: "303".into(),
            punishment: "imprisonment up to 3 years".into(),
        }
    }

    /// Requires a local Neo4j at bolt://localhost:7687 (user/password via
    /// NEO4J_USER / NEO4J_PASSWORD). Run with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn merge_is_idempotent() {
        let user = std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".into());
        let password = std::env::var("NEO4J_PASSWORD").unwrap_or_else(|_| "neo4j".into());

        let store = GraphStore::connect("bolt://localhost:7687", &user, &password)
            .await
            .unwrap();
        store.init_schema().await.unwrap();

        store.merge_fact(&fact()).await.unwrap();
        let first = store.stats().await.unwrap();

        store.merge_fact(&fact()).await.unwrap();
        let second = store.stats().await.unwrap();

        assert_eq!(first.offences, second.offences);
        assert_eq!(first.relationships, second.relationships);

        let bundle = store.neighborhood("theft").await.unwrap();
        assert_eq!(bundle.section.as_deref(), Some("303"));
        assert_eq!(
            bundle.punishment.as_deref(),
            Some("imprisonment up to 3 years")
        );
    }
}
