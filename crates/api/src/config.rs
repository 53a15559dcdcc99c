use std::path::PathBuf;

/// Runtime configuration, read from environment variables with localhost
/// defaults for development.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub embedding_model: String,

    pub api_addr: String,
    pub backup_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let llm_api_key = std::env::var("LLM_API_KEY").unwrap_or_default();
        if llm_api_key.is_empty() {
            tracing::warn!("LLM_API_KEY is not set; LLM calls will likely be rejected");
        }

        Self {
            neo4j_uri: env_or("NEO4J_URI", "bolt://localhost:7687"),
            neo4j_user: env_or("NEO4J_USER", "neo4j"),
            neo4j_password: env_or("NEO4J_PASSWORD", "neo4j"),

            llm_base_url: env_or("LLM_BASE_URL", "https://api.openai.com/v1"),
            llm_api_key,
            llm_model: env_or("LLM_MODEL", "gpt-4o-mini"),
            embedding_model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),

            api_addr: env_or("API_ADDR", "0.0.0.0:3000"),
            backup_path: PathBuf::from(env_or("BACKUP_PATH", "data/facts_backup.txt")),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_falls_back_to_default() {
        assert_eq!(env_or("LAWGRAPH_TEST_UNSET_VAR", "fallback"), "fallback");
    }
}
