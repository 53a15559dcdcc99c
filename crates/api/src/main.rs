use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use api::AppConfig;
use extract::ChatClient;
use graph::{ContextBundle, GraphStats, GraphStore};
use query::{AnswerComposer, EmbeddingClient, QueryResolver};

struct AppState {
    store: GraphStore,
    resolver: QueryResolver,
    composer: AnswerComposer<ChatClient>,
}

#[derive(Deserialize)]
struct AskRequest {
    query: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    matched_offence: Option<String>,
    similarity: Option<f32>,
    context: Option<ContextBundle>,
    log: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    neo4j: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    let store = GraphStore::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await?;

    let embeddings = EmbeddingClient::new(
        config.llm_base_url.clone(),
        config.llm_api_key.clone(),
        config.embedding_model.clone(),
    );
    let llm = ChatClient::new(
        config.llm_base_url.clone(),
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    );

    let state = Arc::new(AppState {
        store: store.clone(),
        resolver: QueryResolver::new(store, embeddings),
        composer: AnswerComposer::new(llm),
    });

    let app = Router::new()
        .route("/", get(index_page))
        .route("/ask", post(ask))
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.api_addr).await?;
    tracing::info!("Server listening on http://{}", config.api_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Synchronous call chain per submission: resolve the query against the
/// graph, then compose the answer. Every failure lands in the response
/// log as a generic error rather than an HTTP error status.
async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> Json<AskResponse> {
    let query = req.query.trim();
    let mut log = Vec::new();
    log.push(format!("query: \"{}\"", query));

    let retrieved = match state.resolver.resolve(query).await {
        Ok(retrieved) => retrieved,
        Err(e) => {
            tracing::error!(error = %e, "query resolution failed");
            log.push(format!("error: {:#}", e));
            return Json(AskResponse {
                answer: "Something went wrong while resolving the query; see log.".to_string(),
                matched_offence: None,
                similarity: None,
                context: None,
                log,
            });
        }
    };

    let Some(retrieved) = retrieved else {
        log.push("no offence nodes found in graph".to_string());
        return Json(AskResponse {
            answer: "No matching offence was found. Has the graph been built (build_graph)?"
                .to_string(),
            matched_offence: None,
            similarity: None,
            context: None,
            log,
        });
    };

    log.push(format!(
        "matched offence \"{}\" (similarity {:.3})",
        retrieved.offence, retrieved.similarity
    ));
    log.push(format!(
        "retrieved context: chapter={:?}, section={:?}, punishment={:?}",
        retrieved.bundle.chapter, retrieved.bundle.section, retrieved.bundle.punishment
    ));

    let answer = match state.composer.compose(query, &retrieved).await {
        Ok(answer) => {
            log.push("composed answer".to_string());
            answer
        }
        Err(e) => {
            tracing::error!(error = %e, "answer composition failed");
            log.push(format!("error: {:#}", e));
            "Something went wrong while composing the answer; see log.".to_string()
        }
    };

    Json(AskResponse {
        answer,
        matched_offence: Some(retrieved.offence),
        similarity: Some(retrieved.similarity),
        context: Some(retrieved.bundle),
        log,
    })
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let neo4j = match state.store.stats().await {
        Ok(_) => "ok".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse { neo4j })
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GraphStats>, axum::http::StatusCode> {
    let stats = state.store.stats().await.map_err(|e| {
        tracing::error!(error = %e, "stats query failed");
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(stats))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Legal Graph QA</title>
<style>
  body { font-family: sans-serif; max-width: 720px; margin: 2rem auto; }
  textarea { width: 100%; height: 4rem; }
  #answer { white-space: pre-wrap; border: 1px solid #ccc; padding: 1rem; min-height: 4rem; }
  #log { color: #666; font-size: 0.85rem; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>Legal Graph QA</h1>
<form id="ask-form">
  <textarea id="query" placeholder="Describe a situation or ask about an offence..."></textarea>
  <button type="submit">Ask</button>
</form>
<h2>Answer</h2>
<div id="answer"></div>
<h2>Log</h2>
<div id="log"></div>
<script>
document.getElementById('ask-form').addEventListener('submit', async (e) => {
  e.preventDefault();
  const query = document.getElementById('query').value;
  const answerPane = document.getElementById('answer');
  const logPane = document.getElementById('log');
  answerPane.textContent = '...';
  logPane.textContent = '';
  try {
    const resp = await fetch('/ask', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ query })
    });
    const data = await resp.json();
    answerPane.textContent = data.answer;
    logPane.textContent = data.log.join('\n');
  } catch (err) {
    answerPane.textContent = 'Request failed: ' + err;
  }
});
</script>
</body>
</html>
"#;
