pub mod composer;
pub mod embeddings;
pub mod resolver;

pub use composer::AnswerComposer;
pub use embeddings::EmbeddingClient;
pub use resolver::{QueryResolver, RetrievedContext};
