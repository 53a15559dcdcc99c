pub mod store;

pub use store::{ContextBundle, GraphStats, GraphStore};
