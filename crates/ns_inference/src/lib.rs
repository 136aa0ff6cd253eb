pub mod chunker;
pub mod models;
pub mod pipeline;
pub mod sentiment;
pub mod summary;

pub use chunker::TextChunker;
pub use models::{create_gateways, Gateways};
pub use pipeline::Orchestrator;
pub use sentiment::{SentimentFusion, SentimentOutcome};
pub use summary::SummaryEngine;
