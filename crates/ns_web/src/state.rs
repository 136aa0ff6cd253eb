use ns_inference::Orchestrator;
use std::sync::Arc;

pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}
