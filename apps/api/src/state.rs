use std::sync::Arc;

use crate::config::Config;
use crate::extraction::FieldExtractor;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable name recognizer and LLM backend, plus the process-wide key.
    pub extractor: Arc<FieldExtractor>,
    pub store: ResumeStore,
    pub config: Config,
}
