use std::sync::Arc;

use crate::services::{providers::PlacesProvider, RecommendationEngine};

/// Limit applied when a request does not name one
pub const DEFAULT_LIMIT: usize = 20;
/// Largest limit a request may ask for
pub const MAX_LIMIT: usize = 100;

/// Shared application state
///
/// Everything in here is read-only after startup, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    /// Live places lookups; `None` when no API key is configured
    pub places: Option<Arc<dyn PlacesProvider>>,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            places: None,
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }

    pub fn with_places(mut self, provider: Arc<dyn PlacesProvider>) -> Self {
        self.places = Some(provider);
        self
    }

    pub fn with_limits(mut self, default_limit: usize, max_limit: usize) -> Self {
        self.default_limit = default_limit;
        self.max_limit = max_limit;
        self
    }
}
