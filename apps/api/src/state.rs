use std::sync::Arc;

use crate::cache::LocalCache;
use crate::screening::scoring::ScoreEstimator;
use crate::talent_client::CandidateSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable score estimator. Default: HeuristicScoreEstimator with config weights.
    pub scorer: Arc<dyn ScoreEstimator>,
    /// Candidate list cache. Backend chosen at startup (memory, file or Redis).
    pub cache: Arc<LocalCache>,
    pub source: Arc<dyn CandidateSource>,
}
