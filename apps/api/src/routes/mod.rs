pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers as pipeline;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screening/score", post(screening::handle_score))
        .route("/api/v1/screening/filter", post(screening::handle_filter))
        .route(
            "/api/v1/campaigns/:campaign_id/candidates",
            get(screening::handle_campaign_candidates),
        )
        // Pipeline board API
        .route("/api/v1/pipeline/board", post(pipeline::handle_board))
        .route("/api/v1/pipeline/move", post(pipeline::handle_move))
        .with_state(state)
}
