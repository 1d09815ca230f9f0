//! Axum route handlers for the application board.

use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::pipeline::board::{group_by_stage, move_application, Application, Column, Stage};

#[derive(Debug, Deserialize)]
pub struct BoardRequest {
    pub applications: Vec<Application>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub applications: Vec<Application>,
    pub candidate_key: String,
    pub stage: Stage,
}

/// POST /api/v1/pipeline/board
pub async fn handle_board(Json(request): Json<BoardRequest>) -> Json<Vec<Column>> {
    Json(group_by_stage(&request.applications))
}

/// POST /api/v1/pipeline/move
pub async fn handle_move(Json(request): Json<MoveRequest>) -> Result<Json<Vec<Column>>, AppError> {
    let moved = move_application(&request.applications, &request.candidate_key, request.stage)?;
    Ok(Json(group_by_stage(&moved)))
}
