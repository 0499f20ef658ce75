use aerodesk_core::NewAgent;
use aerodesk_order::Agent;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/agent/add", post(register_agent))
        .route("/api/agent/{id}", get(get_agent))
}

async fn register_agent(
    State(state): State<AppState>,
    Json(req): Json<NewAgent>,
) -> Result<(StatusCode, Json<ApiResponse<Agent>>), AppError> {
    let agent = state.admin.register_agent(req).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Agent registered successfully", agent)))
}

async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let agent = state.admin.get_agent(id).await?;
    Ok(ApiResponse::ok("Agent retrieved successfully", agent))
}
