use aerodesk_catalog::Flight;
use aerodesk_core::NewFlight;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flight/add", post(add_flight))
        .route("/api/flight/{id}", get(get_flight).delete(delete_flight))
        .route("/api/flight/{id}/status", patch(update_status))
        .route("/api/flight/search/{source}/{destination}", get(search_flights))
}

async fn add_flight(
    State(state): State<AppState>,
    Json(req): Json<NewFlight>,
) -> Result<(StatusCode, Json<ApiResponse<Flight>>), AppError> {
    let flight = state.admin.add_flight(req).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Flight added successfully", flight)))
}

async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Flight>>, AppError> {
    let flight = state.admin.get_flight(id).await?;
    Ok(ApiResponse::ok("Flight retrieved successfully", flight))
}

async fn search_flights(
    State(state): State<AppState>,
    Path((source, destination)): Path<(String, String)>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Flight>>>, AppError> {
    let flights = state
        .admin
        .search_flights(&source, &destination, query.date.as_deref())
        .await?;
    if flights.is_empty() {
        return Err(AppError::NotFound("No flights found".to_string()));
    }
    Ok(ApiResponse::ok("Flights retrieved successfully", flights))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<Flight>>, AppError> {
    let flight = state.admin.update_flight_status(id, &req.status).await?;
    Ok(ApiResponse::ok("Flight status updated successfully", flight))
}

async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    state.admin.delete_flight(id).await?;
    Ok(ApiResponse::ok("Flight deleted successfully", id))
}
