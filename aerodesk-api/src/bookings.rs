use aerodesk_core::{BookingFilter, CancelBookingRequest, CoreError, CreateBookingRequest};
use aerodesk_order::{Booking, BookingStatus, PaymentStatus};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

type BookingResponse = Json<ApiResponse<Booking>>;
type BookingListResponse = Json<ApiResponse<Vec<Booking>>>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserBookingsQuery {
    status: Option<BookingStatus>,
    payment_status: Option<PaymentStatus>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/booking/add", post(create_booking))
        .route("/api/booking/cancel", put(cancel_booking))
        .route("/api/booking/all", get(list_bookings))
        .route("/api/booking/user/{user_id}", get(list_user_bookings))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, BookingResponse), AppError> {
    match state.bookings.create_booking(req).await {
        Ok(booking) => {
            state.metrics.booking_created();
            Ok((StatusCode::CREATED, ApiResponse::ok("Booking created successfully", booking)))
        }
        Err(err) => Err(rejected(&state, err)),
    }
}

async fn cancel_booking(
    State(state): State<AppState>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<BookingResponse, AppError> {
    let booking = state.bookings.cancel_booking(req).await?;
    state.metrics.booking_cancelled();
    Ok(ApiResponse::ok("Booking cancelled successfully", booking))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<BookingListResponse, AppError> {
    let bookings = state.bookings.list_bookings(&filter).await?;
    found(bookings)
}

async fn list_user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<UserBookingsQuery>,
) -> Result<BookingListResponse, AppError> {
    let bookings = state
        .bookings
        .list_user_bookings(&user_id, query.status, query.payment_status)
        .await?;
    found(bookings)
}

fn found(bookings: Vec<Booking>) -> Result<BookingListResponse, AppError> {
    if bookings.is_empty() {
        return Err(AppError::NotFound("No bookings found".to_string()));
    }
    Ok(ApiResponse::ok("Bookings retrieved successfully", bookings))
}

fn rejected(state: &AppState, err: CoreError) -> AppError {
    let kind = err.kind();
    state.metrics.booking_rejected(kind);
    warn!(kind = kind.as_str(), "booking rejected: {}", err);
    err.into()
}
