use aerodesk_core::{CoreError, ErrorKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Core(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation | ErrorKind::InsufficientInventory | ErrorKind::AlreadyCancelled => {
                    StatusCode::BAD_REQUEST
                }
                ErrorKind::SeatUnavailable => StatusCode::CONFLICT,
                ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
                ErrorKind::OrphanedBooking | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, error) = match self {
            AppError::Core(err) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Internal Server Error: {}", err);
                ("Internal Server Error".to_string(), err.kind().as_str().to_string())
            }
            AppError::Core(err) => (err.to_string(), err.kind().as_str().to_string()),
            AppError::BadRequest(msg) => (msg, ErrorKind::Validation.as_str().to_string()),
            AppError::NotFound(msg) => (msg, ErrorKind::NotFound.as_str().to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                ("Internal Server Error".to_string(), ErrorKind::Unexpected.as_str().to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": error,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerodesk_core::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CoreError::flight_not_found(uuid::Uuid::nil()), StatusCode::NOT_FOUND),
            (ValidationError::InvalidSeatCount.into(), StatusCode::BAD_REQUEST),
            (CoreError::InsufficientInventory { requested: 2, available: 1 }, StatusCode::BAD_REQUEST),
            (CoreError::AlreadyCancelled(uuid::Uuid::nil()), StatusCode::BAD_REQUEST),
            (CoreError::SeatUnavailable { seats: vec!["E1".into()] }, StatusCode::CONFLICT),
            (CoreError::Unauthorized, StatusCode::FORBIDDEN),
            (
                CoreError::OrphanedBooking { booking_id: uuid::Uuid::nil(), flight_id: uuid::Uuid::nil() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (CoreError::Unexpected("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }
}
