use aerodesk_catalog::{AllocationError, FlightError, PricingError, SeatClass};
use aerodesk_order::BookingTransitionError;
use uuid::Uuid;

/// Error type returned by repository and publisher ports.
pub type RepositoryError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse error category, used by outer layers to pick a response code and by metrics as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    SeatUnavailable,
    InsufficientInventory,
    Unauthorized,
    AlreadyCancelled,
    OrphanedBooking,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::SeatUnavailable => "seat_unavailable",
            ErrorKind::InsufficientInventory => "insufficient_inventory",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::AlreadyCancelled => "already_cancelled",
            ErrorKind::OrphanedBooking => "orphaned_booking",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Flight,
    Booking,
    Agent,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Flight => f.write_str("Flight"),
            Entity::Booking => f.write_str("Booking"),
            Entity::Agent => f.write_str("Agent"),
        }
    }
}

/// Request problems the caller can fix and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Seat count mismatch: you specified {requested} seats but provided {provided} seat numbers")]
    CountMismatch { requested: u32, provided: usize },

    #[error("Duplicate seat numbers are not allowed: {}", .seats.join(", "))]
    DuplicateSeat { seats: Vec<String> },

    #[error("Seat(s) {} do not exist in {class}", .seats.join(", "))]
    InvalidSeat { class: SeatClass, seats: Vec<String> },

    #[error("Invalid seat class: {0}")]
    InvalidClass(String),

    #[error("At least one seat must be booked")]
    InvalidSeatCount,

    #[error("You can book a maximum of {max} seats per booking")]
    BookingCapExceeded { max: u32 },

    #[error("Booking limit exceeded: {already_booked} seats already booked on this flight, {requested} more requested, limit is {max}")]
    BookingLimitExceeded { already_booked: u32, requested: u32, max: u32 },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Flight {0} already exists")]
    DuplicateFlight(String),

    #[error("Agent with this email already exists")]
    DuplicateAgent,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Cannot change flight status from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Inconsistent seat inventory: {0}")]
    InconsistentInventory(String),

    #[error("Invalid {class} fare {fare}")]
    InvalidFare { class: SeatClass, fare: i64 },

    #[error("Invalid price {price} for food option {item}")]
    InvalidFoodPrice { item: String, price: i64 },

    #[error("Booking amount is out of range")]
    AmountOutOfRange,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0} not found: {1}")]
    NotFound(Entity, String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Seat(s) {} already booked", .seats.join(", "))]
    SeatUnavailable { seats: Vec<String> },

    #[error("Not enough available seats: requested {requested}, available {available}")]
    InsufficientInventory { requested: u32, available: u32 },

    #[error("Unauthorized cancellation")]
    Unauthorized,

    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("Booking {booking_id} references missing flight {flight_id}")]
    OrphanedBooking { booking_id: Uuid, flight_id: Uuid },

    #[error("Internal service error: {0}")]
    Unexpected(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound(..) => ErrorKind::NotFound,
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::SeatUnavailable { .. } => ErrorKind::SeatUnavailable,
            CoreError::InsufficientInventory { .. } => ErrorKind::InsufficientInventory,
            CoreError::Unauthorized => ErrorKind::Unauthorized,
            CoreError::AlreadyCancelled(_) => ErrorKind::AlreadyCancelled,
            CoreError::OrphanedBooking { .. } => ErrorKind::OrphanedBooking,
            CoreError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Lost races surface as `SeatUnavailable`; the caller may retry with a fresh seat query.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::SeatUnavailable { .. })
    }

    pub fn flight_not_found(id: Uuid) -> Self {
        CoreError::NotFound(Entity::Flight, id.to_string())
    }

    pub fn booking_not_found(id: Uuid) -> Self {
        CoreError::NotFound(Entity::Booking, id.to_string())
    }

    pub fn agent_not_found(id: Uuid) -> Self {
        CoreError::NotFound(Entity::Agent, id.to_string())
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        CoreError::Unexpected(err.to_string())
    }
}

impl From<AllocationError> for CoreError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidSeatCount => ValidationError::InvalidSeatCount.into(),
            AllocationError::CountMismatch { requested, provided } => {
                ValidationError::CountMismatch { requested, provided }.into()
            }
            AllocationError::DuplicateSeat { seats } => ValidationError::DuplicateSeat { seats }.into(),
            AllocationError::InvalidSeat { class, seats } => ValidationError::InvalidSeat { class, seats }.into(),
            AllocationError::SeatUnavailable { seats } => CoreError::SeatUnavailable { seats },
            AllocationError::InsufficientInventory { requested, available } => {
                CoreError::InsufficientInventory { requested, available }
            }
        }
    }
}

impl From<FlightError> for CoreError {
    fn from(err: FlightError) -> Self {
        match err {
            FlightError::UnknownSeatClass(class) => ValidationError::InvalidClass(class).into(),
            FlightError::UnknownStatus(status) => ValidationError::InvalidStatus(status).into(),
            FlightError::InvalidTransition { from, to } => ValidationError::InvalidStatusTransition {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into(),
            FlightError::InvalidFare { class, fare } => ValidationError::InvalidFare { class, fare }.into(),
            other => ValidationError::InconsistentInventory(other.to_string()).into(),
        }
    }
}

impl From<PricingError> for CoreError {
    fn from(_: PricingError) -> Self {
        ValidationError::AmountOutOfRange.into()
    }
}

impl From<BookingTransitionError> for CoreError {
    fn from(err: BookingTransitionError) -> Self {
        match err {
            BookingTransitionError::AlreadyCancelled(id) => CoreError::AlreadyCancelled(id),
            BookingTransitionError::InvalidTransition { from, to } => ValidationError::InvalidStatusTransition {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_errors_keep_their_category() {
        let err: CoreError = AllocationError::SeatUnavailable { seats: vec!["E1".to_string()] }.into();
        assert_eq!(err.kind(), ErrorKind::SeatUnavailable);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Seat(s) E1 already booked");

        let err: CoreError = AllocationError::CountMismatch { requested: 2, provided: 1 }.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_retryable());

        let err: CoreError = AllocationError::InsufficientInventory { requested: 3, available: 1 }.into();
        assert_eq!(err.kind(), ErrorKind::InsufficientInventory);
    }

    #[test]
    fn test_flight_errors_are_validation() {
        let err: CoreError = FlightError::UnknownSeatClass("premium".to_string()).into();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidClass(_))));
    }

    #[test]
    fn test_pricing_errors_are_validation() {
        let err: CoreError = PricingError::Overflow.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::AmountOutOfRange)));

        let err: CoreError = FlightError::InvalidFare { class: SeatClass::Economy, fare: -1 }.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidFare { fare: -1, .. })));
    }

    #[test]
    fn test_repository_errors_are_unexpected() {
        let err: CoreError = RepositoryError::from("connection reset").into();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.to_string(), "Internal service error: connection reset");
    }
}
