use aerodesk_catalog::{Flight, FlightStatus, SeatClass};
use aerodesk_order::{Agent, Booking, BookingStatus, PaymentStatus};
use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::RepositoryError;

/// Inventory store: flights and their seat tables.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Flight>, RepositoryError>;

    async fn find_by_number(&self, flight_number: &str) -> Result<Option<Flight>, RepositoryError>;

    async fn search(
        &self,
        source: &str,
        destination: &str,
        date: Option<&str>,
    ) -> Result<Vec<Flight>, RepositoryError>;

    async fn insert(&self, flight: &Flight) -> Result<(), RepositoryError>;

    /// Replace the stored flight wholesale.
    async fn update(&self, flight: &Flight) -> Result<(), RepositoryError>;

    /// Set the operational status without touching the seat table.
    async fn update_status(&self, id: Uuid, status: FlightStatus) -> Result<Option<Flight>, RepositoryError>;

    /// Returns whether a flight was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Reserve `seats` in `class` as one indivisible step: decrement the class counter by
    /// `seats.len()` and add the seats to the booked set, only if none of them is already booked
    /// and the counter would stay non-negative.
    ///
    /// Returns the updated flight, or `None` when the precondition failed or the flight is gone.
    async fn conditional_update_seats(
        &self,
        id: Uuid,
        class: SeatClass,
        seats: &[String],
    ) -> Result<Option<Flight>, RepositoryError>;

    /// Remove `seats` from the booked set and give them back to the class counter, in one step.
    /// The counter never exceeds the class total.
    async fn release_seats(
        &self,
        id: Uuid,
        class: SeatClass,
        seats: &[String],
    ) -> Result<Option<Flight>, RepositoryError>;
}

/// Ledger of bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepositoryError>;

    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError>;

    async fn update(&self, booking: &Booking) -> Result<(), RepositoryError>;

    /// Move the booking to `next` only if it is still in `expected`. Returns the updated booking,
    /// or `None` if it is missing or was moved by someone else first.
    async fn update_status_if(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Option<Booking>, RepositoryError>;

    /// Bookings matching every set field of the filter, newest `booking_date` first.
    async fn find_by_filter(&self, filter: &BookingFilter) -> Result<Vec<Booking>, RepositoryError>;
}

#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>, RepositoryError>;

    async fn insert(&self, agent: &Agent) -> Result<(), RepositoryError>;

    async fn update(&self, agent: &Agent) -> Result<(), RepositoryError>;

    /// Atomically add `amount` to the agent's commission total. `None` if the agent does not exist.
    async fn credit_commission(&self, id: Uuid, amount: i64) -> Result<Option<Agent>, RepositoryError>;

    /// Atomically subtract `amount`, only when the total is at least `amount`.
    /// `None` if the agent does not exist or the debit was skipped.
    async fn debit_commission(&self, id: Uuid, amount: i64) -> Result<Option<Agent>, RepositoryError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    pub flight_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl BookingFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn on_flight(mut self, flight_id: Uuid) -> Self {
        self.flight_id = Some(flight_id);
        self
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.flight_id.map_or(true, |id| booking.flight_id == id)
            && self.user_id.as_ref().map_or(true, |id| &booking.user_id == id)
            && self.status.map_or(true, |status| booking.status == status)
            && self
                .payment_status
                .map_or(true, |status| booking.payment.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerodesk_order::{Payment, PaymentMethod};
    use aerodesk_shared::Masked;
    use chrono::Utc;

    fn booking(user_id: &str, flight_id: Uuid, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            flight_id,
            user_id: user_id.to_string(),
            agent_id: None,
            passenger_name: Masked::new("Kiran".to_string()),
            seats_booked: 1,
            seat_class: SeatClass::Economy,
            seat_numbers: vec!["E1".to_string()],
            food_options: Vec::new(),
            payment: Payment {
                amount: 5000,
                method: PaymentMethod::Upi,
                status: PaymentStatus::Paid,
                transaction_id: None,
            },
            agent_commission: 0,
            status,
            booking_date: Utc::now(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = BookingFilter::default();
        assert!(filter.matches(&booking("u1", Uuid::new_v4(), BookingStatus::Booked)));
        assert!(filter.matches(&booking("u2", Uuid::new_v4(), BookingStatus::Cancelled)));
    }

    #[test]
    fn test_filter_fields_are_conjunctive() {
        let flight_id = Uuid::new_v4();
        let filter = BookingFilter {
            status: Some(BookingStatus::Booked),
            ..BookingFilter::for_user("u1").on_flight(flight_id)
        };

        assert!(filter.matches(&booking("u1", flight_id, BookingStatus::Booked)));
        assert!(!filter.matches(&booking("u2", flight_id, BookingStatus::Booked)));
        assert!(!filter.matches(&booking("u1", Uuid::new_v4(), BookingStatus::Booked)));
        assert!(!filter.matches(&booking("u1", flight_id, BookingStatus::Cancelled)));
    }

    #[test]
    fn test_filter_from_query_string_shape() {
        let filter: BookingFilter =
            serde_json::from_str(r#"{"userId":"u9","status":"Cancelled","paymentStatus":"Paid"}"#).unwrap();
        assert_eq!(filter.user_id.as_deref(), Some("u9"));
        assert_eq!(filter.status, Some(BookingStatus::Cancelled));
        assert_eq!(filter.payment_status, Some(PaymentStatus::Paid));
        assert!(filter.flight_id.is_none());
    }
}
