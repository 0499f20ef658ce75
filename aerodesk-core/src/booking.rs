use std::sync::Arc;

use aerodesk_catalog::{FareQuote, Flight, SeatAllocator, SeatClass};
use aerodesk_order::{
    Booking, BookingStatus, CommissionPolicy, FlatCommission, FoodOption, Payment, PaymentMethod,
    PaymentStatus, RandomTransactionIds, TransactionIds,
};
use aerodesk_shared::models::BookingConfirmedEvent;
use aerodesk_shared::Masked;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::events::{publish_event, EventPublisher, LogEventPublisher};
use crate::policy::BookingPolicy;
use crate::repository::{AgentRepository, BookingFilter, BookingRepository, FlightRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub flight_id: Uuid,
    pub user_id: String,
    #[serde(default)]
    pub agent_id: Option<Uuid>,
    pub passenger_name: Masked<String>,
    pub seats_booked: u32,
    /// Explicit seat choice. Empty means auto-allocate.
    #[serde(default)]
    pub seat_numbers: Vec<String>,
    pub seat_class: String,
    #[serde(default)]
    pub food_options: Vec<FoodOption>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Booking and cancellation workflows over the inventory store, the ledger and the agent registry.
///
/// Requests run independently; the only cross-request coordination is the store's conditional seat
/// update.
#[derive(Clone)]
pub struct BookingService {
    pub(crate) flights: Arc<dyn FlightRepository>,
    pub(crate) bookings: Arc<dyn BookingRepository>,
    pub(crate) agents: Arc<dyn AgentRepository>,
    pub(crate) events: Arc<dyn EventPublisher>,
    pub(crate) transaction_ids: Arc<dyn TransactionIds>,
    pub(crate) commission: Arc<dyn CommissionPolicy>,
    pub(crate) policy: BookingPolicy,
}

impl BookingService {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        bookings: Arc<dyn BookingRepository>,
        agents: Arc<dyn AgentRepository>,
    ) -> Self {
        Self {
            flights,
            bookings,
            agents,
            events: Arc::new(LogEventPublisher),
            transaction_ids: Arc::new(RandomTransactionIds::new()),
            commission: Arc::new(FlatCommission::default()),
            policy: BookingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BookingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = events;
        self
    }

    pub fn with_transaction_ids(mut self, transaction_ids: Arc<dyn TransactionIds>) -> Self {
        self.transaction_ids = transaction_ids;
        self
    }

    pub fn with_commission_policy(mut self, commission: Arc<dyn CommissionPolicy>) -> Self {
        self.commission = commission;
        self
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Requested → Validated → SeatsReserved → Persisted, or Rejected at any step.
    #[instrument(skip(self, request), fields(flight_id = %request.flight_id, seats = request.seats_booked))]
    pub async fn create_booking(&self, request: CreateBookingRequest) -> CoreResult<Booking> {
        if request.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId").into());
        }
        if request.passenger_name.expose().trim().is_empty() {
            return Err(ValidationError::MissingField("passengerName").into());
        }

        // 1. Flight
        let flight = self
            .flights
            .find_by_id(request.flight_id)
            .await?
            .ok_or_else(|| CoreError::flight_not_found(request.flight_id))?;

        // 2. Seat class
        let class: SeatClass = request.seat_class.parse()?;

        // 3. Per-booking cap
        let cap = self.policy.max_seats_per_booking;
        if self.policy.booking_cap_applies(request.agent_id.is_some()) && request.seats_booked > cap {
            return Err(ValidationError::BookingCapExceeded { max: cap }.into());
        }

        // 4. Per-user cumulative cap
        let already_booked = self.seats_held(&request.user_id, flight.id).await?;
        let limit = self.policy.max_seats_per_user_per_flight;
        if already_booked + request.seats_booked > limit {
            return Err(ValidationError::BookingLimitExceeded {
                already_booked,
                requested: request.seats_booked,
                max: limit,
            }
            .into());
        }

        // 5. Candidate seats from the snapshot
        let seats = SeatAllocator::resolve(&flight, class, request.seats_booked, &request.seat_numbers)?;

        // 6. Fare
        if let Some(food) = request.food_options.iter().find(|f| f.price < 0) {
            return Err(ValidationError::InvalidFoodPrice {
                item: food.item.clone(),
                price: food.price,
            }
            .into());
        }
        let quote = FareQuote::compute(
            &flight.fare,
            class,
            request.seats_booked,
            request.food_options.iter().map(|f| f.price),
        )?;

        // 7. Commit the reservation
        if self
            .flights
            .conditional_update_seats(flight.id, class, &seats)
            .await?
            .is_none()
        {
            let conflicting = self.conflicting_seats(flight.id, &seats).await;
            warn!(seats = ?conflicting, "seat reservation lost a race");
            return Err(CoreError::SeatUnavailable { seats: conflicting });
        }

        // 8. Agent commission
        let mut credited = None;
        if let Some(agent_id) = request.agent_id {
            let amount = self.commission.on_booking(quote.seat_fare);
            match self.agents.credit_commission(agent_id, amount).await {
                Ok(Some(_)) => credited = Some((agent_id, amount)),
                Ok(None) => info!(%agent_id, "agent not found, booking without commission"),
                Err(e) => {
                    self.roll_back_reservation(&flight, class, &seats, None).await;
                    return Err(e.into());
                }
            }
        }
        let quote = match quote.with_commission(credited.map_or(0, |(_, amount)| amount)) {
            Ok(quote) => quote,
            Err(e) => {
                self.roll_back_reservation(&flight, class, &seats, credited).await;
                return Err(e.into());
            }
        };

        // 9. Persist
        let booking = Booking {
            id: Uuid::new_v4(),
            flight_id: flight.id,
            user_id: request.user_id,
            agent_id: credited.map(|(agent_id, _)| agent_id),
            passenger_name: request.passenger_name,
            seats_booked: request.seats_booked,
            seat_class: class,
            seat_numbers: seats,
            food_options: request.food_options,
            payment: Payment {
                amount: quote.total_amount,
                method: request
                    .payment_method
                    .unwrap_or(self.policy.default_payment_method),
                status: PaymentStatus::Paid,
                transaction_id: Some(self.transaction_ids.next_id()),
            },
            agent_commission: quote.commission,
            status: BookingStatus::Booked,
            booking_date: Utc::now(),
        };

        if let Err(e) = self.bookings.insert(&booking).await {
            self.roll_back_reservation(&flight, class, &booking.seat_numbers, credited)
                .await;
            return Err(e.into());
        }

        info!(
            booking_id = %booking.id,
            seats = ?booking.seat_numbers,
            total = booking.payment.amount,
            "booking confirmed"
        );

        let event = BookingConfirmedEvent {
            booking_id: booking.id,
            flight_id: booking.flight_id,
            user_id: booking.user_id.clone(),
            agent_id: booking.agent_id,
            seat_class: class.to_string(),
            seat_numbers: booking.seat_numbers.clone(),
            total_amount: booking.payment.amount,
            timestamp: booking.booking_date.timestamp(),
        };
        publish_event(self.events.as_ref(), &event).await;

        // 10.
        Ok(booking)
    }

    pub async fn get_booking(&self, id: Uuid) -> CoreResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::booking_not_found(id))
    }

    /// Newest first.
    pub async fn list_bookings(&self, filter: &BookingFilter) -> CoreResult<Vec<Booking>> {
        Ok(self.bookings.find_by_filter(filter).await?)
    }

    pub async fn list_user_bookings(
        &self,
        user_id: &str,
        status: Option<BookingStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> CoreResult<Vec<Booking>> {
        let filter = BookingFilter {
            status,
            payment_status,
            ..BookingFilter::for_user(user_id)
        };
        self.list_bookings(&filter).await
    }

    /// Seats the user holds on the flight across non-cancelled bookings.
    ///
    /// Read from the ledger outside the seat update, so concurrent requests from one user can
    /// together exceed the per-user cap.
    async fn seats_held(&self, user_id: &str, flight_id: Uuid) -> CoreResult<u32> {
        let bookings = self
            .bookings
            .find_by_filter(&BookingFilter::for_user(user_id).on_flight(flight_id))
            .await?;
        Ok(bookings
            .iter()
            .filter(|b| b.is_active())
            .map(|b| b.seats_booked)
            .sum())
    }

    /// The seats that made a conditional update fail. Falls back to the whole set when none of
    /// them is booked (the class counter ran out, or the flight could not be re-read).
    async fn conflicting_seats(&self, flight_id: Uuid, seats: &[String]) -> Vec<String> {
        let taken: Vec<String> = match self.flights.find_by_id(flight_id).await {
            Ok(Some(current)) => seats.iter().filter(|s| current.is_booked(s)).cloned().collect(),
            _ => Vec::new(),
        };
        if taken.is_empty() {
            seats.to_vec()
        } else {
            taken
        }
    }

    /// Undo a committed reservation after a later step failed.
    async fn roll_back_reservation(
        &self,
        flight: &Flight,
        class: SeatClass,
        seats: &[String],
        credited: Option<(Uuid, i64)>,
    ) {
        match self.flights.release_seats(flight.id, class, seats).await {
            Ok(Some(_)) => warn!(flight_id = %flight.id, seats = ?seats, "reservation rolled back"),
            Ok(None) => error!(flight_id = %flight.id, seats = ?seats, "rollback found no flight"),
            Err(e) => error!(flight_id = %flight.id, seats = ?seats, error = %e, "failed to release seats"),
        }

        if let Some((agent_id, amount)) = credited {
            match self.agents.debit_commission(agent_id, amount).await {
                Ok(Some(_)) => {}
                Ok(None) => error!(%agent_id, amount, "commission rollback skipped"),
                Err(e) => error!(%agent_id, amount, error = %e, "failed to reverse commission"),
            }
        }
    }
}
