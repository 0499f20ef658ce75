use aerodesk_order::{Booking, BookingStatus};
use aerodesk_shared::models::BookingCancelledEvent;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::booking::BookingService;
use crate::error::{CoreError, CoreResult};
use crate::events::publish_event;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub booking_id: Uuid,
    pub user_id: String,
    /// Agent whose commission is reversed. Ignored unless it brokered the booking.
    #[serde(default)]
    pub agent_id: Option<Uuid>,
}

impl BookingService {
    #[instrument(skip(self, request), fields(booking_id = %request.booking_id))]
    pub async fn cancel_booking(&self, request: CancelBookingRequest) -> CoreResult<Booking> {
        // 1. Booking
        let booking = self
            .bookings
            .find_by_id(request.booking_id)
            .await?
            .ok_or_else(|| CoreError::booking_not_found(request.booking_id))?;

        // 2. Ownership
        if booking.user_id != request.user_id {
            warn!("cancellation by a different user rejected");
            return Err(CoreError::Unauthorized);
        }

        // 3. Once only
        let mut cancelled = booking.clone();
        cancelled.cancel()?;

        // 4. Flight
        let orphaned = || CoreError::OrphanedBooking {
            booking_id: booking.id,
            flight_id: booking.flight_id,
        };
        if self.flights.find_by_id(booking.flight_id).await?.is_none() {
            error!(flight_id = %booking.flight_id, "booking references a missing flight");
            return Err(orphaned());
        }

        // 6 before 5: only the caller that wins the status transition releases the seats.
        let cancelled = self
            .bookings
            .update_status_if(booking.id, booking.status, cancelled.status)
            .await?
            .ok_or(CoreError::AlreadyCancelled(booking.id))?;

        // 5. Restore inventory
        let released = self
            .flights
            .release_seats(booking.flight_id, booking.seat_class, &booking.seat_numbers)
            .await;
        let failure = match released {
            Ok(Some(_)) => None,
            Ok(None) => Some(orphaned()),
            Err(e) => Some(CoreError::from(e)),
        };
        if let Some(failure) = failure {
            self.revert_cancellation(&booking).await;
            return Err(failure);
        }

        // 7. Commission reversal, only for the agent credited with this booking
        match request.agent_id {
            Some(agent_id) if booking.agent_id == Some(agent_id) => {
                let amount = self.commission.on_cancellation(&booking);
                match self.agents.debit_commission(agent_id, amount).await {
                    Ok(Some(agent)) => info!(%agent_id, total = agent.total_commission, "commission reversed"),
                    Ok(None) => info!(%agent_id, amount, "commission reversal skipped"),
                    Err(e) => error!(%agent_id, amount, error = %e, "failed to reverse commission"),
                }
            }
            Some(agent_id) => warn!(%agent_id, "agent did not broker this booking, commission kept"),
            None => {}
        }

        info!(seats = ?booking.seat_numbers, "booking cancelled");

        let event = BookingCancelledEvent {
            booking_id: cancelled.id,
            flight_id: cancelled.flight_id,
            user_id: cancelled.user_id.clone(),
            released_seats: cancelled.seat_numbers.clone(),
            timestamp: Utc::now().timestamp(),
        };
        publish_event(self.events.as_ref(), &event).await;

        // 8.
        Ok(cancelled)
    }

    async fn revert_cancellation(&self, booking: &Booking) {
        if let Err(e) = self
            .bookings
            .update_status_if(booking.id, BookingStatus::Cancelled, booking.status)
            .await
        {
            error!(booking_id = %booking.id, error = %e, "failed to revert cancellation");
        }
    }
}
