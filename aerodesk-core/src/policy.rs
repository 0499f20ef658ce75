use aerodesk_order::PaymentMethod;

/// Business limits applied by the booking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Largest `seatsBooked` accepted in a single request.
    pub max_seats_per_booking: u32,
    /// Cap on the sum of a user's non-cancelled seats on one flight.
    pub max_seats_per_user_per_flight: u32,
    /// Agent-attributed requests skip `max_seats_per_booking`. The per-user cap still applies.
    pub waive_booking_cap_for_agents: bool,
    pub default_payment_method: PaymentMethod,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_seats_per_booking: 5,
            max_seats_per_user_per_flight: 5,
            waive_booking_cap_for_agents: true,
            default_payment_method: PaymentMethod::Upi,
        }
    }
}

impl BookingPolicy {
    pub fn booking_cap_applies(&self, has_agent: bool) -> bool {
        !(has_agent && self.waive_booking_cap_for_agents)
    }
}
