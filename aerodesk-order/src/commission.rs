use crate::models::Booking;

/// Flat amount credited to an agent per brokered booking.
pub const DEFAULT_AGENT_COMMISSION: i64 = 100;

/// Decides how much commission an agent earns, and how much is reversed on cancellation.
///
/// The commission is billed to the customer on top of the fare and credited to the agent.
pub trait CommissionPolicy: Send + Sync {
    fn on_booking(&self, seat_fare: i64) -> i64;

    fn on_cancellation(&self, booking: &Booking) -> i64;
}

/// Same fixed amount for every booking, regardless of fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatCommission {
    pub amount: i64,
}

impl FlatCommission {
    pub fn new(amount: i64) -> Self {
        Self { amount }
    }
}

impl Default for FlatCommission {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_COMMISSION)
    }
}

impl CommissionPolicy for FlatCommission {
    fn on_booking(&self, _seat_fare: i64) -> i64 {
        self.amount
    }

    fn on_cancellation(&self, _booking: &Booking) -> i64 {
        self.amount
    }
}
