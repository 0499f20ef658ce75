use aerodesk_catalog::SeatClass;
use aerodesk_shared::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BookingStatus {
    #[default]
    Booked,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Booked => "Booked",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Booked" => Ok(BookingStatus::Booked),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            "Completed" => Ok(BookingStatus::Completed),
            other => Err(ParseEnumError::new("booking status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(PaymentStatus::Paid),
            "Pending" => Ok(PaymentStatus::Pending),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(ParseEnumError::new("payment status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Net Banking")]
    NetBanking,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::NetBanking => "Net Banking",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Credit Card" => Ok(PaymentMethod::CreditCard),
            "Debit Card" => Ok(PaymentMethod::DebitCard),
            "UPI" => Ok(PaymentMethod::Upi),
            "Net Banking" => Ok(PaymentMethod::NetBanking),
            other => Err(ParseEnumError::new("payment method", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

/// A food add-on ordered with the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodOption {
    pub item: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Display/audit reference only, not used for reconciliation.
    pub transaction_id: Option<String>,
}

/// A passenger's seat reservation on one flight.
///
/// Flight, user and agent are referenced by id only; the booking workflow checks they exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub user_id: String,
    pub agent_id: Option<Uuid>,
    pub passenger_name: Masked<String>,
    pub seats_booked: u32,
    pub seat_class: SeatClass,
    pub seat_numbers: Vec<String>,
    pub food_options: Vec<FoodOption>,
    pub payment: Payment,
    /// Commission credited to `agent_id` when the booking was made.
    pub agent_commission: i64,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    /// Transition: Booked/Completed → Cancelled. Happens at most once.
    pub fn cancel(&mut self) -> Result<(), BookingTransitionError> {
        if self.status == BookingStatus::Cancelled {
            return Err(BookingTransitionError::AlreadyCancelled(self.id));
        }
        self.status = BookingStatus::Cancelled;
        Ok(())
    }

    /// Transition: Booked → Completed (flight flown).
    pub fn complete(&mut self) -> Result<(), BookingTransitionError> {
        if self.status != BookingStatus::Booked {
            return Err(BookingTransitionError::InvalidTransition {
                from: self.status,
                to: BookingStatus::Completed,
            });
        }
        self.status = BookingStatus::Completed;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingTransitionError {
    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            agent_id: None,
            passenger_name: Masked::new("Asha Rao".to_string()),
            seats_booked: 2,
            seat_class: SeatClass::Economy,
            seat_numbers: vec!["E1".to_string(), "E2".to_string()],
            food_options: vec![FoodOption { item: "Veg Meal".to_string(), price: 250 }],
            payment: Payment {
                amount: 10250,
                method: PaymentMethod::Upi,
                status: PaymentStatus::Paid,
                transaction_id: Some("TXN1700000000000-A1B2C3".to_string()),
            },
            agent_commission: 0,
            status: BookingStatus::Booked,
            booking_date: Utc::now(),
        }
    }

    #[test]
    fn test_cancel_happens_once() {
        let mut booking = sample_booking();
        booking.cancel().unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert!(!booking.is_active());

        let err = booking.cancel().unwrap_err();
        assert_eq!(err, BookingTransitionError::AlreadyCancelled(booking.id));
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_complete_only_from_booked() {
        let mut booking = sample_booking();
        booking.complete().unwrap();
        assert_eq!(booking.status, BookingStatus::Completed);
        assert!(booking.complete().is_err());
    }

    #[test]
    fn test_wire_names() {
        let booking = sample_booking();
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["seatClass"], "economy");
        assert_eq!(json["payment"]["method"], "UPI");
        assert_eq!(json["payment"]["status"], "Paid");
        assert_eq!(json["status"], "Booked");
        assert_eq!(json["passengerName"], "Asha Rao");
        assert!(!format!("{:?}", booking).contains("Asha"));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Net Banking".parse::<PaymentMethod>().unwrap(), PaymentMethod::NetBanking);
        assert_eq!("Failed".parse::<PaymentStatus>().unwrap(), PaymentStatus::Failed);
        assert_eq!("Completed".parse::<BookingStatus>().unwrap(), BookingStatus::Completed);
        assert!("Refunded".parse::<BookingStatus>().is_err());
    }
}
