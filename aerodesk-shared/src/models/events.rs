use uuid::Uuid;

pub const BOOKING_CONFIRMED_TOPIC: &str = "booking.confirmed";
pub const BOOKING_CANCELLED_TOPIC: &str = "booking.cancelled";

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub flight_id: Uuid,
    pub user_id: String,
    pub agent_id: Option<Uuid>,
    pub seat_class: String,
    pub seat_numbers: Vec<String>,
    pub total_amount: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub flight_id: Uuid,
    pub user_id: String,
    pub released_seats: Vec<String>,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_event_wire_format() {
        let event = BookingConfirmedEvent {
            booking_id: Uuid::nil(),
            flight_id: Uuid::nil(),
            user_id: "user-1".to_string(),
            agent_id: None,
            seat_class: "economy".to_string(),
            seat_numbers: vec!["E1".to_string(), "E2".to_string()],
            total_amount: 10_100,
            timestamp: 1_700_000_000,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["seat_numbers"], serde_json::json!(["E1", "E2"]));
        assert_eq!(json["agent_id"], serde_json::Value::Null);

        let parsed: BookingConfirmedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }
}
