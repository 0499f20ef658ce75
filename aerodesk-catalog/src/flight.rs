use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::inventory::{parse_seat_id, AllocationError};

/// Cabin class. Each class has its own fare and seat-count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeatClass {
    Economy,
    Business,
    FirstClass,
}

impl SeatClass {
    pub const ALL: [SeatClass; 3] = [SeatClass::Economy, SeatClass::Business, SeatClass::FirstClass];

    /// Prefix used for seat identifiers of this class (`E12`, `B3`, `F1`).
    pub fn prefix(self) -> char {
        match self {
            SeatClass::Economy => 'E',
            SeatClass::Business => 'B',
            SeatClass::FirstClass => 'F',
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'E' => Some(SeatClass::Economy),
            'B' => Some(SeatClass::Business),
            'F' => Some(SeatClass::FirstClass),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatClass::Economy => "economy",
            SeatClass::Business => "business",
            SeatClass::FirstClass => "firstClass",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatClass {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(SeatClass::Economy),
            "business" => Ok(SeatClass::Business),
            "firstClass" => Ok(SeatClass::FirstClass),
            other => Err(FlightError::UnknownSeatClass(other.to_string())),
        }
    }
}

/// Per-seat fare for each class, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareTable {
    pub economy: i64,
    pub business: i64,
    pub first_class: i64,
}

impl FareTable {
    /// Upper bound on a per-seat fare.
    pub const MAX_FARE: i64 = 100_000_000;

    pub fn get(&self, class: SeatClass) -> i64 {
        match class {
            SeatClass::Economy => self.economy,
            SeatClass::Business => self.business,
            SeatClass::FirstClass => self.first_class,
        }
    }

    /// Every fare must lie in `0..=MAX_FARE`.
    pub fn validate(&self) -> Result<(), FlightError> {
        for class in SeatClass::ALL {
            let fare = self.get(class);
            if !(0..=Self::MAX_FARE).contains(&fare) {
                return Err(FlightError::InvalidFare { class, fare });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInventory {
    pub total: u32,
    pub available: u32,
}

impl ClassInventory {
    /// Upper bound on the seats in one class.
    pub const MAX_SEATS: u32 = 10_000;

    pub fn new(total: u32) -> Self {
        Self { total, available: total }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatTable {
    pub economy: ClassInventory,
    pub business: ClassInventory,
    pub first_class: ClassInventory,
}

impl SeatTable {
    pub fn get(&self, class: SeatClass) -> &ClassInventory {
        match class {
            SeatClass::Economy => &self.economy,
            SeatClass::Business => &self.business,
            SeatClass::FirstClass => &self.first_class,
        }
    }

    pub fn get_mut(&mut self, class: SeatClass) -> &mut ClassInventory {
        match class {
            SeatClass::Economy => &mut self.economy,
            SeatClass::Business => &mut self.business,
            SeatClass::FirstClass => &mut self.first_class,
        }
    }
}

/// Operational status, driven by administrators and independent of seat inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlightStatus {
    #[default]
    Scheduled,
    #[serde(rename = "On Time")]
    OnTime,
    Delayed,
    Cancelled,
    Completed,
}

impl FlightStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "Scheduled",
            FlightStatus::OnTime => "On Time",
            FlightStatus::Delayed => "Delayed",
            FlightStatus::Cancelled => "Cancelled",
            FlightStatus::Completed => "Completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, FlightStatus::Cancelled | FlightStatus::Completed)
    }

    /// Scheduled → On Time → Delayed/Cancelled → Completed.
    pub fn can_transition_to(self, next: FlightStatus) -> bool {
        use FlightStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (Scheduled, OnTime | Delayed | Cancelled) => true,
            (OnTime, Delayed | Cancelled | Completed) => true,
            (Delayed, OnTime | Cancelled | Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(FlightStatus::Scheduled),
            "On Time" => Ok(FlightStatus::OnTime),
            "Delayed" => Ok(FlightStatus::Delayed),
            "Cancelled" => Ok(FlightStatus::Cancelled),
            "Completed" => Ok(FlightStatus::Completed),
            other => Err(FlightError::UnknownStatus(other.to_string())),
        }
    }
}

/// A scheduled flight together with its seat inventory.
///
/// The flight exclusively owns its per-class counters and the booked-seat set. For every class
/// `available == total - booked seats carrying that class prefix`, and `booked_seats` holds no
/// duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub airline: String,
    pub model: String,
    pub source: String,
    pub destination: String,
    pub date: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: Option<String>,
    pub fare: FareTable,
    pub seats: SeatTable,
    #[serde(default)]
    pub booked_seats: Vec<String>,
    #[serde(default)]
    pub status: FlightStatus,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Flight {
    pub fn is_booked(&self, seat: &str) -> bool {
        self.booked_seats.iter().any(|s| s == seat)
    }

    pub fn booked_in_class(&self, class: SeatClass) -> usize {
        self.booked_seats
            .iter()
            .filter(|s| s.starts_with(class.prefix()))
            .count()
    }

    /// Check the seat-table invariants. Used when a flight is created or replaced wholesale.
    pub fn validate_inventory(&self) -> Result<(), FlightError> {
        let mut seen = HashSet::new();
        for seat in &self.booked_seats {
            if !seen.insert(seat.as_str()) {
                return Err(FlightError::DuplicateBookedSeat(seat.clone()));
            }
            let valid = parse_seat_id(seat)
                .map(|(class, index)| index <= self.seats.get(class).total)
                .unwrap_or(false);
            if !valid {
                return Err(FlightError::InvalidBookedSeat(seat.clone()));
            }
        }

        for class in SeatClass::ALL {
            let inventory = self.seats.get(class);
            if inventory.total > ClassInventory::MAX_SEATS {
                return Err(FlightError::TooManySeats {
                    class,
                    total: inventory.total,
                });
            }
            let booked = self.booked_in_class(class) as u32;
            if inventory.available + booked != inventory.total {
                return Err(FlightError::InconsistentInventory {
                    class,
                    total: inventory.total,
                    available: inventory.available,
                    booked,
                });
            }
        }

        Ok(())
    }

    /// Apply a reservation: decrement the class counter and add the seats, but only if none of them
    /// are booked and enough seats remain. Leaves the flight untouched on failure.
    pub fn reserve_seats(&mut self, class: SeatClass, seats: &[String]) -> Result<(), AllocationError> {
        let taken: Vec<String> = seats.iter().filter(|s| self.is_booked(s)).cloned().collect();
        if !taken.is_empty() {
            return Err(AllocationError::SeatUnavailable { seats: taken });
        }

        let inventory = self.seats.get_mut(class);
        let requested = seats.len() as u32;
        if inventory.available < requested {
            return Err(AllocationError::InsufficientInventory {
                requested,
                available: inventory.available,
            });
        }

        inventory.available -= requested;
        self.booked_seats.extend(seats.iter().cloned());
        Ok(())
    }

    /// Return seats to the pool. Seats that are not currently booked are ignored, and the counter
    /// never exceeds the class total.
    pub fn release_seats(&mut self, class: SeatClass, seats: &[String]) {
        let before = self.booked_seats.len();
        self.booked_seats.retain(|s| !seats.contains(s));
        let released = (before - self.booked_seats.len()) as u32;

        let inventory = self.seats.get_mut(class);
        inventory.available = (inventory.available + released).min(inventory.total);
    }

    pub fn set_status(&mut self, next: FlightStatus) -> Result<(), FlightError> {
        if !self.status.can_transition_to(next) {
            return Err(FlightError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FlightError {
    #[error("Invalid seat class: {0}")]
    UnknownSeatClass(String),

    #[error("Invalid status: {0}")]
    UnknownStatus(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: FlightStatus,
        to: FlightStatus,
    },

    #[error("Invalid {class} fare {fare}: must be between 0 and {}", FareTable::MAX_FARE)]
    InvalidFare { class: SeatClass, fare: i64 },

    #[error("Seat {0} appears more than once in booked seats")]
    DuplicateBookedSeat(String),

    #[error("Booked seat {0} does not exist on this flight")]
    InvalidBookedSeat(String),

    #[error("{class} has {total} seats, more than the {} allowed", ClassInventory::MAX_SEATS)]
    TooManySeats { class: SeatClass, total: u32 },

    #[error("Inconsistent {class} inventory: total {total}, available {available}, booked {booked}")]
    InconsistentInventory {
        class: SeatClass,
        total: u32,
        available: u32,
        booked: u32,
    },
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_flight(economy: u32, business: u32, first: u32) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            flight_number: "AI-101".to_string(),
            airline: "Air India".to_string(),
            model: "A320".to_string(),
            source: "DEL".to_string(),
            destination: "BOM".to_string(),
            date: "2025-03-14".to_string(),
            departure_time: "09:30".to_string(),
            arrival_time: "11:45".to_string(),
            duration: Some("2h 15m".to_string()),
            fare: FareTable { economy: 5000, business: 12000, first_class: 25000 },
            seats: SeatTable {
                economy: ClassInventory::new(economy),
                business: ClassInventory::new(business),
                first_class: ClassInventory::new(first),
            },
            booked_seats: Vec::new(),
            status: FlightStatus::Scheduled,
            features: Vec::new(),
        }
    }

    fn seats(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seat_class_round_trips_through_str() {
        for class in SeatClass::ALL {
            assert_eq!(class.as_str().parse::<SeatClass>().unwrap(), class);
            assert_eq!(SeatClass::from_prefix(class.prefix()), Some(class));
        }
        assert!("premiumEconomy".parse::<SeatClass>().is_err());
    }

    #[test]
    fn test_serde_uses_original_field_names() {
        let flight = sample_flight(10, 4, 2);
        let json = serde_json::to_value(&flight).unwrap();
        assert_eq!(json["fare"]["firstClass"], 25000);
        assert_eq!(json["seats"]["economy"]["available"], 10);
        assert_eq!(json["status"], "Scheduled");
        assert!(json["bookedSeats"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_reserve_and_release_keep_invariants() {
        let mut flight = sample_flight(10, 4, 2);

        flight.reserve_seats(SeatClass::Economy, &seats(&["E1", "E2", "E3"])).unwrap();
        assert_eq!(flight.seats.economy.available, 7);
        assert_eq!(flight.booked_in_class(SeatClass::Economy), 3);
        flight.validate_inventory().unwrap();

        flight.release_seats(SeatClass::Economy, &seats(&["E1", "E2", "E3"]));
        assert_eq!(flight.seats.economy.available, 10);
        assert!(flight.booked_seats.is_empty());
        flight.validate_inventory().unwrap();
    }

    #[test]
    fn test_reserve_rejects_conflict_without_mutation() {
        let mut flight = sample_flight(10, 4, 2);
        flight.reserve_seats(SeatClass::Economy, &seats(&["E1"])).unwrap();
        let snapshot = flight.clone();

        let err = flight
            .reserve_seats(SeatClass::Economy, &seats(&["E1", "E2"]))
            .unwrap_err();
        assert_eq!(err, AllocationError::SeatUnavailable { seats: seats(&["E1"]) });
        assert_eq!(flight, snapshot);
    }

    #[test]
    fn test_release_is_clamped_to_total() {
        let mut flight = sample_flight(2, 0, 0);
        flight.reserve_seats(SeatClass::Economy, &seats(&["E1"])).unwrap();

        flight.release_seats(SeatClass::Economy, &seats(&["E1", "E2"]));
        assert_eq!(flight.seats.economy.available, 2);

        // Releasing twice must not inflate the counter.
        flight.release_seats(SeatClass::Economy, &seats(&["E1"]));
        assert_eq!(flight.seats.economy.available, 2);
    }

    #[test]
    fn test_validate_inventory_detects_drift() {
        let mut flight = sample_flight(10, 4, 2);
        flight.booked_seats.push("E4".to_string());
        assert!(matches!(
            flight.validate_inventory(),
            Err(FlightError::InconsistentInventory { class: SeatClass::Economy, .. })
        ));

        let mut flight = sample_flight(10, 4, 2);
        flight.booked_seats.push("B9".to_string());
        flight.seats.business.available = 3;
        assert_eq!(
            flight.validate_inventory(),
            Err(FlightError::InvalidBookedSeat("B9".to_string()))
        );
    }

    #[test]
    fn test_status_lifecycle() {
        let mut flight = sample_flight(1, 1, 1);
        flight.set_status(FlightStatus::OnTime).unwrap();
        flight.set_status(FlightStatus::Delayed).unwrap();
        flight.set_status(FlightStatus::Completed).unwrap();
        assert!(flight.status.is_terminal());

        let result = flight.set_status(FlightStatus::Scheduled);
        assert_eq!(
            result,
            Err(FlightError::InvalidTransition {
                from: FlightStatus::Completed,
                to: FlightStatus::Scheduled,
            })
        );
    }

    #[test]
    fn test_fares_must_be_in_range() {
        let mut flight = sample_flight(1, 1, 1);
        assert_eq!(flight.fare.validate(), Ok(()));

        flight.fare.business = -1;
        assert_eq!(
            flight.fare.validate(),
            Err(FlightError::InvalidFare { class: SeatClass::Business, fare: -1 })
        );

        flight.fare.business = FareTable::MAX_FARE;
        flight.fare.first_class = FareTable::MAX_FARE + 1;
        assert!(matches!(
            flight.fare.validate(),
            Err(FlightError::InvalidFare { class: SeatClass::FirstClass, .. })
        ));
    }

    #[test]
    fn test_class_size_is_bounded() {
        let flight = sample_flight(ClassInventory::MAX_SEATS, 0, 0);
        assert_eq!(flight.validate_inventory(), Ok(()));

        let flight = sample_flight(ClassInventory::MAX_SEATS + 1, 0, 0);
        assert_eq!(
            flight.validate_inventory(),
            Err(FlightError::TooManySeats {
                class: SeatClass::Economy,
                total: ClassInventory::MAX_SEATS + 1,
            })
        );
    }
}
