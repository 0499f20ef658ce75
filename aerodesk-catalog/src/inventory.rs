use std::collections::HashSet;

use crate::flight::{Flight, SeatClass};

/// Identifier for the seat at a 1-based index within a class, e.g. `E12`.
pub fn seat_id(class: SeatClass, index: u32) -> String {
    format!("{}{}", class.prefix(), index)
}

/// Split a seat identifier into its class and 1-based index.
pub fn parse_seat_id(seat: &str) -> Option<(SeatClass, u32)> {
    let mut chars = seat.chars();
    let class = SeatClass::from_prefix(chars.next()?)?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((class, index))
}

/// Resolves a booking request into a concrete, conflict-free seat set.
///
/// Works on a read-only snapshot of the flight and has no side effects. The result is only a
/// candidate: the store still has to commit it with a conditional update, which may lose a race.
pub struct SeatAllocator;

impl SeatAllocator {
    /// Validate the caller's explicit seats, or auto-allocate when none were given.
    pub fn resolve(
        flight: &Flight,
        class: SeatClass,
        requested: u32,
        explicit: &[String],
    ) -> Result<Vec<String>, AllocationError> {
        if requested == 0 {
            return Err(AllocationError::InvalidSeatCount);
        }

        if explicit.is_empty() {
            Self::auto_allocate(flight, class, requested)
        } else {
            Self::validate_explicit(flight, class, requested, explicit)
        }
    }

    fn validate_explicit(
        flight: &Flight,
        class: SeatClass,
        requested: u32,
        explicit: &[String],
    ) -> Result<Vec<String>, AllocationError> {
        if explicit.len() != requested as usize {
            return Err(AllocationError::CountMismatch {
                requested,
                provided: explicit.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for seat in explicit {
            if !seen.insert(seat.as_str()) && !duplicates.contains(seat) {
                duplicates.push(seat.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(AllocationError::DuplicateSeat { seats: duplicates });
        }

        let total = flight.seats.get(class).total;
        let invalid: Vec<String> = explicit
            .iter()
            .filter(|seat| match parse_seat_id(seat) {
                Some((seat_class, index)) => seat_class != class || index > total,
                None => true,
            })
            .cloned()
            .collect();
        if !invalid.is_empty() {
            return Err(AllocationError::InvalidSeat { class, seats: invalid });
        }

        let taken: Vec<String> = explicit
            .iter()
            .filter(|seat| flight.is_booked(seat))
            .cloned()
            .collect();
        if !taken.is_empty() {
            return Err(AllocationError::SeatUnavailable { seats: taken });
        }

        Ok(explicit.to_vec())
    }

    /// Lowest free indices first: `<prefix>1 ..= <prefix><total>`, skipping booked seats.
    fn auto_allocate(flight: &Flight, class: SeatClass, requested: u32) -> Result<Vec<String>, AllocationError> {
        let booked: HashSet<&str> = flight.booked_seats.iter().map(String::as_str).collect();
        let total = flight.seats.get(class).total;

        let mut selected = Vec::with_capacity(requested as usize);
        for index in 1..=total {
            if selected.len() == requested as usize {
                break;
            }
            let seat = seat_id(class, index);
            if !booked.contains(seat.as_str()) {
                selected.push(seat);
            }
        }

        // A short selection holds every free seat in the class.
        if selected.len() < requested as usize {
            return Err(AllocationError::InsufficientInventory {
                requested,
                available: selected.len() as u32,
            });
        }

        Ok(selected)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("At least one seat must be requested")]
    InvalidSeatCount,

    #[error("Seat count mismatch: you specified {requested} seats but provided {provided} seat numbers")]
    CountMismatch {
        requested: u32,
        provided: usize,
    },

    #[error("Duplicate seat numbers are not allowed: {}", .seats.join(", "))]
    DuplicateSeat { seats: Vec<String> },

    #[error("Seat(s) {} do not exist in {class}", .seats.join(", "))]
    InvalidSeat { class: SeatClass, seats: Vec<String> },

    #[error("Seat(s) {} already booked", .seats.join(", "))]
    SeatUnavailable { seats: Vec<String> },

    #[error("Not enough available seats for auto-allocation: requested {requested}, available {available}")]
    InsufficientInventory {
        requested: u32,
        available: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::tests::sample_flight;

    fn seats(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seat_id_parsing() {
        assert_eq!(seat_id(SeatClass::FirstClass, 3), "F3");
        assert_eq!(parse_seat_id("E12"), Some((SeatClass::Economy, 12)));
        assert_eq!(parse_seat_id("B1"), Some((SeatClass::Business, 1)));
        assert_eq!(parse_seat_id("E"), None);
        assert_eq!(parse_seat_id("E0"), None);
        assert_eq!(parse_seat_id("E01"), None);
        assert_eq!(parse_seat_id("X4"), None);
        assert_eq!(parse_seat_id("E4a"), None);
    }

    #[test]
    fn test_auto_allocation_takes_lowest_free_indices() {
        let flight = sample_flight(10, 4, 2);
        let result = SeatAllocator::resolve(&flight, SeatClass::Economy, 3, &[]).unwrap();
        assert_eq!(result, seats(&["E1", "E2", "E3"]));
    }

    #[test]
    fn test_auto_allocation_skips_booked_seats() {
        let mut flight = sample_flight(10, 4, 2);
        flight.reserve_seats(SeatClass::Economy, &seats(&["E1", "E3"])).unwrap();
        flight.reserve_seats(SeatClass::Business, &seats(&["B2"])).unwrap();

        let economy = SeatAllocator::resolve(&flight, SeatClass::Economy, 3, &[]).unwrap();
        assert_eq!(economy, seats(&["E2", "E4", "E5"]));

        let business = SeatAllocator::resolve(&flight, SeatClass::Business, 2, &[]).unwrap();
        assert_eq!(business, seats(&["B1", "B3"]));
        assert!(business.iter().all(|s| !flight.is_booked(s)));
    }

    #[test]
    fn test_auto_allocation_insufficient_inventory() {
        let mut flight = sample_flight(10, 4, 2);
        flight.reserve_seats(SeatClass::FirstClass, &seats(&["F2"])).unwrap();

        let err = SeatAllocator::resolve(&flight, SeatClass::FirstClass, 2, &[]).unwrap_err();
        assert_eq!(err, AllocationError::InsufficientInventory { requested: 2, available: 1 });
    }

    #[test]
    fn test_shortfall_reports_every_free_seat() {
        let mut flight = sample_flight(5, 0, 0);
        flight.reserve_seats(SeatClass::Economy, &seats(&["E1", "E3", "E5"])).unwrap();

        let err = SeatAllocator::resolve(&flight, SeatClass::Economy, 3, &[]).unwrap_err();
        assert_eq!(err, AllocationError::InsufficientInventory { requested: 3, available: 2 });

        let result = SeatAllocator::resolve(&flight, SeatClass::Economy, 2, &[]).unwrap();
        assert_eq!(result, seats(&["E2", "E4"]));
    }

    #[test]
    fn test_explicit_count_mismatch() {
        let flight = sample_flight(10, 4, 2);
        let err = SeatAllocator::resolve(&flight, SeatClass::Economy, 3, &seats(&["E1", "E2"])).unwrap_err();
        assert_eq!(err, AllocationError::CountMismatch { requested: 3, provided: 2 });
    }

    #[test]
    fn test_explicit_duplicates_rejected() {
        let flight = sample_flight(10, 4, 2);
        let err = SeatAllocator::resolve(&flight, SeatClass::Economy, 3, &seats(&["E1", "E2", "E1"])).unwrap_err();
        assert_eq!(err, AllocationError::DuplicateSeat { seats: seats(&["E1"]) });
    }

    #[test]
    fn test_explicit_seat_must_belong_to_class() {
        let flight = sample_flight(10, 4, 2);
        let err = SeatAllocator::resolve(&flight, SeatClass::Economy, 2, &seats(&["E1", "B1"])).unwrap_err();
        assert_eq!(err, AllocationError::InvalidSeat { class: SeatClass::Economy, seats: seats(&["B1"]) });

        let err = SeatAllocator::resolve(&flight, SeatClass::Business, 1, &seats(&["B5"])).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidSeat { .. }));
    }

    #[test]
    fn test_explicit_conflict_names_booked_seats() {
        let mut flight = sample_flight(10, 4, 2);
        flight.reserve_seats(SeatClass::Economy, &seats(&["E1"])).unwrap();

        let err = SeatAllocator::resolve(&flight, SeatClass::Economy, 2, &seats(&["E1", "E2"])).unwrap_err();
        assert_eq!(err, AllocationError::SeatUnavailable { seats: seats(&["E1"]) });
        assert_eq!(err.to_string(), "Seat(s) E1 already booked");
    }

    #[test]
    fn test_explicit_seats_returned_in_caller_order() {
        let flight = sample_flight(10, 4, 2);
        let result = SeatAllocator::resolve(&flight, SeatClass::Economy, 2, &seats(&["E7", "E2"])).unwrap();
        assert_eq!(result, seats(&["E7", "E2"]));
    }

    #[test]
    fn test_zero_seats_rejected() {
        let flight = sample_flight(10, 4, 2);
        assert_eq!(
            SeatAllocator::resolve(&flight, SeatClass::Economy, 0, &[]),
            Err(AllocationError::InvalidSeatCount)
        );
    }
}
