use std::collections::HashMap;
use std::sync::Arc;

use aerodesk_catalog::{Flight, FlightStatus, SeatClass};
use aerodesk_core::{AgentRepository, BookingFilter, BookingRepository, FlightRepository, RepositoryError};
use aerodesk_order::{Agent, Booking, BookingStatus};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Flights held in process memory.
///
/// Every mutation takes the write lock once, so a conditional seat update checks and applies
/// without any other writer in between.
#[derive(Clone, Default)]
pub struct InMemoryFlightRepository {
    flights: Arc<RwLock<HashMap<Uuid, Flight>>>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Flight>, RepositoryError> {
        Ok(self.flights.read().await.get(&id).cloned())
    }

    async fn find_by_number(&self, flight_number: &str) -> Result<Option<Flight>, RepositoryError> {
        Ok(self
            .flights
            .read()
            .await
            .values()
            .find(|f| f.flight_number == flight_number)
            .cloned())
    }

    async fn search(
        &self,
        source: &str,
        destination: &str,
        date: Option<&str>,
    ) -> Result<Vec<Flight>, RepositoryError> {
        let flights = self.flights.read().await;
        let mut found: Vec<Flight> = flights
            .values()
            .filter(|f| f.source.eq_ignore_ascii_case(source))
            .filter(|f| f.destination.eq_ignore_ascii_case(destination))
            .filter(|f| date.map_or(true, |d| f.date == d))
            .cloned()
            .collect();
        found.sort_by(|a, b| (&a.date, &a.departure_time).cmp(&(&b.date, &b.departure_time)));
        Ok(found)
    }

    async fn insert(&self, flight: &Flight) -> Result<(), RepositoryError> {
        let mut flights = self.flights.write().await;
        if flights.values().any(|f| f.flight_number == flight.flight_number) {
            return Err(format!("flight number {} already exists", flight.flight_number).into());
        }
        flights.insert(flight.id, flight.clone());
        Ok(())
    }

    async fn update(&self, flight: &Flight) -> Result<(), RepositoryError> {
        let mut flights = self.flights.write().await;
        match flights.get_mut(&flight.id) {
            Some(stored) => {
                *stored = flight.clone();
                Ok(())
            }
            None => Err(format!("flight {} does not exist", flight.id).into()),
        }
    }

    async fn update_status(&self, id: Uuid, status: FlightStatus) -> Result<Option<Flight>, RepositoryError> {
        let mut flights = self.flights.write().await;
        Ok(flights.get_mut(&id).map(|flight| {
            flight.status = status;
            flight.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.flights.write().await.remove(&id).is_some())
    }

    async fn conditional_update_seats(
        &self,
        id: Uuid,
        class: SeatClass,
        seats: &[String],
    ) -> Result<Option<Flight>, RepositoryError> {
        let mut flights = self.flights.write().await;
        let Some(flight) = flights.get_mut(&id) else {
            return Ok(None);
        };
        Ok(flight.reserve_seats(class, seats).ok().map(|_| flight.clone()))
    }

    async fn release_seats(
        &self,
        id: Uuid,
        class: SeatClass,
        seats: &[String],
    ) -> Result<Option<Flight>, RepositoryError> {
        let mut flights = self.flights.write().await;
        Ok(flights.get_mut(&id).map(|flight| {
            flight.release_seats(class, seats);
            flight.clone()
        }))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepositoryError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(format!("booking {} already exists", booking.id).into());
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.write().await;
        match bookings.get_mut(&booking.id) {
            Some(stored) => {
                *stored = booking.clone();
                Ok(())
            }
            None => Err(format!("booking {} does not exist", booking.id).into()),
        }
    }

    async fn update_status_if(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Option<Booking>, RepositoryError> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings
            .get_mut(&id)
            .filter(|booking| booking.status == expected)
            .map(|booking| {
                booking.status = next;
                booking.clone()
            }))
    }

    async fn find_by_filter(&self, filter: &BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<Booking> = bookings.values().filter(|b| filter.matches(b)).cloned().collect();
        found.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        Ok(found)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAgentRepository {
    agents: Arc<RwLock<HashMap<Uuid, Agent>>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.agents.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>, RepositoryError> {
        Ok(self
            .agents
            .read()
            .await
            .values()
            .find(|a| a.email.expose() == email)
            .cloned())
    }

    async fn insert(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let mut agents = self.agents.write().await;
        if agents.values().any(|a| a.email == agent.email) {
            return Err("agent email already registered".into());
        }
        agents.insert(agent.id, agent.clone());
        Ok(())
    }

    async fn update(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let mut agents = self.agents.write().await;
        match agents.get_mut(&agent.id) {
            Some(stored) => {
                *stored = agent.clone();
                Ok(())
            }
            None => Err(format!("agent {} does not exist", agent.id).into()),
        }
    }

    async fn credit_commission(&self, id: Uuid, amount: i64) -> Result<Option<Agent>, RepositoryError> {
        let mut agents = self.agents.write().await;
        Ok(agents.get_mut(&id).map(|agent| {
            agent.credit_commission(amount);
            agent.clone()
        }))
    }

    async fn debit_commission(&self, id: Uuid, amount: i64) -> Result<Option<Agent>, RepositoryError> {
        let mut agents = self.agents.write().await;
        let Some(agent) = agents.get_mut(&id) else {
            return Ok(None);
        };
        if !agent.debit_commission(amount) {
            return Ok(None);
        }
        Ok(Some(agent.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerodesk_catalog::{ClassInventory, FareTable, SeatTable};

    fn flight(number: &str, date: &str, departure: &str) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            flight_number: number.to_string(),
            airline: "Vistara".to_string(),
            model: "B787".to_string(),
            source: "DEL".to_string(),
            destination: "BLR".to_string(),
            date: date.to_string(),
            departure_time: departure.to_string(),
            arrival_time: "23:00".to_string(),
            duration: None,
            fare: FareTable { economy: 4000, business: 11000, first_class: 20000 },
            seats: SeatTable {
                economy: ClassInventory::new(3),
                business: ClassInventory::new(1),
                first_class: ClassInventory::new(0),
            },
            booked_seats: Vec::new(),
            status: FlightStatus::Scheduled,
            features: Vec::new(),
        }
    }

    fn seats(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_conditional_update_applies_once() {
        let repo = InMemoryFlightRepository::new();
        let f = flight("UK-801", "2025-06-01", "08:00");
        repo.insert(&f).await.unwrap();

        let updated = repo
            .conditional_update_seats(f.id, SeatClass::Economy, &seats(&["E1", "E2"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.seats.economy.available, 1);

        let second = repo
            .conditional_update_seats(f.id, SeatClass::Economy, &seats(&["E2"]))
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = repo.find_by_id(f.id).await.unwrap().unwrap();
        assert_eq!(stored.booked_seats, seats(&["E1", "E2"]));
        assert_eq!(stored.seats.economy.available, 1);
    }

    #[tokio::test]
    async fn test_conditional_update_respects_counter() {
        let repo = InMemoryFlightRepository::new();
        let f = flight("UK-802", "2025-06-01", "08:00");
        repo.insert(&f).await.unwrap();

        let result = repo
            .conditional_update_seats(f.id, SeatClass::Business, &seats(&["B1", "B2"]))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(repo
            .conditional_update_seats(Uuid::new_v4(), SeatClass::Economy, &seats(&["E1"]))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_search_is_sorted_and_date_optional() {
        let repo = InMemoryFlightRepository::new();
        repo.insert(&flight("UK-3", "2025-06-02", "07:00")).await.unwrap();
        repo.insert(&flight("UK-2", "2025-06-01", "18:00")).await.unwrap();
        repo.insert(&flight("UK-1", "2025-06-01", "06:00")).await.unwrap();

        let all = repo.search("del", "blr", None).await.unwrap();
        let numbers: Vec<&str> = all.iter().map(|f| f.flight_number.as_str()).collect();
        assert_eq!(numbers, vec!["UK-1", "UK-2", "UK-3"]);

        let one_day = repo.search("DEL", "BLR", Some("2025-06-02")).await.unwrap();
        assert_eq!(one_day.len(), 1);
        assert!(repo.search("BLR", "DEL", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_flight_number_rejected() {
        let repo = InMemoryFlightRepository::new();
        repo.insert(&flight("UK-9", "2025-06-01", "06:00")).await.unwrap();
        assert!(repo.insert(&flight("UK-9", "2025-06-03", "06:00")).await.is_err());
    }

    #[tokio::test]
    async fn test_debit_skipped_below_amount() {
        let repo = InMemoryAgentRepository::new();
        let agent = Agent::new(
            "Meera".to_string(),
            "meera@flyhigh.in".to_string(),
            "9000000000".to_string(),
            "FlyHigh".to_string(),
        );
        repo.insert(&agent).await.unwrap();

        assert!(repo.debit_commission(agent.id, 100).await.unwrap().is_none());
        let credited = repo.credit_commission(agent.id, 100).await.unwrap().unwrap();
        assert_eq!(credited.total_commission, 100);
        let debited = repo.debit_commission(agent.id, 100).await.unwrap().unwrap();
        assert_eq!(debited.total_commission, 0);
        assert_eq!(
            repo.find_by_email("meera@flyhigh.in").await.unwrap().unwrap().id,
            agent.id
        );
    }
}
