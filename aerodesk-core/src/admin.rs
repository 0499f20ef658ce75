use std::sync::Arc;

use aerodesk_catalog::{FareTable, Flight, FlightStatus, SeatTable};
use aerodesk_order::Agent;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::repository::{AgentRepository, FlightRepository};

/// A flight as submitted by an administrator, before an id is assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_number: String,
    pub airline: String,
    pub model: String,
    pub source: String,
    pub destination: String,
    pub date: String,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(default)]
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

impl NewFlight {
    fn into_flight(self) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            flight_number: self.flight_number,
            airline: self.airline,
            model: self.model,
            source: self.source,
            destination: self.destination,
            date: self.date,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            duration: self.duration,
            fare: self.fare,
            seats: self.seats,
            booked_seats: self.booked_seats,
            status: self.status,
            features: self.features,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub agency_name: String,
}

/// Flight and agent administration.
#[derive(Clone)]
pub struct AdminService {
    flights: Arc<dyn FlightRepository>,
    agents: Arc<dyn AgentRepository>,
}

impl AdminService {
    pub fn new(flights: Arc<dyn FlightRepository>, agents: Arc<dyn AgentRepository>) -> Self {
        Self { flights, agents }
    }

    #[instrument(skip(self, new_flight), fields(flight_number = %new_flight.flight_number))]
    pub async fn add_flight(&self, new_flight: NewFlight) -> CoreResult<Flight> {
        require("flightNumber", &new_flight.flight_number)?;
        require("airline", &new_flight.airline)?;
        require("source", &new_flight.source)?;
        require("destination", &new_flight.destination)?;
        require("date", &new_flight.date)?;

        let flight = new_flight.into_flight();
        flight.fare.validate()?;
        flight.validate_inventory()?;

        if self.flights.find_by_number(&flight.flight_number).await?.is_some() {
            return Err(ValidationError::DuplicateFlight(flight.flight_number).into());
        }

        self.flights.insert(&flight).await?;
        info!(flight_id = %flight.id, "flight added");
        Ok(flight)
    }

    pub async fn get_flight(&self, id: Uuid) -> CoreResult<Flight> {
        self.flights
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::flight_not_found(id))
    }

    pub async fn search_flights(
        &self,
        source: &str,
        destination: &str,
        date: Option<&str>,
    ) -> CoreResult<Vec<Flight>> {
        Ok(self.flights.search(source, destination, date).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_flight_status(&self, id: Uuid, status: &str) -> CoreResult<Flight> {
        let next: FlightStatus = status.parse()?;
        let mut flight = self.get_flight(id).await?;
        flight.set_status(next)?;

        let updated = self
            .flights
            .update_status(id, next)
            .await?
            .ok_or_else(|| CoreError::flight_not_found(id))?;
        info!(status = %next, "flight status updated");
        Ok(updated)
    }

    /// Bookings on the flight are left in place.
    #[instrument(skip(self))]
    pub async fn delete_flight(&self, id: Uuid) -> CoreResult<()> {
        if !self.flights.delete(id).await? {
            return Err(CoreError::flight_not_found(id));
        }
        info!("flight deleted");
        Ok(())
    }

    #[instrument(skip(self, new_agent))]
    pub async fn register_agent(&self, new_agent: NewAgent) -> CoreResult<Agent> {
        require("name", &new_agent.name)?;
        require("email", &new_agent.email)?;
        require("phone", &new_agent.phone)?;
        require("agencyName", &new_agent.agency_name)?;

        if self.agents.find_by_email(&new_agent.email).await?.is_some() {
            return Err(ValidationError::DuplicateAgent.into());
        }

        let agent = Agent::new(new_agent.name, new_agent.email, new_agent.phone, new_agent.agency_name);
        self.agents.insert(&agent).await?;
        info!(agent_id = %agent.id, "agent registered");
        Ok(agent)
    }

    pub async fn get_agent(&self, id: Uuid) -> CoreResult<Agent> {
        self.agents
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::agent_not_found(id))
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert_eq!(require("name", "  "), Err(ValidationError::MissingField("name")));
        assert!(require("name", "Ravi").is_ok());
    }

    #[test]
    fn test_new_flight_defaults() {
        let json = r#"{
            "flightNumber": "6E-202",
            "airline": "IndiGo",
            "model": "A321",
            "source": "BLR",
            "destination": "HYD",
            "date": "2025-05-01",
            "departureTime": "06:00",
            "arrivalTime": "07:10",
            "fare": { "economy": 3200, "business": 9000, "firstClass": 15000 },
            "seats": {
                "economy": { "total": 30, "available": 30 },
                "business": { "total": 6, "available": 6 },
                "firstClass": { "total": 0, "available": 0 }
            }
        }"#;
        let flight = serde_json::from_str::<NewFlight>(json).unwrap().into_flight();
        assert_eq!(flight.status, FlightStatus::Scheduled);
        assert!(flight.booked_seats.is_empty());
        assert!(flight.duration.is_none());
        flight.validate_inventory().unwrap();
    }
}
