use std::sync::Arc;

use aerodesk_core::{AgentRepository, BookingRepository, FlightRepository};

pub mod agent_repo;
pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod error;
#[cfg(feature = "kafka")]
pub mod events;
pub mod flight_repo;
pub mod memory;
pub mod redis_repo;

pub use app_config::Config;
pub use database::DbClient;
pub use error::StoreError;
#[cfg(feature = "kafka")]
pub use events::EventProducer;
pub use memory::{InMemoryAgentRepository, InMemoryBookingRepository, InMemoryFlightRepository};
pub use redis_repo::RedisClient;

/// The three repositories the booking core works against, from one backend.
#[derive(Clone)]
pub struct Repositories {
    pub flights: Arc<dyn FlightRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub agents: Arc<dyn AgentRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            flights: Arc::new(InMemoryFlightRepository::new()),
            bookings: Arc::new(InMemoryBookingRepository::new()),
            agents: Arc::new(InMemoryAgentRepository::new()),
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            flights: Arc::new(flight_repo::PostgresFlightRepository::new(pool.clone())),
            bookings: Arc::new(booking_repo::PostgresBookingRepository::new(pool.clone())),
            agents: Arc::new(agent_repo::PostgresAgentRepository::new(pool)),
        }
    }
}
