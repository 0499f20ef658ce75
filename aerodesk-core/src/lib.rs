pub mod admin;
pub mod booking;
pub mod cancellation;
pub mod error;
pub mod events;
pub mod policy;
pub mod repository;

pub use admin::{AdminService, NewAgent, NewFlight};
pub use booking::{BookingService, CreateBookingRequest};
pub use cancellation::CancelBookingRequest;
pub use error::{CoreError, CoreResult, Entity, ErrorKind, RepositoryError, ValidationError};
pub use events::{EventPublisher, LogEventPublisher};
pub use policy::BookingPolicy;
pub use repository::{AgentRepository, BookingFilter, BookingRepository, FlightRepository};
