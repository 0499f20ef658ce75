pub mod flight;
pub mod inventory;
pub mod pricing;

pub use flight::{ClassInventory, FareTable, Flight, FlightError, FlightStatus, SeatClass, SeatTable};
pub use inventory::{parse_seat_id, seat_id, AllocationError, SeatAllocator};
pub use pricing::{FareQuote, PricingError};
