pub mod events;

pub use events::{
    BookingCancelledEvent, BookingConfirmedEvent, BOOKING_CANCELLED_TOPIC, BOOKING_CONFIRMED_TOPIC,
};
