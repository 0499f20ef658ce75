pub mod models;
pub mod agent;
pub mod commission;
pub mod payment;

pub use models::{
    Booking, BookingStatus, BookingTransitionError, FoodOption, ParseEnumError, Payment, PaymentMethod,
    PaymentStatus,
};
pub use agent::Agent;
pub use commission::{CommissionPolicy, FlatCommission, DEFAULT_AGENT_COMMISSION};
pub use payment::{PaymentSimulator, RandomPaymentSimulator, RandomTransactionIds, TransactionIds};
