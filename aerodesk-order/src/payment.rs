use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::models::{Payment, PaymentMethod, PaymentStatus};

/// Source of booking transaction references.
///
/// The references only serve display and audit, so they need to be unique-ish, not unpredictable.
/// Injected so tests can pin the values.
pub trait TransactionIds: Send + Sync {
    fn next_id(&self) -> String;
}

/// `TXN<unix millis>-<6 upper-case hex chars>`.
pub struct RandomTransactionIds {
    rng: Mutex<StdRng>,
}

impl RandomTransactionIds {
    pub fn new() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Default for RandomTransactionIds {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionIds for RandomTransactionIds {
    fn next_id(&self) -> String {
        let suffix: [u8; 3] = self.rng.lock().unwrap_or_else(|e| e.into_inner()).gen();
        format!("TXN{}-{}", Utc::now().timestamp_millis(), to_upper_hex(&suffix))
    }
}

/// Stand-in for a payment gateway. Produces a payment outcome for a fare.
#[async_trait]
pub trait PaymentSimulator: Send + Sync {
    async fn simulate(&self, fare: i64, seat_count: u32) -> Payment;
}

/// Succeeds with probability `success_rate` (0.9 by default), pays by UPI and issues a
/// `TXN-<12 hex chars>` reference.
pub struct RandomPaymentSimulator {
    rng: Mutex<StdRng>,
    success_rate: f64,
    method: PaymentMethod,
}

impl RandomPaymentSimulator {
    pub const DEFAULT_SUCCESS_RATE: f64 = 0.9;

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            success_rate: Self::DEFAULT_SUCCESS_RATE,
            method: PaymentMethod::default(),
        }
    }

    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = success_rate.clamp(0.0, 1.0);
        self
    }
}

impl Default for RandomPaymentSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentSimulator for RandomPaymentSimulator {
    async fn simulate(&self, fare: i64, seat_count: u32) -> Payment {
        let (roll, reference) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let roll: f64 = rng.gen();
            let reference: [u8; 6] = rng.gen();
            (roll, reference)
        };

        let status = if roll < self.success_rate {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Failed
        };

        Payment {
            amount: fare * seat_count as i64,
            method: self.method,
            status,
            transaction_id: Some(format!("TXN-{}", to_upper_hex(&reference))),
        }
    }
}

fn to_upper_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
