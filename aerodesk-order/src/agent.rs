use aerodesk_shared::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A travel agent who brokers bookings and earns commission on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub agency_name: String,
    pub total_commission: i64,
    pub active: bool,
    pub date_joined: DateTime<Utc>,
}

impl Agent {
    pub fn new(name: String, email: String, phone: String, agency_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email: Masked::new(email),
            phone: Masked::new(phone),
            agency_name,
            total_commission: 0,
            active: true,
            date_joined: Utc::now(),
        }
    }

    pub fn credit_commission(&mut self, amount: i64) {
        self.total_commission += amount;
    }

    /// Reverse a commission. Skipped entirely when the running total is below `amount`, so the total
    /// never goes negative. Returns whether the debit was applied.
    pub fn debit_commission(&mut self, amount: i64) -> bool {
        if self.total_commission < amount {
            return false;
        }
        self.total_commission -= amount;
        true
    }
}
