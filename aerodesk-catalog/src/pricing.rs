use serde::{Deserialize, Serialize};

use crate::flight::{FareTable, SeatClass};

/// Price breakdown for a booking, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    pub per_seat_fare: i64,
    pub seats: u32,
    pub seat_fare: i64,
    pub food_total: i64,
    /// Agent commission billed to the customer on top of the fare.
    pub commission: i64,
    pub total_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Negative amount {0} in fare computation")]
    NegativeAmount(i64),

    #[error("Fare total is out of range")]
    Overflow,
}

impl FareQuote {
    /// `seat_fare = per_seat × seats`, `food_total = Σ prices`, `total = seat_fare + food_total`.
    /// Negative inputs and overflowing totals are rejected.
    pub fn compute<I>(fares: &FareTable, class: SeatClass, seats: u32, food_prices: I) -> Result<Self, PricingError>
    where
        I: IntoIterator<Item = i64>,
    {
        let per_seat_fare = non_negative(fares.get(class))?;
        let seat_fare = per_seat_fare
            .checked_mul(i64::from(seats))
            .ok_or(PricingError::Overflow)?;

        let mut food_total: i64 = 0;
        for price in food_prices {
            food_total = food_total
                .checked_add(non_negative(price)?)
                .ok_or(PricingError::Overflow)?;
        }

        Ok(Self {
            per_seat_fare,
            seats,
            seat_fare,
            food_total,
            commission: 0,
            total_amount: seat_fare.checked_add(food_total).ok_or(PricingError::Overflow)?,
        })
    }

    pub fn with_commission(mut self, commission: i64) -> Result<Self, PricingError> {
        let commission = non_negative(commission)?;
        self.total_amount = (self.total_amount - self.commission)
            .checked_add(commission)
            .ok_or(PricingError::Overflow)?;
        self.commission = commission;
        Ok(self)
    }
}

fn non_negative(amount: i64) -> Result<i64, PricingError> {
    if amount < 0 {
        return Err(PricingError::NegativeAmount(amount));
    }
    Ok(amount)
}
