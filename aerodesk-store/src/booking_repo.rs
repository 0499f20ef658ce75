use aerodesk_catalog::SeatClass;
use aerodesk_core::{BookingFilter, BookingRepository, RepositoryError};
use aerodesk_order::{Booking, BookingStatus, FoodOption, Payment, PaymentMethod, PaymentStatus};
use aerodesk_shared::Masked;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::StoreError;
use crate::flight_repo::seat_count;

const BOOKING_COLUMNS: &str = "id, flight_id, user_id, agent_id, passenger_name, seats_booked, \
    seat_class, seat_numbers, food_options, payment_amount, payment_method, payment_status, \
    transaction_id, agent_commission, status, booking_date";

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    flight_id: Uuid,
    user_id: String,
    agent_id: Option<Uuid>,
    passenger_name: String,
    seats_booked: i32,
    seat_class: String,
    seat_numbers: Vec<String>,
    food_options: Json<Vec<FoodOption>>,
    payment_amount: i64,
    payment_method: String,
    payment_status: String,
    transaction_id: Option<String>,
    agent_commission: i64,
    status: String,
    booking_date: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |reason: String| StoreError::corrupt("bookings", id, reason);

        Ok(Booking {
            id,
            flight_id: row.flight_id,
            user_id: row.user_id,
            agent_id: row.agent_id,
            passenger_name: Masked::new(row.passenger_name),
            seats_booked: u32::try_from(row.seats_booked).map_err(|e| corrupt(e.to_string()))?,
            seat_class: row.seat_class.parse::<SeatClass>().map_err(|e| corrupt(e.to_string()))?,
            seat_numbers: row.seat_numbers,
            food_options: row.food_options.0,
            payment: Payment {
                amount: row.payment_amount,
                method: row.payment_method.parse::<PaymentMethod>().map_err(|e| corrupt(e.to_string()))?,
                status: row.payment_status.parse::<PaymentStatus>().map_err(|e| corrupt(e.to_string()))?,
                transaction_id: row.transaction_id,
            },
            agent_commission: row.agent_commission,
            status: row.status.parse::<BookingStatus>().map_err(|e| corrupt(e.to_string()))?,
            booking_date: row.booking_date,
        })
    }
}

fn into_booking(row: Option<BookingRow>) -> Result<Option<Booking>, RepositoryError> {
    Ok(row.map(Booking::try_from).transpose()?)
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        into_booking(row)
    }

    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
        ))
        .bind(booking.id)
        .bind(booking.flight_id)
        .bind(&booking.user_id)
        .bind(booking.agent_id)
        .bind(booking.passenger_name.expose())
        .bind(seat_count("seats_booked", booking.seats_booked as usize)?)
        .bind(booking.seat_class.as_str())
        .bind(&booking.seat_numbers)
        .bind(Json(&booking.food_options))
        .bind(booking.payment.amount)
        .bind(booking.payment.method.as_str())
        .bind(booking.payment.status.as_str())
        .bind(&booking.payment.transaction_id)
        .bind(booking.agent_commission)
        .bind(booking.status.as_str())
        .bind(booking.booking_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE bookings SET
                agent_id = $2, passenger_name = $3, seats_booked = $4, seat_class = $5,
                seat_numbers = $6, food_options = $7, payment_amount = $8, payment_method = $9,
                payment_status = $10, transaction_id = $11, agent_commission = $12, status = $13
             WHERE id = $1",
        )
        .bind(booking.id)
        .bind(booking.agent_id)
        .bind(booking.passenger_name.expose())
        .bind(seat_count("seats_booked", booking.seats_booked as usize)?)
        .bind(booking.seat_class.as_str())
        .bind(&booking.seat_numbers)
        .bind(Json(&booking.food_options))
        .bind(booking.payment.amount)
        .bind(booking.payment.method.as_str())
        .bind(booking.payment.status.as_str())
        .bind(&booking.payment.transaction_id)
        .bind(booking.agent_commission)
        .bind(booking.status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!("booking {} does not exist", booking.id).into());
        }
        Ok(())
    }

    async fn update_status_if(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = $3 WHERE id = $1 AND status = $2 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.pool)
        .await?;
        into_booking(row)
    }

    async fn find_by_filter(&self, filter: &BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE TRUE"));
        if let Some(flight_id) = filter.flight_id {
            query.push(" AND flight_id = ").push_bind(flight_id);
        }
        if let Some(user_id) = &filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id.clone());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(payment_status) = filter.payment_status {
            query.push(" AND payment_status = ").push_bind(payment_status.as_str());
        }
        query.push(" ORDER BY booking_date DESC");

        let rows = query.build_query_as::<BookingRow>().fetch_all(&self.pool).await?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            bookings.push(Booking::try_from(row)?);
        }
        Ok(bookings)
    }
}
