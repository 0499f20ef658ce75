use aerodesk_catalog::{ClassInventory, FareTable, Flight, FlightStatus, SeatClass, SeatTable};
use aerodesk_core::{FlightRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

const FLIGHT_COLUMNS: &str = "id, flight_number, airline, model, source, destination, date, \
    departure_time, arrival_time, duration, economy_fare, business_fare, first_class_fare, \
    economy_total, economy_available, business_total, business_available, \
    first_class_total, first_class_available, booked_seats, status, features";

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    flight_number: String,
    airline: String,
    model: String,
    source: String,
    destination: String,
    date: String,
    departure_time: String,
    arrival_time: String,
    duration: Option<String>,
    economy_fare: i64,
    business_fare: i64,
    first_class_fare: i64,
    economy_total: i32,
    economy_available: i32,
    business_total: i32,
    business_available: i32,
    first_class_total: i32,
    first_class_available: i32,
    booked_seats: Vec<String>,
    status: String,
    features: Vec<String>,
}

impl TryFrom<FlightRow> for Flight {
    type Error = StoreError;

    fn try_from(row: FlightRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let count = |value: i32| u32::try_from(value).map_err(|e| StoreError::corrupt("flights", id, e));
        let inventory = |total: i32, available: i32| -> Result<ClassInventory, StoreError> {
            Ok(ClassInventory {
                total: count(total)?,
                available: count(available)?,
            })
        };

        Ok(Flight {
            id,
            flight_number: row.flight_number,
            airline: row.airline,
            model: row.model,
            source: row.source,
            destination: row.destination,
            date: row.date,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            duration: row.duration,
            fare: FareTable {
                economy: row.economy_fare,
                business: row.business_fare,
                first_class: row.first_class_fare,
            },
            seats: SeatTable {
                economy: inventory(row.economy_total, row.economy_available)?,
                business: inventory(row.business_total, row.business_available)?,
                first_class: inventory(row.first_class_total, row.first_class_available)?,
            },
            booked_seats: row.booked_seats,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::corrupt("flights", id, e))?,
            features: row.features,
        })
    }
}

fn into_flight(row: Option<FlightRow>) -> Result<Option<Flight>, RepositoryError> {
    Ok(row.map(Flight::try_from).transpose()?)
}

/// Column prefix for a class's fare and seat counters.
fn class_column(class: SeatClass) -> &'static str {
    match class {
        SeatClass::Economy => "economy",
        SeatClass::Business => "business",
        SeatClass::FirstClass => "first_class",
    }
}

/// Seat counters are `INTEGER` columns.
pub(crate) fn seat_count(field: &'static str, value: usize) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::OutOfRange {
        field,
        value: value as u64,
    })
}

/// Total and available for economy, business and first class, in column order.
fn seat_counts(seats: &SeatTable) -> Result<[i32; 6], StoreError> {
    Ok([
        seat_count("economy_total", seats.economy.total as usize)?,
        seat_count("economy_available", seats.economy.available as usize)?,
        seat_count("business_total", seats.business.total as usize)?,
        seat_count("business_available", seats.business.available as usize)?,
        seat_count("first_class_total", seats.first_class.total as usize)?,
        seat_count("first_class_available", seats.first_class.available as usize)?,
    ])
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Flight>, RepositoryError> {
        let row = sqlx::query_as::<_, FlightRow>(&format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        into_flight(row)
    }

    async fn find_by_number(&self, flight_number: &str) -> Result<Option<Flight>, RepositoryError> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE flight_number = $1"
        ))
        .bind(flight_number)
        .fetch_optional(&self.pool)
        .await?;
        into_flight(row)
    }

    async fn search(
        &self,
        source: &str,
        destination: &str,
        date: Option<&str>,
    ) -> Result<Vec<Flight>, RepositoryError> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights
             WHERE LOWER(source) = LOWER($1)
               AND LOWER(destination) = LOWER($2)
               AND ($3::TEXT IS NULL OR date = $3)
             ORDER BY date, departure_time"
        ))
        .bind(source)
        .bind(destination)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let mut flights = Vec::with_capacity(rows.len());
        for row in rows {
            flights.push(Flight::try_from(row)?);
        }
        Ok(flights)
    }

    async fn insert(&self, flight: &Flight) -> Result<(), RepositoryError> {
        let counts = seat_counts(&flight.seats)?;
        sqlx::query(&format!(
            "INSERT INTO flights ({FLIGHT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)"
        ))
        .bind(flight.id)
        .bind(&flight.flight_number)
        .bind(&flight.airline)
        .bind(&flight.model)
        .bind(&flight.source)
        .bind(&flight.destination)
        .bind(&flight.date)
        .bind(&flight.departure_time)
        .bind(&flight.arrival_time)
        .bind(&flight.duration)
        .bind(flight.fare.economy)
        .bind(flight.fare.business)
        .bind(flight.fare.first_class)
        .bind(counts[0])
        .bind(counts[1])
        .bind(counts[2])
        .bind(counts[3])
        .bind(counts[4])
        .bind(counts[5])
        .bind(&flight.booked_seats)
        .bind(flight.status.as_str())
        .bind(&flight.features)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, flight: &Flight) -> Result<(), RepositoryError> {
        let counts = seat_counts(&flight.seats)?;
        let result = sqlx::query(
            "UPDATE flights SET
                flight_number = $2, airline = $3, model = $4, source = $5, destination = $6,
                date = $7, departure_time = $8, arrival_time = $9, duration = $10,
                economy_fare = $11, business_fare = $12, first_class_fare = $13,
                economy_total = $14, economy_available = $15,
                business_total = $16, business_available = $17,
                first_class_total = $18, first_class_available = $19,
                booked_seats = $20, status = $21, features = $22
             WHERE id = $1",
        )
        .bind(flight.id)
        .bind(&flight.flight_number)
        .bind(&flight.airline)
        .bind(&flight.model)
        .bind(&flight.source)
        .bind(&flight.destination)
        .bind(&flight.date)
        .bind(&flight.departure_time)
        .bind(&flight.arrival_time)
        .bind(&flight.duration)
        .bind(flight.fare.economy)
        .bind(flight.fare.business)
        .bind(flight.fare.first_class)
        .bind(counts[0])
        .bind(counts[1])
        .bind(counts[2])
        .bind(counts[3])
        .bind(counts[4])
        .bind(counts[5])
        .bind(&flight.booked_seats)
        .bind(flight.status.as_str())
        .bind(&flight.features)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!("flight {} does not exist", flight.id).into());
        }
        Ok(())
    }

    async fn update_status(&self, id: Uuid, status: FlightStatus) -> Result<Option<Flight>, RepositoryError> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "UPDATE flights SET status = $2 WHERE id = $1 RETURNING {FLIGHT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        into_flight(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn conditional_update_seats(
        &self,
        id: Uuid,
        class: SeatClass,
        seats: &[String],
    ) -> Result<Option<Flight>, RepositoryError> {
        let column = class_column(class);
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "UPDATE flights
             SET {column}_available = {column}_available - $2,
                 booked_seats = booked_seats || $3
             WHERE id = $1
               AND {column}_available >= $2
               AND NOT (booked_seats && $3)
             RETURNING {FLIGHT_COLUMNS}"
        ))
        .bind(id)
        .bind(seat_count("seats", seats.len())?)
        .bind(seats)
        .fetch_optional(&self.pool)
        .await?;
        into_flight(row)
    }

    async fn release_seats(
        &self,
        id: Uuid,
        class: SeatClass,
        seats: &[String],
    ) -> Result<Option<Flight>, RepositoryError> {
        let column = class_column(class);
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "UPDATE flights
             SET {column}_available = LEAST(
                     {column}_total,
                     {column}_available + (SELECT COUNT(*) FROM UNNEST(booked_seats) AS s WHERE s = ANY($2))::INTEGER
                 ),
                 booked_seats = ARRAY(SELECT s FROM UNNEST(booked_seats) AS s WHERE s <> ALL($2))
             WHERE id = $1
             RETURNING {FLIGHT_COLUMNS}"
        ))
        .bind(id)
        .bind(seats)
        .fetch_optional(&self.pool)
        .await?;
        into_flight(row)
    }
}
