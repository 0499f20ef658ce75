#![allow(dead_code)]

use aerodesk_catalog::{ClassInventory, FareTable, Flight, FlightStatus, SeatClass, SeatTable};
use aerodesk_core::{AdminService, BookingService, CreateBookingRequest, NewFlight};
use aerodesk_order::FoodOption;
use aerodesk_shared::Masked;
use aerodesk_store::Repositories;
use uuid::Uuid;

pub struct Harness {
    pub repos: Repositories,
    pub bookings: BookingService,
    pub admin: AdminService,
}

pub fn harness() -> Harness {
    harness_with(Repositories::in_memory())
}

pub fn harness_with(repos: Repositories) -> Harness {
    let bookings = BookingService::new(repos.flights.clone(), repos.bookings.clone(), repos.agents.clone());
    let admin = AdminService::new(repos.flights.clone(), repos.agents.clone());
    Harness { repos, bookings, admin }
}

pub fn new_flight(number: &str, economy: u32, business: u32, first: u32) -> NewFlight {
    NewFlight {
        flight_number: number.to_string(),
        airline: "Air India".to_string(),
        model: "A320".to_string(),
        source: "DEL".to_string(),
        destination: "BOM".to_string(),
        date: "2025-03-14".to_string(),
        departure_time: "09:30".to_string(),
        arrival_time: "11:45".to_string(),
        duration: Some("2h 15m".to_string()),
        fare: FareTable { economy: 5000, business: 12000, first_class: 25000 },
        seats: SeatTable {
            economy: ClassInventory::new(economy),
            business: ClassInventory::new(business),
            first_class: ClassInventory::new(first),
        },
        booked_seats: Vec::new(),
        status: FlightStatus::Scheduled,
        features: vec!["WiFi".to_string()],
    }
}

impl Harness {
    pub async fn flight(&self, economy: u32, business: u32, first: u32) -> Flight {
        let number = format!("AI-{}", &Uuid::new_v4().simple().to_string()[..6]);
        self.admin
            .add_flight(new_flight(&number, economy, business, first))
            .await
            .unwrap()
    }

    pub async fn reload(&self, flight_id: Uuid) -> Flight {
        self.repos.flights.find_by_id(flight_id).await.unwrap().unwrap()
    }
}

pub fn request(flight_id: Uuid, user_id: &str, seats: u32) -> CreateBookingRequest {
    CreateBookingRequest {
        flight_id,
        user_id: user_id.to_string(),
        agent_id: None,
        passenger_name: Masked::new("Asha Rao".to_string()),
        seats_booked: seats,
        seat_numbers: Vec::new(),
        seat_class: SeatClass::Economy.to_string(),
        food_options: Vec::new(),
        payment_method: None,
    }
}

pub fn with_seats(mut request: CreateBookingRequest, seats: &[&str]) -> CreateBookingRequest {
    request.seat_numbers = ids(seats);
    request
}

pub fn with_food(mut request: CreateBookingRequest, items: &[(&str, i64)]) -> CreateBookingRequest {
    request.food_options = items
        .iter()
        .map(|(item, price)| FoodOption { item: item.to_string(), price: *price })
        .collect();
    request
}

pub fn ids(seats: &[&str]) -> Vec<String> {
    seats.iter().map(|s| s.to_string()).collect()
}
