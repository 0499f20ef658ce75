use aerodesk_core::ErrorKind;
use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};
use prometheus::{opts, IntCounter, IntCounterVec, Registry, TextEncoder};

use crate::error::AppError;
use crate::state::AppState;

/// Booking counters exported on `/metrics`.
pub struct Metrics {
    registry: Registry,
    bookings_created: IntCounter,
    bookings_rejected: IntCounterVec,
    bookings_cancelled: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let bookings_created = IntCounter::with_opts(opts!(
            "aerodesk_bookings_created_total",
            "Bookings committed"
        ))?;
        let bookings_rejected = IntCounterVec::new(
            opts!("aerodesk_bookings_rejected_total", "Booking requests rejected, by error kind"),
            &["kind"],
        )?;
        let bookings_cancelled = IntCounter::with_opts(opts!(
            "aerodesk_bookings_cancelled_total",
            "Bookings cancelled"
        ))?;

        registry.register(Box::new(bookings_created.clone()))?;
        registry.register(Box::new(bookings_rejected.clone()))?;
        registry.register(Box::new(bookings_cancelled.clone()))?;

        Ok(Self {
            registry,
            bookings_created,
            bookings_rejected,
            bookings_cancelled,
        })
    }

    pub fn booking_created(&self) {
        self.bookings_created.inc();
    }

    pub fn booking_rejected(&self, kind: ErrorKind) {
        self.bookings_rejected.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn booking_cancelled(&self) {
        self.bookings_cancelled.inc();
    }

    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(export))
}

async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state
        .metrics
        .render()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
