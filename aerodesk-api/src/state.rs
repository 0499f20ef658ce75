use std::sync::Arc;

use aerodesk_core::{AdminService, BookingPolicy, BookingService, EventPublisher};
use aerodesk_store::app_config::{BusinessRules, RateLimitConfig};
use aerodesk_store::{RedisClient, Repositories};

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub admin: AdminService,
    pub metrics: Arc<Metrics>,
    /// Rate limiting is off without a Redis client.
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
}

impl AppState {
    pub fn new(repos: Repositories, rules: &BusinessRules) -> Result<Self, prometheus::Error> {
        let bookings = BookingService::new(repos.flights.clone(), repos.bookings.clone(), repos.agents.clone())
            .with_policy(BookingPolicy::from(rules))
            .with_commission_policy(Arc::new(rules.commission()));
        let admin = AdminService::new(repos.flights, repos.agents);

        Ok(Self {
            bookings,
            admin,
            metrics: Arc::new(Metrics::new()?),
            redis: None,
            rate_limit: RateLimitConfig::default(),
        })
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.bookings = self.bookings.with_events(events);
        self
    }

    pub fn with_rate_limit(mut self, redis: RedisClient, config: RateLimitConfig) -> Self {
        self.redis = Some(Arc::new(redis));
        self.rate_limit = config;
        self
    }
}
