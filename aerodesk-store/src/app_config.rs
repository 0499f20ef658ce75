use aerodesk_core::BookingPolicy;
use aerodesk_order::{FlatCommission, PaymentMethod, DEFAULT_AGENT_COMMISSION};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// No database section means the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// No redis section means no rate limiting.
    pub redis: Option<RedisConfig>,
    pub kafka: Option<KafkaConfig>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout() -> u64 { 3 }
fn default_true() -> bool { true }

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
}

/// Fixed window per client address.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests: i64,
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 100,
            window_seconds: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BusinessRules {
    pub max_seats_per_booking: u32,
    pub max_seats_per_user_per_flight: u32,
    pub waive_booking_cap_for_agents: bool,
    pub agent_commission: i64,
    pub default_payment_method: PaymentMethod,
}

impl Default for BusinessRules {
    fn default() -> Self {
        let policy = BookingPolicy::default();
        Self {
            max_seats_per_booking: policy.max_seats_per_booking,
            max_seats_per_user_per_flight: policy.max_seats_per_user_per_flight,
            waive_booking_cap_for_agents: policy.waive_booking_cap_for_agents,
            agent_commission: DEFAULT_AGENT_COMMISSION,
            default_payment_method: policy.default_payment_method,
        }
    }
}

impl BusinessRules {
    pub fn commission(&self) -> FlatCommission {
        FlatCommission::new(self.agent_commission)
    }
}

impl From<&BusinessRules> for BookingPolicy {
    fn from(rules: &BusinessRules) -> Self {
        BookingPolicy {
            max_seats_per_booking: rules.max_seats_per_booking,
            max_seats_per_user_per_flight: rules.max_seats_per_user_per_flight,
            waive_booking_cap_for_agents: rules.waive_booking_cap_for_agents,
            default_payment_method: rules.default_payment_method,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `AERODESK__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("AERODESK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse("[server]\nport = 8080\n");
        assert_eq!(config.server.port, 8080);
        assert!(config.database.is_none());
        assert!(config.redis.is_none());
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(BookingPolicy::from(&config.business_rules), BookingPolicy::default());
        assert_eq!(config.business_rules.commission(), FlatCommission::default());
    }

    #[test]
    fn test_business_rules_override_policy() {
        let config = parse(
            r#"
            [server]
            port = 3000

            [database]
            url = "postgres://localhost/aerodesk"

            [business_rules]
            max_seats_per_booking = 4
            max_seats_per_user_per_flight = 6
            waive_booking_cap_for_agents = false
            agent_commission = 250
            default_payment_method = "Net Banking"
            "#,
        );

        let database = config.database.unwrap();
        assert_eq!(database.max_connections, 5);
        assert!(database.run_migrations);

        let policy = BookingPolicy::from(&config.business_rules);
        assert_eq!(policy.max_seats_per_booking, 4);
        assert_eq!(policy.max_seats_per_user_per_flight, 6);
        assert!(!policy.waive_booking_cap_for_agents);
        assert_eq!(policy.default_payment_method, PaymentMethod::NetBanking);
        assert_eq!(config.business_rules.commission().amount, 250);
    }
}
