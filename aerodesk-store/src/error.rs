#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[cfg(feature = "kafka")]
    #[error("kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("{field} value {value} does not fit its column")]
    OutOfRange { field: &'static str, value: u64 },

    /// A stored row that does not map back onto the domain model.
    #[error("corrupt {table} row {id}: {reason}")]
    CorruptRow {
        table: &'static str,
        id: uuid::Uuid,
        reason: String,
    },
}

impl StoreError {

    pub(crate) fn corrupt(table: &'static str, id: uuid::Uuid, reason: impl ToString) -> Self {
        StoreError::CorruptRow {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}
