use std::net::SocketAddr;
#[cfg(feature = "kafka")]
use std::sync::Arc;

use aerodesk_api::{app, AppState};
use aerodesk_store::{Config, DbClient, RedisClient, Repositories};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aerodesk_api=debug,aerodesk_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting AeroDesk API on port {}", config.server.port);

    let repos = match &config.database {
        Some(database) => {
            let db = DbClient::connect(database)
                .await
                .context("Failed to connect to Postgres")?;
            db.repositories()
        }
        None => {
            tracing::warn!("No database configured, using the in-memory store");
            Repositories::in_memory()
        }
    };

    let mut state = AppState::new(repos, &config.business_rules)?;

    if let Some(redis) = &config.redis {
        let client = RedisClient::new(&redis.url).context("Failed to create Redis client")?;
        state = state.with_rate_limit(client, config.rate_limit.clone());
    }

    #[cfg(feature = "kafka")]
    if let Some(kafka) = &config.kafka {
        let producer = aerodesk_store::EventProducer::new(&kafka.brokers)
            .context("Failed to create Kafka producer")?;
        state = state.with_events(Arc::new(producer));
    }

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
