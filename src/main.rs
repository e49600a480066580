//! Storefront admin service

use std::sync::Arc;

use anyhow::Result;
use storefront_admin::api::{self, AppState};
use storefront_admin::config::Config;
use storefront_admin::revalidate::Revalidator;
use storefront_admin::store::{MemoryStore, PgStore, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pg = PgStore::connect(url, &config).await?;
            pg.migrate().await?;
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            let memory = MemoryStore::new();
            if config.seed_demo_data {
                memory.seed_demo().await?;
            }
            Arc::new(memory)
        }
    };

    let mut revalidator = Revalidator::new(config.revalidate_subject.clone());
    if let Some(url) = &config.nats_url {
        match async_nats::connect(url.as_str()).await {
            Ok(client) => revalidator = revalidator.with_nats(client),
            Err(e) => tracing::warn!(error = %e, "NATS unavailable, revalidation stays in-process"),
        }
    }

    let app = api::router(AppState::new(store, revalidator));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("storefront admin listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
