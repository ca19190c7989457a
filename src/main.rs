use std::sync::Arc;

use labbooker::auth::TokenService;
use labbooker::config::{AppConfig, Secrets};
use labbooker::gateway::state::AppState;
use labbooker::gateway::run_server;
use labbooker::payments::StripeGateway;
use labbooker::store::memory::MemStore;
use labbooker::store::postgres::PgStore;
use labbooker::store::BookingStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = AppConfig::load(&env)?;
    let _log_guard = labbooker::logging::init_logging(&config);

    let secrets = Secrets::from_env()?;

    let store: Arc<dyn BookingStore> = match &config.postgres_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            tracing::info!("connected to PostgreSQL");
            Arc::new(store)
        }
        None => {
            tracing::warn!("no postgres_url configured, using in-memory store");
            Arc::new(MemStore::new())
        }
    };

    let state = Arc::new(AppState::new(
        store,
        TokenService::new(secrets.token_secret),
        Arc::new(StripeGateway::new(secrets.stripe_secret_key)),
    ));

    run_server(&config, state).await
}
