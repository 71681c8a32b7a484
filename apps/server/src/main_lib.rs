use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use tallyfolio_core::{
    fx::{FxService, FxServiceTrait},
    portfolio::{
        snapshot::{SnapshotScheduler, SnapshotService, SnapshotServiceTrait},
        valuation::{ValuationService, ValuationServiceTrait},
    },
    quotes::{PriceCache, QuoteService, QuoteServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    users::{UserService, UserServiceTrait},
    utils::{Clock, SystemClock},
};
use tallyfolio_market_data::{MarketDataProvider, YahooProvider};
use tallyfolio_storage_sqlite::{
    db::{self, write_actor},
    FxRepository, PriceRepository, SnapshotRepository, TransactionRepository, UserRepository,
};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub quote_service: Arc<dyn QuoteServiceTrait>,
    pub fx_service: Arc<dyn FxServiceTrait>,
    pub valuation_service: Arc<dyn ValuationServiceTrait>,
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
    pub snapshot_scheduler: Arc<SnapshotScheduler>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wires the production stack: SQLite storage, Yahoo market data, wall clock.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = Arc::new(YahooProvider::new()?);
    build_state_with(config, provider, Arc::new(SystemClock)).await
}

/// Same wiring with the external collaborators supplied by the caller.
pub async fn build_state_with(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let engine = config.engine_config();

    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let price_repository = Arc::new(PriceRepository::new(pool.clone(), writer.clone()));
    let fx_repository = Arc::new(FxRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(user_repository.clone(), clock.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        user_repository.clone(),
        provider.clone(),
        clock.clone(),
        engine.negative_cash_policy,
    ));

    let fx_service: Arc<dyn FxServiceTrait> = Arc::new(
        FxService::new(fx_repository, provider.clone(), clock.clone())
            .with_rate_ttl(engine.fx_rate_ttl),
    );
    let quote_service: Arc<dyn QuoteServiceTrait> = Arc::new(QuoteService::new(
        price_repository,
        provider.clone(),
        Arc::new(PriceCache::new(engine.memory_price_ttl)),
        clock.clone(),
        &engine,
    ));
    let valuation_service: Arc<dyn ValuationServiceTrait> = Arc::new(ValuationService::new(
        transaction_repository,
        quote_service.clone(),
        fx_service.clone(),
        clock.clone(),
    ));
    let snapshot_service: Arc<dyn SnapshotServiceTrait> = Arc::new(SnapshotService::new(
        snapshot_repository,
        user_repository.clone(),
        valuation_service.clone(),
        clock.clone(),
        &engine,
    ));
    let snapshot_scheduler = Arc::new(SnapshotScheduler::new(
        user_repository,
        snapshot_service.clone(),
        clock,
        &engine,
    ));

    Ok(Arc::new(AppState {
        user_service,
        transaction_service,
        quote_service,
        fx_service,
        valuation_service,
        snapshot_service,
        snapshot_scheduler,
    }))
}
