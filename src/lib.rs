//! Geo Forward Auth
//!
//! Forward-authentication service deciding ALLOW or DENY for a client address
//! against an address/CIDR allowlist and a country/subdivision allowlist.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{DecisionEngine, DomainError};
use infrastructure::decision_cache::{InMemoryDecisionCache, InMemoryDecisionCacheConfig};
use infrastructure::geoip::GeoResolverFactory;

/// Builds the decision engine with a fresh cache and the configured resolver
pub fn create_engine(config: &AppConfig) -> Result<DecisionEngine, DomainError> {
    let resolver = GeoResolverFactory::create(&config.geoip)?;
    let cache = InMemoryDecisionCache::with_config(
        InMemoryDecisionCacheConfig::default().with_max_capacity(config.cache.max_capacity),
    );

    Ok(DecisionEngine::new(resolver, Arc::new(cache)))
}

/// Create application state from configuration
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let engine = create_engine(config)?;

    tracing::info!(
        cache_capacity = config.cache.max_capacity,
        client_address = ?config.proxy.client_address,
        "Decision engine ready"
    );

    Ok(AppState::new(engine, config.proxy.client_address))
}
