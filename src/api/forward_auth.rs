//! Forward-auth decision and cache invalidation endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::api::client_address::ClientAddresses;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::observability::{record_access_decision, record_cache_clear};

/// Allowlist specs passed by the reverse proxy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessQuery {
    /// Comma-separated addresses and CIDR blocks
    #[serde(default)]
    pub ips: String,
    /// `;`-separated `COUNTRY` or `COUNTRY:SUB1,SUB2` entries
    #[serde(default)]
    pub locations: String,
}

/// ANY /
///
/// `200 OK` when every client address is allowed, `403 FORBIDDEN` otherwise.
pub async fn check_access(
    State(state): State<AppState>,
    ClientAddresses(addresses): ClientAddresses,
    Query(query): Query<AccessQuery>,
) -> Result<impl IntoResponse, ApiError> {
    for address in &addresses {
        let decision = state
            .engine
            .decide(address, &query.ips, &query.locations, true)
            .await
            .map_err(|e| {
                if e.is_client_error() {
                    warn!(address = %address, error = %e, "Rejected access request");
                } else {
                    error!(address = %address, error = %e, "Access decision failed");
                }
                ApiError::from(e)
            })?;

        record_access_decision(decision.allowed, decision.source.as_str());
        debug!(
            address = %address,
            allowed = decision.allowed,
            source = %decision.source,
            "Access decision"
        );

        if !decision.allowed {
            return Ok((StatusCode::FORBIDDEN, "FORBIDDEN"));
        }
    }

    Ok((StatusCode::OK, "OK"))
}

/// ANY /clear_cache
pub async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.engine.clear().await;
    record_cache_clear();

    info!("Decision cache cleared");

    (StatusCode::OK, "OK")
}
