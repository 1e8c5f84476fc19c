//! Health check endpoints

use std::net::Ipv4Addr;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rand::Rng;
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use crate::domain::DomainError;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub checks: Vec<HealthCheck>,
    pub latency_ms: u64,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// One synthetic evaluation and whether it produced the expected decision
#[derive(Serialize, Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /health
///
/// Evaluates a random address twice without audit logging: once with empty
/// allowlists (must deny) and once with the address itself allowlisted (must
/// allow). Any mismatch or error answers 503. Both synthetic decisions are
/// dropped from the cache afterwards.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let address = Ipv4Addr::from(rand::thread_rng().r#gen::<u32>()).to_string();

    let checks = vec![
        expect_decision(
            "deny_all",
            state.engine.evaluate(&address, "", "", false).await,
            false,
        ),
        expect_decision(
            "ip_allowlist",
            state.engine.evaluate(&address, &address, "", false).await,
            true,
        ),
    ];

    // Synthetic keys would otherwise push real decisions out of the LRU.
    state.engine.forget(&address, "", "").await;
    state.engine.forget(&address, &address, "").await;

    let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        warn!(address = %address, "Health self-check failed");
        HealthStatus::Unhealthy
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
        latency_ms: start.elapsed().as_millis() as u64,
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn expect_decision(name: &str, result: Result<bool, DomainError>, expected: bool) -> HealthCheck {
    let (status, message) = match result {
        Ok(allowed) if allowed == expected => (HealthStatus::Healthy, None),
        Ok(allowed) => (
            HealthStatus::Unhealthy,
            Some(format!("expected allowed={}, got {}", expected, allowed)),
        ),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
    };

    HealthCheck {
        name: name.to_string(),
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::ClientAddressSource;
    use crate::domain::geo::{LocationResult, MockGeoResolver};
    use crate::domain::DecisionEngine;
    use crate::infrastructure::decision_cache::InMemoryDecisionCache;

    fn state_with_unknown_regions() -> AppState {
        let mut resolver = MockGeoResolver::new();
        resolver
            .expect_lookup()
            .returning(|_| Ok(LocationResult::NotFound));
        let engine = DecisionEngine::new(Arc::new(resolver), Arc::new(InMemoryDecisionCache::new()));

        AppState::new(engine, ClientAddressSource::ForwardedClient)
    }

    #[tokio::test]
    async fn test_health_check_leaves_no_cached_decisions() {
        let state = state_with_unknown_regions();

        for _ in 0..4 {
            let response = health_check(State(state.clone())).await.into_response();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(state.engine.cached_decisions().await, 0);
    }

    #[test]
    fn test_expect_decision_match() {
        let check = expect_decision("deny_all", Ok(false), false);
        assert_eq!(check.status, HealthStatus::Healthy);
        assert!(check.message.is_none());
    }

    #[test]
    fn test_expect_decision_mismatch() {
        let check = expect_decision("deny_all", Ok(true), false);
        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert_eq!(
            check.message.as_deref(),
            Some("expected allowed=false, got true")
        );
    }

    #[test]
    fn test_expect_decision_error() {
        let check = expect_decision(
            "ip_allowlist",
            Err(DomainError::geo_lookup("database unavailable")),
            true,
        );
        assert_eq!(check.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: vec![expect_decision("deny_all", Ok(false), false)],
            latency_ms: 1,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"name\":\"deny_all\""));
        assert!(!json.contains("message"));
    }
}
