//! Decision engine - orchestrates the allowlist matchers behind the decision cache

use std::net::IpAddr;
use std::sync::Arc;

use tracing::debug;

use crate::domain::geo::GeoResolver;
use crate::domain::DomainError;

use super::address::AddressAllowlist;
use super::area::{AreaAllowlist, AreaAllowlistMatcher};
use super::cache::{DecisionCache, DecisionKey};

/// Which step produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Cache,
    IpAllowlist,
    AreaAllowlist,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::IpAllowlist => "ip_allowlist",
            Self::AreaAllowlist => "area_allowlist",
        }
    }
}

impl std::fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An access decision together with where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub source: DecisionSource,
}

/// Stateless orchestrator over an injected resolver and decision cache.
///
/// The address allowlist is tried first; the area allowlist (and with it the
/// resolver) only runs when the address allowlist does not match.
#[derive(Clone)]
pub struct DecisionEngine {
    area_matcher: AreaAllowlistMatcher,
    cache: Arc<dyn DecisionCache>,
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl DecisionEngine {
    pub fn new(resolver: Arc<dyn GeoResolver>, cache: Arc<dyn DecisionCache>) -> Self {
        Self {
            area_matcher: AreaAllowlistMatcher::new(resolver),
            cache,
        }
    }

    /// Returns whether `address` is allowed under the two allowlist specs
    pub async fn evaluate(
        &self,
        address: &str,
        ip_allowlist: &str,
        area_allowlist: &str,
        log_decision: bool,
    ) -> Result<bool, DomainError> {
        self.decide(address, ip_allowlist, area_allowlist, log_decision)
            .await
            .map(|decision| decision.allowed)
    }

    /// Like [`evaluate`](Self::evaluate), also reporting the deciding step.
    ///
    /// Cache hits return without touching either matcher and log nothing.
    /// Errors are never cached.
    pub async fn decide(
        &self,
        address: &str,
        ip_allowlist: &str,
        area_allowlist: &str,
        log_decision: bool,
    ) -> Result<Decision, DomainError> {
        let ip: IpAddr = address
            .parse()
            .map_err(|_| DomainError::invalid_address(address))?;

        let key = DecisionKey::new(address, ip_allowlist, area_allowlist);

        if let Some(allowed) = self.cache.get(&key).await {
            debug!(address = %address, allowed, "Decision cache hit");
            return Ok(Decision {
                allowed,
                source: DecisionSource::Cache,
            });
        }

        let decision = self
            .evaluate_uncached(ip, ip_allowlist, area_allowlist, log_decision)
            .await?;

        self.cache.put(key, decision.allowed).await;

        Ok(decision)
    }

    async fn evaluate_uncached(
        &self,
        ip: IpAddr,
        ip_allowlist: &str,
        area_allowlist: &str,
        log_decision: bool,
    ) -> Result<Decision, DomainError> {
        if AddressAllowlist::parse(ip_allowlist)?.matches(ip) {
            return Ok(Decision {
                allowed: true,
                source: DecisionSource::IpAllowlist,
            });
        }

        let areas = AreaAllowlist::parse(area_allowlist);
        let allowed = self.area_matcher.matches(ip, &areas, log_decision).await?;

        Ok(Decision {
            allowed,
            source: DecisionSource::AreaAllowlist,
        })
    }

    /// Drops the cached decision for one exact key, if any
    pub async fn forget(&self, address: &str, ip_allowlist: &str, area_allowlist: &str) {
        self.cache
            .remove(&DecisionKey::new(address, ip_allowlist, area_allowlist))
            .await;
    }

    /// Drops every cached decision
    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    pub async fn cached_decisions(&self) -> u64 {
        self.cache.size().await
    }
}
