//! Decision cache contract

use std::fmt::Debug;

use async_trait::async_trait;

/// Cache key for a memoized decision.
///
/// Equality is exact string equality on all three parts. Allowlist specs are
/// not normalized: `"10.0.0.1,10.0.0.2"` and `"10.0.0.2,10.0.0.1"` are
/// distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecisionKey {
    pub address: String,
    pub ip_allowlist: String,
    pub area_allowlist: String,
}

impl DecisionKey {
    pub fn new(
        address: impl Into<String>,
        ip_allowlist: impl Into<String>,
        area_allowlist: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            ip_allowlist: ip_allowlist.into(),
            area_allowlist: area_allowlist.into(),
        }
    }
}

/// Bounded, concurrency-safe store of access decisions
///
/// `clear` must be linearizable with respect to concurrent `get`/`put`: once
/// it returns, no entry stored before the call is visible.
#[async_trait]
pub trait DecisionCache: Send + Sync + Debug {
    async fn get(&self, key: &DecisionKey) -> Option<bool>;

    async fn put(&self, key: DecisionKey, allowed: bool);

    async fn remove(&self, key: &DecisionKey);

    async fn clear(&self);

    /// Approximate number of cached decisions
    async fn size(&self) -> u64;
}
