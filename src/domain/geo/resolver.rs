//! GeoResolver trait definition

use std::net::IpAddr;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A resolved location: ISO country code plus the most specific subdivision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub country_code: String,
    pub subdivision_code: Option<String>,
}

impl Location {
    pub fn new(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            subdivision_code: None,
        }
    }

    pub fn with_subdivision(mut self, subdivision_code: impl Into<String>) -> Self {
        self.subdivision_code = Some(subdivision_code.into());
        self
    }
}

/// Outcome of a geolocation lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationResult {
    Found(Location),
    /// The database holds no usable record for the address
    NotFound,
}

/// Resolves an address to its geographic location.
///
/// `Ok(LocationResult::NotFound)` is a normal outcome. `Err` is reserved for
/// failures of the backing database and must reach the caller.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn lookup(&self, address: IpAddr) -> Result<LocationResult, DomainError>;
}
