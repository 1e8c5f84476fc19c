//! GeoResolver backed by a fixed network table

use std::net::IpAddr;

use async_trait::async_trait;
use ipnet::IpNet;
use serde::Deserialize;

use crate::domain::geo::{GeoResolver, Location, LocationResult};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_geo_lookup;

/// One configured network and the location it resolves to
#[derive(Debug, Clone, Deserialize)]
pub struct StaticGeoEntry {
    pub network: String,
    pub country: String,
    #[serde(default)]
    pub subdivision: Option<String>,
}

/// Resolves addresses from an in-memory table; the first containing network wins.
///
/// Intended for development and tests where no MaxMind database is available.
#[derive(Debug, Clone, Default)]
pub struct StaticGeoResolver {
    entries: Vec<(IpNet, Location)>,
}

impl StaticGeoResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[StaticGeoEntry]) -> Result<Self, DomainError> {
        entries.iter().try_fold(Self::new(), |resolver, entry| {
            let network = entry.network.parse::<IpNet>().map_err(|e| {
                DomainError::configuration(format!(
                    "Invalid static GeoIP network '{}': {}",
                    entry.network, e
                ))
            })?;

            let mut location = Location::new(entry.country.clone());
            location.subdivision_code = entry.subdivision.clone();

            Ok(resolver.with_network(network, location))
        })
    }

    pub fn with_network(mut self, network: IpNet, location: Location) -> Self {
        self.entries.push((network, location));
        self
    }
}

#[async_trait]
impl GeoResolver for StaticGeoResolver {
    async fn lookup(&self, address: IpAddr) -> Result<LocationResult, DomainError> {
        let result = self
            .entries
            .iter()
            .find(|(network, _)| network.contains(&address))
            .map(|(_, location)| LocationResult::Found(location.clone()))
            .unwrap_or(LocationResult::NotFound);

        record_geo_lookup(match result {
            LocationResult::Found(_) => "found",
            LocationResult::NotFound => "not_found",
        });

        Ok(result)
    }
}
