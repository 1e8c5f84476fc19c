//! GeoResolver backed by a MaxMind GeoIP2 / GeoLite2 City database

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::{geoip2, MaxMindDBError, Reader};
use tracing::info;

use crate::domain::geo::{GeoResolver, Location, LocationResult};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_geo_lookup;

/// Resolves addresses with a MaxMind City database held in memory.
///
/// The database is opened once; reloading is left to the process supervisor.
#[derive(Clone)]
pub struct MaxMindGeoResolver {
    reader: Arc<Reader<Vec<u8>>>,
}

impl std::fmt::Debug for MaxMindGeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaxMindGeoResolver")
            .field("database_type", &self.reader.metadata.database_type)
            .finish()
    }
}

impl MaxMindGeoResolver {
    /// Opens a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DomainError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainError::configuration(format!(
                "GeoIP database not found: {}",
                path.display()
            )));
        }

        let reader = Reader::open_readfile(path).map_err(|e| {
            DomainError::configuration(format!(
                "Failed to open GeoIP database {}: {}",
                path.display(),
                e
            ))
        })?;

        info!(
            path = %path.display(),
            database_type = %reader.metadata.database_type,
            "GeoIP database loaded"
        );

        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    fn resolve(&self, address: IpAddr) -> Result<LocationResult, DomainError> {
        match self.reader.lookup::<geoip2::City>(address) {
            Ok(city) => Ok(location_from_city(&city)),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(LocationResult::NotFound),
            Err(e) => Err(DomainError::geo_lookup(e.to_string())),
        }
    }
}

/// A record without a country ISO code cannot be matched and counts as not found
fn location_from_city(city: &geoip2::City<'_>) -> LocationResult {
    let Some(country_code) = city.country.as_ref().and_then(|country| country.iso_code) else {
        return LocationResult::NotFound;
    };

    let subdivision = city
        .subdivisions
        .as_ref()
        .and_then(|subdivisions| subdivisions.last())
        .and_then(|subdivision| subdivision.iso_code);

    let mut location = Location::new(country_code);
    location.subdivision_code = subdivision.map(String::from);

    LocationResult::Found(location)
}

#[async_trait]
impl GeoResolver for MaxMindGeoResolver {
    async fn lookup(&self, address: IpAddr) -> Result<LocationResult, DomainError> {
        let result = self.resolve(address);

        record_geo_lookup(match &result {
            Ok(LocationResult::Found(_)) => "found",
            Ok(LocationResult::NotFound) => "not_found",
            Err(_) => "error",
        });

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_database() {
        let err = MaxMindGeoResolver::open("/nonexistent/GeoLite2-City.mmdb").unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("not found"));
    }
}
