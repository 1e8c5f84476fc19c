//! Geolocation domain - address to location resolution contract

mod resolver;

pub use resolver::{GeoResolver, Location, LocationResult};

#[cfg(test)]
pub use resolver::MockGeoResolver;
