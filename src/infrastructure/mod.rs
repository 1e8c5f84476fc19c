//! Infrastructure layer - Adapters for geolocation, caching and observability

pub mod decision_cache;
pub mod geoip;
pub mod logging;
pub mod observability;

pub use decision_cache::{InMemoryDecisionCache, InMemoryDecisionCacheConfig};
pub use geoip::{GeoResolverConfig, GeoResolverFactory, MaxMindGeoResolver, StaticGeoResolver};
