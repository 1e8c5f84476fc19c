//! GeoIP infrastructure - GeoResolver implementations

mod factory;
mod maxmind;
mod static_resolver;

pub use factory::{GeoResolverConfig, GeoResolverFactory, GeoResolverType};
pub use maxmind::MaxMindGeoResolver;
pub use static_resolver::{StaticGeoEntry, StaticGeoResolver};
