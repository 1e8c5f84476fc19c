//! Domain layer - Access decision engine and its contracts

pub mod access;
pub mod error;
pub mod geo;

pub use access::{
    AddressAllowlist, AreaAllowlist, AreaAllowlistMatcher, Decision, DecisionCache, DecisionEngine,
    DecisionKey, DecisionSource,
};
pub use error::DomainError;
pub use geo::{GeoResolver, Location, LocationResult};
