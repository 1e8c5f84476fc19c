//! Access decision domain - allowlist matching and the decision engine

mod address;
mod area;
mod cache;
mod engine;

pub use address::AddressAllowlist;
pub use area::{AreaAllowlist, AreaAllowlistMatcher, AreaEntry, Subdivisions, UNKNOWN_SUBDIVISION};
pub use cache::{DecisionCache, DecisionKey};
pub use engine::{Decision, DecisionEngine, DecisionSource};
