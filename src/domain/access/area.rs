//! Geographic area allowlist grammar and matching
//!
//! An area allowlist is a `;`-separated list of entries. Each entry is either
//! a bare country code (`US`), allowing the whole country, or a country code
//! followed by a `,`-separated list of subdivision codes (`US:CA,NY`).

use std::net::IpAddr;
use std::sync::Arc;

use tracing::info;

use crate::domain::geo::{GeoResolver, Location, LocationResult};
use crate::domain::DomainError;

/// Compared in place of a missing subdivision, never equal to an empty entry
pub const UNKNOWN_SUBDIVISION: &str = "UNK";

/// Subdivisions admitted by an area entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subdivisions {
    Any,
    Only(Vec<String>),
}

/// One parsed unit of an area allowlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaEntry {
    pub country: String,
    pub subdivisions: Subdivisions,
}

impl AreaEntry {
    fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((country, areas)) => Self {
                country: country.to_string(),
                subdivisions: Subdivisions::Only(areas.split(',').map(String::from).collect()),
            },
            None => Self {
                country: raw.to_string(),
                subdivisions: Subdivisions::Any,
            },
        }
    }

    fn admits(&self, subdivision: &str) -> bool {
        match &self.subdivisions {
            Subdivisions::Any => true,
            Subdivisions::Only(areas) => areas.iter().any(|area| area == subdivision),
        }
    }
}

/// Parsed area allowlist, entries kept in the order given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaAllowlist {
    entries: Vec<AreaEntry>,
}

impl AreaAllowlist {
    /// Parses an area allowlist. Empty `;` segments are ignored; parsing never fails.
    pub fn parse(spec: &str) -> Self {
        let entries = spec
            .split(';')
            .filter(|entry| !entry.is_empty())
            .map(AreaEntry::parse)
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[AreaEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decides a resolved location against the allowlist.
    ///
    /// The first entry naming the location's country decides alone; later
    /// entries for the same country are never consulted.
    pub fn permits(&self, country: &str, subdivision: &str) -> bool {
        self.entries
            .iter()
            .find(|entry| entry.country == country)
            .is_some_and(|entry| entry.admits(subdivision))
    }
}

/// Matches addresses against an area allowlist through a [`GeoResolver`]
#[derive(Clone)]
pub struct AreaAllowlistMatcher {
    resolver: Arc<dyn GeoResolver>,
}

impl std::fmt::Debug for AreaAllowlistMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AreaAllowlistMatcher").finish_non_exhaustive()
    }
}

impl AreaAllowlistMatcher {
    pub fn new(resolver: Arc<dyn GeoResolver>) -> Self {
        Self { resolver }
    }

    /// Resolves `address` and checks it against `allowlist`.
    ///
    /// Emits one audit line per call unless `log_decision` is false. Resolver
    /// failures other than not-found are returned, not turned into a deny.
    pub async fn matches(
        &self,
        address: IpAddr,
        allowlist: &AreaAllowlist,
        log_decision: bool,
    ) -> Result<bool, DomainError> {
        let location = match self.resolver.lookup(address).await? {
            LocationResult::Found(location) => location,
            LocationResult::NotFound => {
                if log_decision {
                    info!(
                        address = %address,
                        outcome = "deny",
                        "[DENY] {}: UNKNOWN REGION",
                        address
                    );
                }

                return Ok(false);
            }
        };

        let Location {
            country_code,
            subdivision_code,
        } = location;
        let subdivision = subdivision_code
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| UNKNOWN_SUBDIVISION.to_string());

        let allowed = allowlist.permits(&country_code, &subdivision);

        if log_decision {
            let (tag, outcome) = if allowed {
                ("ALLOW", "allow")
            } else {
                ("DENY", "deny")
            };

            info!(
                address = %address,
                country = %country_code,
                subdivision = %subdivision,
                outcome,
                "[{}] {}: {} ({})",
                tag,
                address,
                country_code,
                subdivision
            );
        }

        Ok(allowed)
    }
}
