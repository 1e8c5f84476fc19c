//! GeoResolver factory for runtime selection

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::geo::GeoResolver;
use crate::domain::DomainError;

use super::maxmind::MaxMindGeoResolver;
use super::static_resolver::{StaticGeoEntry, StaticGeoResolver};

/// Supported resolver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoResolverType {
    /// MaxMind City database
    #[default]
    MaxMind,
    /// Fixed network table from configuration
    Static,
}

impl std::fmt::Display for GeoResolverType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoResolverType::MaxMind => write!(f, "maxmind"),
            GeoResolverType::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for GeoResolverType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maxmind" | "mmdb" => Ok(GeoResolverType::MaxMind),
            "static" => Ok(GeoResolverType::Static),
            _ => Err(DomainError::configuration(format!(
                "Unknown GeoIP provider: {}. Valid providers: maxmind, static",
                s
            ))),
        }
    }
}

/// `[geoip]` configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct GeoResolverConfig {
    #[serde(default)]
    pub provider: GeoResolverType,
    /// Path to the City database (maxmind provider)
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Network table (static provider)
    #[serde(default)]
    pub static_entries: Vec<StaticGeoEntry>,
}

fn default_database_path() -> String {
    "/db/GeoLite2-City.mmdb".to_string()
}

impl Default for GeoResolverConfig {
    fn default() -> Self {
        Self {
            provider: GeoResolverType::default(),
            database_path: default_database_path(),
            static_entries: Vec::new(),
        }
    }
}

/// Factory for creating resolvers from configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoResolverFactory;

impl GeoResolverFactory {
    pub fn create(config: &GeoResolverConfig) -> Result<Arc<dyn GeoResolver>, DomainError> {
        info!(provider = %config.provider, "Creating GeoIP resolver");

        match config.provider {
            GeoResolverType::MaxMind => {
                Ok(Arc::new(MaxMindGeoResolver::open(&config.database_path)?))
            }
            GeoResolverType::Static => Ok(Arc::new(StaticGeoResolver::from_entries(
                &config.static_entries,
            )?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_type_from_str() {
        assert_eq!(
            "maxmind".parse::<GeoResolverType>().unwrap(),
            GeoResolverType::MaxMind
        );
        assert_eq!(
            "STATIC".parse::<GeoResolverType>().unwrap(),
            GeoResolverType::Static
        );
        assert!("ip2location".parse::<GeoResolverType>().is_err());
    }

    #[test]
    fn test_resolver_type_display() {
        assert_eq!(GeoResolverType::MaxMind.to_string(), "maxmind");
        assert_eq!(GeoResolverType::Static.to_string(), "static");
    }

    #[test]
    fn test_default_config() {
        let config = GeoResolverConfig::default();
        assert_eq!(config.provider, GeoResolverType::MaxMind);
        assert_eq!(config.database_path, "/db/GeoLite2-City.mmdb");
        assert!(config.static_entries.is_empty());
    }

    #[test]
    fn test_create_static_resolver() {
        let config = GeoResolverConfig {
            provider: GeoResolverType::Static,
            static_entries: vec![StaticGeoEntry {
                network: "10.0.0.0/8".to_string(),
                country: "US".to_string(),
                subdivision: Some("CA".to_string()),
            }],
            ..Default::default()
        };

        assert!(GeoResolverFactory::create(&config).is_ok());
    }

    #[test]
    fn test_create_maxmind_with_missing_database_fails() {
        let config = GeoResolverConfig {
            database_path: "/nonexistent/db.mmdb".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            GeoResolverFactory::create(&config),
            Err(DomainError::Configuration { .. })
        ));
    }
}
