use serde::Deserialize;

use crate::infrastructure::decision_cache::DEFAULT_MAX_CAPACITY;
use crate::infrastructure::geoip::GeoResolverConfig;
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub geoip: GeoResolverConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of distinct decisions kept
    pub max_capacity: u64,
}

/// Where the decision endpoint takes the client address from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientAddressSource {
    /// The TCP peer
    Peer,
    /// Left-most `X-Forwarded-For` entry, then `X-Real-IP`, then the peer
    #[default]
    ForwardedClient,
    /// Every `X-Forwarded-For` hop plus the peer; all must be allowed
    ForwardedChain,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProxyConfig {
    #[serde(default)]
    pub client_address: ClientAddressSource,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Loads `config/default`, `config/local` and `GEOAUTH__*` overrides.
    ///
    /// Missing files are skipped; any invalid value is an error rather than a
    /// silent fallback to defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name("config/default").required(false))
                .add_source(config::File::with_name("config/local").required(false))
                .add_source(
                    config::Environment::with_prefix("GEOAUTH")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::geoip::GeoResolverType;

    fn try_from_toml(toml: &str) -> Result<AppConfig, config::ConfigError> {
        AppConfig::from_builder(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    fn from_toml(toml: &str) -> AppConfig {
        try_from_toml(toml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.cache.max_capacity, 1024);
        assert_eq!(config.proxy.client_address, ClientAddressSource::ForwardedClient);
        assert_eq!(config.geoip.provider, GeoResolverType::MaxMind);
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_toml("");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_full_source() {
        let config = from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [logging]
            level = "debug"
            format = "json"

            [cache]
            max_capacity = 16

            [proxy]
            client_address = "forwarded_chain"

            [geoip]
            provider = "static"

            [[geoip.static_entries]]
            network = "10.0.0.0/8"
            country = "US"
            subdivision = "CA"
            "#,
        );

        assert_eq!(config.server.port, 9000);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.cache.max_capacity, 16);
        assert_eq!(config.proxy.client_address, ClientAddressSource::ForwardedChain);
        assert_eq!(config.geoip.provider, GeoResolverType::Static);
        assert_eq!(config.geoip.static_entries.len(), 1);
        assert_eq!(config.geoip.static_entries[0].subdivision.as_deref(), Some("CA"));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let result = try_from_toml(
            r#"
            [cache]
            max_capacity = 16

            [proxy]
            client_address = "forwarded-chain"

            [geoip]
            provider = "static"
            "#,
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("forwarded-chain"));
    }

    #[test]
    fn test_invalid_provider_is_an_error() {
        assert!(try_from_toml("[geoip]\nprovider = \"ip2location\"\n").is_err());
    }
}
