use thiserror::Error;

/// Core domain errors
///
/// A geolocation miss is not an error: it surfaces as
/// [`LocationResult::NotFound`](crate::domain::geo::LocationResult::NotFound)
/// and produces an ordinary deny decision.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid address: '{address}'")]
    InvalidAddress { address: String },

    #[error("Invalid allowlist entry '{entry}': {message}")]
    InvalidAllowlistEntry { entry: String, message: String },

    #[error("Geolocation lookup failed: {message}")]
    GeoLookup { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
        }
    }

    pub fn invalid_allowlist_entry(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAllowlistEntry {
            entry: entry.into(),
            message: message.into(),
        }
    }

    pub fn geo_lookup(message: impl Into<String>) -> Self {
        Self::GeoLookup {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress { .. } | Self::InvalidAllowlistEntry { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_error() {
        let error = DomainError::invalid_address("not-an-ip");
        assert_eq!(error.to_string(), "Invalid address: 'not-an-ip'");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_invalid_allowlist_entry_error() {
        let error = DomainError::invalid_allowlist_entry("10.0.0.0/33", "invalid IP network");
        assert_eq!(
            error.to_string(),
            "Invalid allowlist entry '10.0.0.0/33': invalid IP network"
        );
        assert!(error.is_client_error());
    }

    #[test]
    fn test_geo_lookup_error_is_not_client_error() {
        let error = DomainError::geo_lookup("database unavailable");
        assert_eq!(
            error.to_string(),
            "Geolocation lookup failed: database unavailable"
        );
        assert!(!error.is_client_error());
    }
}
