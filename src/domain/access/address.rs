//! Address allowlist parsing and range matching

use std::net::IpAddr;

use ipnet::IpNet;

use crate::domain::DomainError;

/// Parsed address allowlist: a set of networks, single addresses stored as host routes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressAllowlist {
    networks: Vec<IpNet>,
}

impl AddressAllowlist {
    /// Parses a comma-separated list of addresses and CIDR blocks.
    ///
    /// An empty spec yields an empty allowlist. Every entry is parsed before
    /// any matching happens, so one malformed entry rejects the whole spec.
    pub fn parse(spec: &str) -> Result<Self, DomainError> {
        if spec.trim().is_empty() {
            return Ok(Self::default());
        }

        let networks = spec
            .split(',')
            .map(parse_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { networks })
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// True if any entry contains `address`. Empty allowlists never match.
    ///
    /// Families are compared strictly: an IPv4 address is never contained in
    /// an IPv6 network, IPv4-mapped forms included.
    pub fn matches(&self, address: IpAddr) -> bool {
        self.networks.iter().any(|network| network.contains(&address))
    }
}

fn parse_entry(raw: &str) -> Result<IpNet, DomainError> {
    let entry = raw.trim();

    if entry.is_empty() {
        return Err(DomainError::invalid_allowlist_entry(
            raw,
            "empty entry in address allowlist",
        ));
    }

    if entry.contains('/') {
        return entry
            .parse::<IpNet>()
            .map_err(|e| DomainError::invalid_allowlist_entry(entry, e.to_string()));
    }

    entry
        .parse::<IpAddr>()
        .map(IpNet::from)
        .map_err(|e| DomainError::invalid_allowlist_entry(entry, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_spec_never_matches() {
        let allowlist = AddressAllowlist::parse("").unwrap();
        assert!(allowlist.is_empty());
        assert!(!allowlist.matches(ip("127.0.0.1")));
        assert!(!allowlist.matches(ip("::1")));
    }

    #[test]
    fn test_whitespace_only_spec_is_empty() {
        let allowlist = AddressAllowlist::parse("   ").unwrap();
        assert!(allowlist.is_empty());
    }

    #[test]
    fn test_single_address_entry() {
        let allowlist = AddressAllowlist::parse("203.0.113.7").unwrap();
        assert!(allowlist.matches(ip("203.0.113.7")));
        assert!(!allowlist.matches(ip("203.0.113.8")));
    }

    #[test]
    fn test_cidr_entries() {
        let allowlist = AddressAllowlist::parse("10.0.0.0/8, 192.168.1.0/24").unwrap();
        assert_eq!(allowlist.len(), 2);
        assert!(allowlist.matches(ip("10.200.3.4")));
        assert!(allowlist.matches(ip("192.168.1.254")));
        assert!(!allowlist.matches(ip("192.168.2.1")));
    }

    #[test]
    fn test_ipv6_entries() {
        let allowlist = AddressAllowlist::parse("2001:db8::/32,::1").unwrap();
        assert!(allowlist.matches(ip("2001:db8:1::42")));
        assert!(allowlist.matches(ip("::1")));
        assert!(!allowlist.matches(ip("2001:db9::1")));
    }

    #[test]
    fn test_family_mismatch_never_matches() {
        let allowlist = AddressAllowlist::parse("0.0.0.0/0").unwrap();
        assert!(!allowlist.matches(ip("::ffff:10.0.0.1")));

        let allowlist = AddressAllowlist::parse("::/0").unwrap();
        assert!(!allowlist.matches(ip("10.0.0.1")));
    }

    #[test]
    fn test_host_bits_in_cidr_are_masked() {
        let allowlist = AddressAllowlist::parse("10.1.2.3/16").unwrap();
        assert!(allowlist.matches(ip("10.1.200.1")));
    }

    #[test]
    fn test_malformed_entry_is_rejected() {
        let err = AddressAllowlist::parse("10.0.0.1,not-an-ip").unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidAllowlistEntry { ref entry, .. } if entry == "not-an-ip"
        ));
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        let err = AddressAllowlist::parse("10.0.0.0/33").unwrap_err();
        assert!(matches!(err, DomainError::InvalidAllowlistEntry { .. }));
    }

    #[test]
    fn test_trailing_comma_is_rejected() {
        let err = AddressAllowlist::parse("10.0.0.1,").unwrap_err();
        assert!(matches!(err, DomainError::InvalidAllowlistEntry { .. }));
    }

    #[test]
    fn test_malformed_entry_rejected_even_after_matching_entry() {
        // Parsing is eager, the first entry would have matched.
        assert!(AddressAllowlist::parse("10.0.0.1,bogus").is_err());
    }
}
