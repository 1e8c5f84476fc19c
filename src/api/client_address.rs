//! Client address extraction for the decision endpoint

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::config::ClientAddressSource;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Addresses that must all be allowed for a request to pass.
///
/// Holds a single address except under [`ClientAddressSource::ForwardedChain`].
/// Values are passed on unparsed; malformed ones are rejected by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddresses(pub Vec<String>);

impl FromRequestParts<AppState> for ClientAddresses {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_canonical().to_string());

        let addresses = resolve_addresses(state.client_address, &parts.headers, peer)?;

        if addresses.is_empty() {
            return Err(ApiError::bad_request("Unable to determine client address")
                .with_code("missing_client_address"));
        }

        Ok(ClientAddresses(addresses))
    }
}

fn resolve_addresses(
    source: ClientAddressSource,
    headers: &HeaderMap,
    peer: Option<String>,
) -> Result<Vec<String>, ApiError> {
    match source {
        ClientAddressSource::Peer => Ok(peer.into_iter().collect()),
        ClientAddressSource::ForwardedClient => {
            let client = match forwarded_for(headers)?.into_iter().next() {
                Some(first) => Some(first),
                None => header_value(headers, X_REAL_IP)?.or(peer),
            };

            Ok(client.into_iter().collect())
        }
        ClientAddressSource::ForwardedChain => {
            let mut chain = forwarded_for(headers)?;
            chain.extend(peer);

            Ok(chain)
        }
    }
}

/// All `X-Forwarded-For` entries, client first, across repeated headers
fn forwarded_for(headers: &HeaderMap) -> Result<Vec<String>, ApiError> {
    let mut entries = Vec::new();

    for value in headers.get_all(X_FORWARDED_FOR) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-Forwarded-For header encoding"))?;

        entries.extend(
            value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(String::from),
        );
    }

    Ok(entries)
}

fn header_value(headers: &HeaderMap, name: &str) -> Result<Option<String>, ApiError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(|s| s.trim().to_string())
                .map_err(|_| ApiError::bad_request(format!("Invalid {} header encoding", name)))
        })
        .transpose()
        .map(|value| value.filter(|s| !s.is_empty()))
}
