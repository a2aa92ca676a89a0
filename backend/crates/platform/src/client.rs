//! Client identification utilities
//!
//! Resolves the address used to key per-client rate limits and to record
//! where a flag submission came from.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Key used when no client address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract client IP address
///
/// When `trust_forwarded_for` is set (the service sits behind a reverse
/// proxy), the first parseable entry of `X-Forwarded-For` wins, then
/// `X-Real-IP`. Otherwise only the direct connection address is used,
/// since a client can put anything in those headers.
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_ip(headers) {
            return Some(ip);
        }
    }
    direct_ip
}

/// Rate-limit key for a request
///
/// Clients without a resolvable address share the [`UNKNOWN_CLIENT`] key.
pub fn client_key(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_forwarded_for: bool,
) -> String {
    extract_client_ip(headers, direct_ip, trust_forwarded_for)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let xff = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    xff.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    })
}
