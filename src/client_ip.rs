// src/client_ip.rs
// Caller address extraction

use crate::config::Config;
use spin_sdk::http::Request;
use std::net::SocketAddr;

/// Header the Spin runtime sets to the transport peer (`ip:port`).
pub const CLIENT_ADDR_HEADER: &str = "spin-client-addr";
pub const FORWARDED_SECRET_HEADER: &str = "x-ip-blocker-forwarded-secret";

/// Returns true if forwarded IP headers should be trusted for this request.
/// Requires IP_BLOCKER_FORWARDED_IP_SECRET and a matching secret header.
pub(crate) fn forwarded_ip_trusted(req: &Request, cfg: &Config) -> bool {
    let Some(secret) = cfg.forwarded_ip_secret.as_deref() else {
        return false;
    };
    req.header(FORWARDED_SECRET_HEADER)
        .and_then(|v| v.as_str())
        .map(|v| crate::admin::auth::constant_time_eq(v.trim(), secret))
        .unwrap_or(false)
}

/// Caller address used as the block list key, or None when the host did
/// not provide one.
pub fn extract_client_ip(req: &Request, cfg: &Config) -> Option<String> {
    if forwarded_ip_trusted(req, cfg) {
        if let Some(ip) = req
            .header("x-forwarded-for")
            .and_then(|h| h.as_str())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty() && *ip != "unknown")
        {
            return Some(ip.to_string());
        }
    }
    req.header(CLIENT_ADDR_HEADER)
        .and_then(|h| h.as_str())
        .and_then(peer_ip)
}

/// Strips the port from a transport peer value.
fn peer_ip(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<SocketAddr>() {
        Ok(addr) => Some(addr.ip().to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
