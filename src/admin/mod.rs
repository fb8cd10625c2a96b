// src/admin/mod.rs
// Admin endpoints for listing, adding and removing blocked addresses

pub mod auth;


use crate::blocklist::{BlockEntry, BlockManager, BlockStore, ExpiryPolicy};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{StorageError, ValidationError};
use crate::input_validation::{enforce_body_size, get_form_field, sanitize_address, MAX_ADMIN_FORM_BYTES};
use serde::Serialize;
use serde_json::json;
use spin_sdk::http::{Method, Request, Response};

pub const BLOCKED_IPS_PATH: &str = "/admin/blocked-ips";
pub const REMOVED_MESSAGE: &str = "IP Address removed successfully.";
pub const ADDED_MESSAGE: &str = "New IP Address added successfully.";

/// Row of the admin listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BlockedIpView {
    pub ip: String,
    pub blocked_at: u64,
    pub blocked_at_display: String,
    pub expires_at: u64,
}

impl BlockedIpView {
    fn from_entry(entry: &BlockEntry, policy: ExpiryPolicy) -> Self {
        BlockedIpView {
            ip: entry.address.clone(),
            blocked_at: entry.blocked_at,
            blocked_at_display: format_timestamp(entry.blocked_at),
            expires_at: policy.expires_at(entry),
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(ts: u64) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

/// Handles all /admin endpoints. Requires `Authorization: Bearer <key>`.
///   - GET  /admin/blocked-ips: active blocks
///   - POST /admin/blocked-ips: form fields `remove_ip` and/or `new_ip`
///   - /admin: API help
///
/// Both fields are validated before anything is written: an invalid `new_ip`
/// rejects the whole POST with 400, dropping a `remove_ip` sent alongside it.
pub fn handle_admin<S: BlockStore, C: Clock>(
    manager: &BlockManager<S, C>,
    req: &Request,
    cfg: &Config,
) -> Response {
    if !auth::is_authorized(req, cfg) {
        tracing::warn!(path = req.path(), "admin request rejected: invalid or missing API key");
        return Response::new(401, "Unauthorized: Invalid or missing API key");
    }
    match (req.path(), req.method()) {
        ("/admin", _) => Response::new(
            200,
            "IP blocker admin API. GET /admin/blocked-ips to list, POST remove_ip or new_ip to change.",
        ),
        (BLOCKED_IPS_PATH, Method::Get) => match list_response(manager, Vec::new()) {
            Ok(resp) => resp,
            Err(err) => storage_failure(&err),
        },
        (BLOCKED_IPS_PATH, Method::Post) => handle_update(manager, req),
        (BLOCKED_IPS_PATH, _) => Response::new(405, "Method Not Allowed"),
        _ => Response::new(404, "Not found"),
    }
}

/// Form changes requested by one admin POST, validated before any write.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct AdminUpdate {
    pub remove_ip: Option<String>,
    pub new_ip: Option<String>,
}

pub(crate) fn parse_update(form: &str) -> Result<AdminUpdate, ValidationError> {
    let remove_ip = get_form_field(form, "remove_ip")
        .map(|raw| raw.trim().to_string())
        .filter(|ip| !ip.is_empty());
    let new_ip = match get_form_field(form, "new_ip") {
        Some(raw) => Some(sanitize_address("new_ip", &raw)?),
        None => None,
    };
    if remove_ip.is_none() && new_ip.is_none() {
        return Err(ValidationError::Missing("remove_ip or new_ip"));
    }
    Ok(AdminUpdate { remove_ip, new_ip })
}

fn handle_update<S: BlockStore, C: Clock>(manager: &BlockManager<S, C>, req: &Request) -> Response {
    if enforce_body_size(req.body(), MAX_ADMIN_FORM_BYTES).is_err() {
        return Response::new(413, "Payload too large");
    }
    let form = String::from_utf8_lossy(req.body());
    let update = match parse_update(&form) {
        Ok(update) => update,
        Err(err) => {
            tracing::info!(error = %err, "admin update rejected");
            return json_response(400, &json!({ "error": err.to_string() }));
        }
    };

    let mut messages = Vec::new();
    if let Some(ip) = update.remove_ip.as_deref() {
        match manager.unblock(ip) {
            Ok(true) => {
                tracing::info!(ip = %ip, admin = true, "admin removed blocked address");
                messages.push(REMOVED_MESSAGE);
            }
            Ok(false) => {}
            Err(err) => return storage_failure(&err),
        }
    }
    if let Some(ip) = update.new_ip.as_deref() {
        if let Err(err) = manager.block(ip) {
            return storage_failure(&err);
        }
        tracing::info!(ip = %ip, admin = true, "admin added blocked address");
        messages.push(ADDED_MESSAGE);
    }

    match list_response(manager, messages) {
        Ok(resp) => resp,
        Err(err) => storage_failure(&err),
    }
}

fn list_response<S: BlockStore, C: Clock>(
    manager: &BlockManager<S, C>,
    messages: Vec<&str>,
) -> Result<Response, StorageError> {
    let policy = manager.policy();
    let rows: Vec<BlockedIpView> = manager
        .list_active()?
        .iter()
        .map(|entry| BlockedIpView::from_entry(entry, policy))
        .collect();
    Ok(json_response(
        200,
        &json!({
            "messages": messages,
            "block_duration_seconds": policy.duration_secs(),
            "blocked_ips": rows,
        }),
    ))
}

fn storage_failure(err: &StorageError) -> Response {
    tracing::error!(error = %err, "admin request failed on block list storage");
    Response::new(500, "Key-value store error")
}

fn json_response(status: u16, body: &serde_json::Value) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-store")
        .body(body.to_string())
        .build()
}
