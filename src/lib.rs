// src/lib.rs
// Entry point for the honeypot IP blocker Spin component

use spin_sdk::http::{Request, Response};
#[cfg(target_arch = "wasm32")]
use spin_sdk::http_component;
use spin_sdk::key_value::Store;

pub mod admin;          // Admin endpoints for the block list
pub mod blocklist;      // Block list model, expiry and lifecycle
pub mod client_ip;      // Caller address extraction
pub mod clock;          // Time source
pub mod config;         // Environment configuration
pub mod enforcement;    // Per-request gate and denial page
pub mod error;          // Error types
pub mod honeypot;       // Report endpoint and checkout check
pub mod input_validation;
pub mod logging;        // tracing setup
mod runtime;            // Request routing
pub mod store;          // Key-value seam

#[cfg(test)]
mod test_support;

pub use blocklist::{BlockEntry, BlockList, BlockManager, BlockStore, ExpiryPolicy, KvBlockStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, FailMode};
pub use error::{ConfigError, KvError, StorageError, ValidationError};
pub use runtime::request_router::route;
pub use store::{InMemoryStore, KeyValueStore};

/// Handles one request against an already opened key-value backend.
pub fn handle_request<K: KeyValueStore, C: Clock>(
    req: &Request,
    cfg: &Config,
    kv: K,
    clock: C,
) -> Response {
    let manager = BlockManager::with_clock(KvBlockStore::new(kv), clock, cfg.expiry_policy());
    route(&manager, req, cfg)
}

/// Main handler logic, testable as a plain Rust function.
pub fn handle_ip_blocker_impl(req: &Request) -> Response {
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            logging::init(config::DEFAULT_LOG_FILTER);
            tracing::error!(error = %err, "invalid configuration");
            return Response::new(500, "Configuration error");
        }
    };
    logging::init(&cfg.log_filter);

    match Store::open_default() {
        Ok(store) => handle_request(req, &cfg, store, SystemClock),
        Err(e) => store_unavailable(req, &cfg, &KvError(format!("{:?}", e))),
    }
}

/// With no store, ordinary pages and clean checkouts follow the gate's fail
/// mode; routes that must write (admin, report, a filled honeypot) report a
/// server error.
fn store_unavailable(req: &Request, cfg: &Config, err: &KvError) -> Response {
    let path = req.path();
    if admin::is_admin_path(path) || path == cfg.report_path {
        tracing::error!(error = %err, path, "key-value store unavailable");
        return Response::new(500, "Key-value store error");
    }
    if let Some(response) = enforcement::store_unavailable_decision(cfg.fail_mode, err).into_response() {
        return response;
    }
    if path != cfg.checkout_path || !matches!(req.method(), spin_sdk::http::Method::Post) {
        return Response::new(200, "OK (ip blocker: store unavailable, checks bypassed)");
    }

    let body = req.body();
    if input_validation::enforce_body_size(body, input_validation::MAX_CHECKOUT_FORM_BYTES).is_err() {
        return Response::new(413, "Payload too large");
    }
    if honeypot::is_honeypot_filled(&String::from_utf8_lossy(body), &cfg.honeypot_field) {
        tracing::error!(error = %err, path, "honeypot checkout could not be recorded: key-value store unavailable");
        return Response::new(500, "Key-value store error");
    }
    Response::new(200, "OK (checkout accepted)")
}

#[cfg_attr(target_arch = "wasm32", http_component)]
pub fn spin_entrypoint(req: Request) -> Response {
    handle_ip_blocker_impl(&req)
}
