// src/honeypot/mod.rs
// Honeypot triggers: client-side block report and checkout form check

use crate::blocklist::{BlockManager, BlockStore};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::StorageError;
use crate::input_validation::{enforce_body_size, get_form_field, MAX_CHECKOUT_FORM_BYTES};
use spin_sdk::http::{Request, Response};


/// Generic rejection shown to the submitter. Must not hint at the honeypot.
pub const CHECKOUT_REJECTED_MESSAGE: &str =
    "There was an issue processing your checkout. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Accepted,
    Rejected,
}

/// True when the honeypot field is present with any non-empty value.
pub fn is_honeypot_filled(form: &str, field: &str) -> bool {
    get_form_field(form, field).is_some_and(|v| !v.is_empty())
}

/// Blocks `address` when the submitted form filled the honeypot.
///
/// A filled honeypot rejects the checkout even when the caller address is
/// unknown; only the block itself is skipped then.
pub fn check_checkout_submission<S: BlockStore, C: Clock>(
    manager: &BlockManager<S, C>,
    address: Option<&str>,
    form: &str,
    field: &str,
) -> Result<CheckoutOutcome, StorageError> {
    if !is_honeypot_filled(form, field) {
        return Ok(CheckoutOutcome::Accepted);
    }
    match address {
        Some(address) => manager.block(address)?,
        None => tracing::warn!("honeypot filled by a client without an address; nothing blocked"),
    }
    Ok(CheckoutOutcome::Rejected)
}

/// Unauthenticated report from the client-side detector. Records a block for
/// the caller and sends them to the home page.
pub fn handle_block_report<S: BlockStore, C: Clock>(
    manager: &BlockManager<S, C>,
    req: &Request,
    cfg: &Config,
) -> Response {
    match crate::client_ip::extract_client_ip(req, cfg) {
        Some(address) => {
            if let Err(err) = manager.block(&address) {
                tracing::error!(ip = %address, error = %err, "block report could not be recorded");
                return Response::new(500, "Key-value store error");
            }
            tracing::info!(ip = %address, reason = "honeypot_report", "honeypot report recorded");
        }
        None => tracing::warn!("block report without a client address; nothing blocked"),
    }
    redirect(302, &cfg.home_url, "")
}

pub fn handle_checkout<S: BlockStore, C: Clock>(
    manager: &BlockManager<S, C>,
    req: &Request,
    cfg: &Config,
) -> Response {
    let body = req.body();
    if enforce_body_size(body, MAX_CHECKOUT_FORM_BYTES).is_err() {
        return Response::new(413, "Payload too large");
    }
    let form = String::from_utf8_lossy(body);
    let address = crate::client_ip::extract_client_ip(req, cfg);

    match check_checkout_submission(manager, address.as_deref(), &form, &cfg.honeypot_field) {
        Ok(CheckoutOutcome::Accepted) => Response::new(200, "OK (checkout accepted)"),
        Ok(CheckoutOutcome::Rejected) => {
            tracing::info!(
                ip = address.as_deref().unwrap_or("-"),
                reason = "honeypot_checkout",
                "checkout rejected"
            );
            let target = redirect_target(req, &cfg.checkout_path);
            redirect(303, &target, CHECKOUT_REJECTED_MESSAGE)
        }
        Err(err) => {
            tracing::error!(error = %err, "checkout honeypot block could not be recorded");
            Response::new(500, "Key-value store error")
        }
    }
}

/// Where to send a rejected checkout: the referring page when it is on this
/// site, otherwise `fallback`.
pub(crate) fn redirect_target(req: &Request, fallback: &str) -> String {
    let Some(referer) = req.header("referer").and_then(|v| v.as_str()).map(str::trim) else {
        return fallback.to_string();
    };
    if referer.starts_with('/') && !referer.starts_with("//") {
        return referer.to_string();
    }
    let host = req.header("host").and_then(|v| v.as_str()).map(str::trim);
    let without_scheme = referer
        .strip_prefix("https://")
        .or_else(|| referer.strip_prefix("http://"));
    if let (Some(rest), Some(host)) = (without_scheme, host) {
        let (authority, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, "/"),
        };
        if authority.eq_ignore_ascii_case(host) {
            return path.to_string();
        }
    }
    fallback.to_string()
}

fn redirect(status: u16, location: &str, body: &str) -> Response {
    Response::builder()
        .status(status)
        .header("Location", location)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Cache-Control", "no-store")
        .body(body.to_string())
        .build()
}
