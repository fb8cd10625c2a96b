use crate::blocklist::{BlockManager, BlockStore};
use crate::clock::Clock;
use crate::config::Config;
use crate::enforcement::RequestGate;
use spin_sdk::http::{Method, Request, Response};

#[cfg(test)]
mod tests;

/// Routes that must not be gated: admin (so a blocked operator can still
/// unblock) and the block report (its caller is being blocked anyway).
pub(crate) fn maybe_handle_early_route<S: BlockStore, C: Clock>(
    manager: &BlockManager<S, C>,
    req: &Request,
    cfg: &Config,
) -> Option<Response> {
    let path = req.path();
    if crate::admin::is_admin_path(path) {
        return Some(crate::admin::handle_admin(manager, req, cfg));
    }
    if path == cfg.report_path {
        if !matches!(req.method(), Method::Get | Method::Post) {
            return Some(Response::new(405, "Method Not Allowed"));
        }
        return Some(crate::honeypot::handle_block_report(manager, req, cfg));
    }
    None
}

/// Full pipeline: early routes, block list gate, checkout check, pass-through.
pub fn route<S: BlockStore, C: Clock>(
    manager: &BlockManager<S, C>,
    req: &Request,
    cfg: &Config,
) -> Response {
    if let Some(response) = maybe_handle_early_route(manager, req, cfg) {
        return response;
    }

    let gate = RequestGate::new(manager, cfg.fail_mode);
    if let Some(response) = gate.enforce(req, cfg) {
        return response;
    }

    if req.path() == cfg.checkout_path && matches!(req.method(), Method::Post) {
        return crate::honeypot::handle_checkout(manager, req, cfg);
    }

    Response::new(200, "OK (passed ip blocker)")
}
