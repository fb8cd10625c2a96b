// src/enforcement/gate.rs
// Per-request block list enforcement

use super::block_page::{render_block_page, BlockReason};
use crate::blocklist::{BlockManager, BlockStore};
use crate::clock::Clock;
use crate::config::{Config, FailMode};
use spin_sdk::http::{Request, Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny,
    /// Block list unreadable, request let through.
    FailedOpen,
    /// Block list unreadable, request refused.
    FailedClosed,
}

impl GateDecision {
    /// Terminal response for denying decisions, None when the request proceeds.
    pub fn into_response(self) -> Option<Response> {
        match self {
            GateDecision::Allow | GateDecision::FailedOpen => None,
            GateDecision::Deny => Some(html_response(
                403,
                render_block_page(BlockReason::BlockedAddress),
            )),
            GateDecision::FailedClosed => Some(html_response(
                500,
                render_block_page(BlockReason::StoreUnavailable),
            )),
        }
    }
}

pub struct RequestGate<'a, S, C> {
    manager: &'a BlockManager<S, C>,
    fail_mode: FailMode,
}

impl<'a, S: BlockStore, C: Clock> RequestGate<'a, S, C> {
    pub fn new(manager: &'a BlockManager<S, C>, fail_mode: FailMode) -> Self {
        Self { manager, fail_mode }
    }

    pub fn decide(&self, address: Option<&str>) -> GateDecision {
        let Some(address) = address else {
            tracing::debug!("no client address on request; enforcement skipped");
            return GateDecision::Allow;
        };
        match self.manager.is_blocked(address) {
            Ok(true) => {
                tracing::info!(ip = %address, "request denied for blocked address");
                GateDecision::Deny
            }
            Ok(false) => GateDecision::Allow,
            Err(err) => fail_mode_decision(self.fail_mode, &err),
        }
    }

    /// Runs the check for `req`; Some(response) ends the pipeline.
    pub fn enforce(&self, req: &Request, cfg: &Config) -> Option<Response> {
        let address = crate::client_ip::extract_client_ip(req, cfg);
        self.decide(address.as_deref()).into_response()
    }
}

fn fail_mode_decision(fail_mode: FailMode, err: &dyn std::error::Error) -> GateDecision {
    match fail_mode {
        FailMode::Open => {
            tracing::warn!(error = %err, fail_mode = fail_mode.label(), "block list unavailable; request allowed");
            GateDecision::FailedOpen
        }
        FailMode::Closed => {
            tracing::error!(error = %err, fail_mode = fail_mode.label(), "block list unavailable; request refused");
            GateDecision::FailedClosed
        }
    }
}

/// Outcome when the key-value store could not even be opened.
pub fn store_unavailable_decision(
    fail_mode: FailMode,
    err: &dyn std::error::Error,
) -> GateDecision {
    fail_mode_decision(fail_mode, err)
}

fn html_response(status: u16, body: String) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Cache-Control", "no-store")
        .body(body)
        .build()
}
