use super::*;
use crate::blocklist::{ExpiryPolicy, KvBlockStore};
use crate::client_ip::CLIENT_ADDR_HEADER;
use crate::clock::ManualClock;
use crate::config::FailMode;
use crate::enforcement::BLOCKED_MESSAGE;
use crate::test_support::{
    body_text, form_request, request_with_headers, request_with_method_and_headers, FailingStore,
    InMemoryStore,
};

const BOT: &str = "203.0.113.5:41000";

fn keyed_config() -> Config {
    Config {
        admin_api_key: Some("test-admin-key".to_string()),
        ..Config::default()
    }
}

#[test]
fn early_router_does_not_consume_unrelated_paths() {
    let kv = InMemoryStore::default();
    let manager = BlockManager::new(KvBlockStore::new(&kv), ExpiryPolicy::default());
    let req = request_with_headers("/totally-unrelated", &[]);
    assert!(maybe_handle_early_route(&manager, &req, &Config::default()).is_none());
}

#[test]
fn early_router_rejects_unsupported_report_method() {
    let kv = InMemoryStore::default();
    let manager = BlockManager::new(KvBlockStore::new(&kv), ExpiryPolicy::default());
    let req = request_with_method_and_headers(Method::Put, "/block-report", &[(CLIENT_ADDR_HEADER, BOT)]);
    let resp = maybe_handle_early_route(&manager, &req, &Config::default()).unwrap();
    assert_eq!(*resp.status(), 405u16);
    assert!(manager.list_active().unwrap().is_empty());
}

#[test]
fn report_then_any_page_is_denied() {
    let kv = InMemoryStore::default();
    let clock = ManualClock::at(1000);
    let manager = BlockManager::with_clock(KvBlockStore::new(&kv), &clock, ExpiryPolicy::default());
    let cfg = Config::default();

    let report = request_with_headers("/block-report", &[(CLIENT_ADDR_HEADER, BOT)]);
    assert_eq!(*route(&manager, &report, &cfg).status(), 302u16);

    let page = request_with_headers("/", &[(CLIENT_ADDR_HEADER, BOT)]);
    let resp = route(&manager, &page, &cfg);
    assert_eq!(*resp.status(), 403u16);
    assert!(body_text(&resp).contains(BLOCKED_MESSAGE));
}

#[test]
fn blocked_client_cannot_reach_checkout() {
    let kv = InMemoryStore::default();
    let clock = ManualClock::at(1000);
    let manager = BlockManager::with_clock(KvBlockStore::new(&kv), &clock, ExpiryPolicy::default());
    manager.block("203.0.113.5").unwrap();
    let req = form_request(Method::Post, "/checkout", &[(CLIENT_ADDR_HEADER, BOT)], "name_on_card=");
    assert_eq!(*route(&manager, &req, &Config::default()).status(), 403u16);
}

#[test]
fn blocked_operator_still_reaches_admin() {
    let kv = InMemoryStore::default();
    let clock = ManualClock::at(1000);
    let manager = BlockManager::with_clock(KvBlockStore::new(&kv), &clock, ExpiryPolicy::default());
    manager.block("203.0.113.5").unwrap();
    let req = form_request(
        Method::Post,
        "/admin/blocked-ips",
        &[(CLIENT_ADDR_HEADER, BOT), ("authorization", "Bearer test-admin-key")],
        "remove_ip=203.0.113.5",
    );
    assert_eq!(*route(&manager, &req, &keyed_config()).status(), 200u16);
    assert!(!manager.is_blocked("203.0.113.5").unwrap());
}

#[test]
fn checkout_get_passes_through() {
    let kv = InMemoryStore::default();
    let manager = BlockManager::new(KvBlockStore::new(&kv), ExpiryPolicy::default());
    let req = request_with_headers("/checkout?name_on_card=x", &[(CLIENT_ADDR_HEADER, BOT)]);
    assert_eq!(*route(&manager, &req, &Config::default()).status(), 200u16);
    assert!(manager.list_active().unwrap().is_empty());
}

#[test]
fn fail_mode_applies_to_pipeline() {
    let kv = FailingStore;
    let manager = BlockManager::new(KvBlockStore::new(&kv), ExpiryPolicy::default());
    let page = request_with_headers("/", &[(CLIENT_ADDR_HEADER, BOT)]);

    assert_eq!(*route(&manager, &page, &Config::default()).status(), 200u16);

    let closed = Config {
        fail_mode: FailMode::Closed,
        ..Config::default()
    };
    assert_eq!(*route(&manager, &page, &closed).status(), 500u16);
}
