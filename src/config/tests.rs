use super::*;
use std::collections::HashMap;

fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn empty_environment_yields_defaults() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.block_duration_secs, 604_800);
    assert_eq!(cfg.fail_mode, FailMode::Open);
    assert_eq!(cfg.honeypot_field, "name_on_card");
    assert!(cfg.forwarded_ip_secret.is_none());
}

#[test]
fn duration_override_and_policy() {
    let cfg = config_from(&[("IP_BLOCKER_BLOCK_DURATION_SECONDS", " 3600 ")]).unwrap();
    assert_eq!(cfg.expiry_policy().duration_secs(), 3600);
}

#[test]
fn zero_or_garbage_duration_is_rejected() {
    for raw in ["0", "-5", "week"] {
        let err = config_from(&[("IP_BLOCKER_BLOCK_DURATION_SECONDS", raw)]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "IP_BLOCKER_BLOCK_DURATION_SECONDS",
                value: raw.to_string(),
            }
        );
    }
}

#[test]
fn fail_mode_accepts_labels_and_bool_like_values() {
    assert_eq!(parse_fail_mode("Closed"), Some(FailMode::Closed));
    assert_eq!(parse_fail_mode("open"), Some(FailMode::Open));
    assert_eq!(parse_fail_mode("false"), Some(FailMode::Closed));
    assert_eq!(parse_fail_mode("1"), Some(FailMode::Open));
    assert_eq!(parse_fail_mode("sometimes"), None);
    assert!(config_from(&[("IP_BLOCKER_FAIL_MODE", "sometimes")]).is_err());
}

#[test]
fn insecure_placeholder_api_key_counts_as_unset() {
    let cfg = config_from(&[("IP_BLOCKER_API_KEY", "changeme-supersecret")]).unwrap();
    assert_eq!(cfg.admin_api_key, None);
    let cfg = config_from(&[("IP_BLOCKER_API_KEY", "  real-key ")]).unwrap();
    assert_eq!(cfg.admin_api_key.as_deref(), Some("real-key"));
}

#[test]
fn route_paths_must_be_absolute() {
    assert!(config_from(&[("IP_BLOCKER_REPORT_PATH", "block")]).is_err());
    let cfg = config_from(&[
        ("IP_BLOCKER_REPORT_PATH", "/wp-admin/admin-ajax.php"),
        ("IP_BLOCKER_CHECKOUT_PATH", "/shop/checkout"),
    ])
    .unwrap();
    assert_eq!(cfg.report_path, "/wp-admin/admin-ajax.php");
    assert_eq!(cfg.checkout_path, "/shop/checkout");
}

#[test]
fn from_env_reads_process_environment() {
    let _lock = crate::test_support::lock_env();
    std::env::set_var("IP_BLOCKER_HONEYPOT_FIELD", "company_fax");
    std::env::set_var("IP_BLOCKER_FORWARDED_IP_SECRET", "proxy-secret");
    let cfg = Config::from_env().unwrap();
    std::env::remove_var("IP_BLOCKER_HONEYPOT_FIELD");
    std::env::remove_var("IP_BLOCKER_FORWARDED_IP_SECRET");
    assert_eq!(cfg.honeypot_field, "company_fax");
    assert_eq!(cfg.forwarded_ip_secret.as_deref(), Some("proxy-secret"));
}
