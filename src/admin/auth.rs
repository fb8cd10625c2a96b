// src/admin/auth.rs
// Bearer API key check for the admin endpoints

use crate::config::Config;
use spin_sdk::http::Request;

pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn bearer_token(req: &Request) -> Option<&str> {
    let header = req.header("authorization")?.as_str()?;
    header.strip_prefix("Bearer ").map(str::trim)
}

/// Returns true if the request carries the configured admin key. With no key
/// configured nobody is authorized.
pub fn is_authorized(req: &Request, cfg: &Config) -> bool {
    let Some(expected) = cfg.admin_api_key.as_deref() else {
        return false;
    };
    let Some(candidate) = bearer_token(req) else {
        return false;
    };
    constant_time_eq(candidate, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::request_with_headers;

    fn keyed_config() -> Config {
        Config {
            admin_api_key: Some("test-admin-key".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn accepts_matching_bearer_key() {
        let req = request_with_headers("/admin", &[("authorization", "Bearer test-admin-key")]);
        assert!(is_authorized(&req, &keyed_config()));
    }

    #[test]
    fn rejects_wrong_or_missing_key() {
        let wrong = request_with_headers("/admin", &[("authorization", "Bearer nope")]);
        assert!(!is_authorized(&wrong, &keyed_config()));
        let basic = request_with_headers("/admin", &[("authorization", "Basic test-admin-key")]);
        assert!(!is_authorized(&basic, &keyed_config()));
        let missing = request_with_headers("/admin", &[]);
        assert!(!is_authorized(&missing, &keyed_config()));
    }

    #[test]
    fn unconfigured_key_locks_admin() {
        let req = request_with_headers("/admin", &[("authorization", "Bearer ")]);
        assert!(!is_authorized(&req, &Config::default()));
    }

    #[test]
    fn constant_time_eq_matches_plain_equality() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
    }
}
