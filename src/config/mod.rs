// src/config/mod.rs
// Runtime configuration loaded from the component environment

use crate::blocklist::{ExpiryPolicy, DEFAULT_BLOCK_DURATION_SECS};
use crate::error::ConfigError;
use std::env;

#[cfg(test)]
mod tests;

pub const DEFAULT_HONEYPOT_FIELD: &str = "name_on_card";
pub const DEFAULT_HOME_URL: &str = "/";
pub const DEFAULT_REPORT_PATH: &str = "/block-report";
pub const DEFAULT_CHECKOUT_PATH: &str = "/checkout";
pub const DEFAULT_LOG_FILTER: &str = "info";

const INSECURE_DEFAULT_API_KEY: &str = "changeme-supersecret";

/// What the enforcement gate does when the block list cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailMode {
    /// Let the request through.
    #[default]
    Open,
    /// Refuse the request with a 500.
    Closed,
}

impl FailMode {
    pub fn label(self) -> &'static str {
        match self {
            FailMode::Open => "open",
            FailMode::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub block_duration_secs: u64,
    pub fail_mode: FailMode,
    pub honeypot_field: String,
    pub home_url: String,
    pub report_path: String,
    pub checkout_path: String,
    pub admin_api_key: Option<String>,
    pub forwarded_ip_secret: Option<String>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            block_duration_secs: DEFAULT_BLOCK_DURATION_SECS,
            fail_mode: FailMode::Open,
            honeypot_field: DEFAULT_HONEYPOT_FIELD.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
            report_path: DEFAULT_REPORT_PATH.to_string(),
            checkout_path: DEFAULT_CHECKOUT_PATH.to_string(),
            admin_api_key: None,
            forwarded_ip_secret: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any name -> value source. Unset or blank values
    /// fall back to defaults; present but unusable values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        let block_duration_secs = match var("IP_BLOCKER_BLOCK_DURATION_SECONDS") {
            Some(raw) => parse_duration(&raw).ok_or(ConfigError::Invalid {
                name: "IP_BLOCKER_BLOCK_DURATION_SECONDS",
                value: raw,
            })?,
            None => defaults.block_duration_secs,
        };
        let fail_mode = match var("IP_BLOCKER_FAIL_MODE") {
            Some(raw) => parse_fail_mode(&raw).ok_or(ConfigError::Invalid {
                name: "IP_BLOCKER_FAIL_MODE",
                value: raw,
            })?,
            None => defaults.fail_mode,
        };
        let report_path = match var("IP_BLOCKER_REPORT_PATH") {
            Some(raw) => parse_route_path(&raw).ok_or(ConfigError::Invalid {
                name: "IP_BLOCKER_REPORT_PATH",
                value: raw,
            })?,
            None => defaults.report_path,
        };
        let checkout_path = match var("IP_BLOCKER_CHECKOUT_PATH") {
            Some(raw) => parse_route_path(&raw).ok_or(ConfigError::Invalid {
                name: "IP_BLOCKER_CHECKOUT_PATH",
                value: raw,
            })?,
            None => defaults.checkout_path,
        };

        Ok(Config {
            block_duration_secs,
            fail_mode,
            honeypot_field: var("IP_BLOCKER_HONEYPOT_FIELD").unwrap_or(defaults.honeypot_field),
            home_url: var("IP_BLOCKER_HOME_URL").unwrap_or(defaults.home_url),
            report_path,
            checkout_path,
            admin_api_key: var("IP_BLOCKER_API_KEY").filter(|k| k != INSECURE_DEFAULT_API_KEY),
            forwarded_ip_secret: var("IP_BLOCKER_FORWARDED_IP_SECRET"),
            log_filter: var("IP_BLOCKER_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::new(self.block_duration_secs)
    }
}

fn parse_duration(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|secs| *secs > 0)
}

pub(crate) fn parse_fail_mode(value: &str) -> Option<FailMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "open" => Some(FailMode::Open),
        "closed" => Some(FailMode::Closed),
        _ => parse_bool_like(value).map(|fail_open| {
            if fail_open {
                FailMode::Open
            } else {
                FailMode::Closed
            }
        }),
    }
}

fn parse_route_path(value: &str) -> Option<String> {
    if value.starts_with('/') && !value.contains(char::is_whitespace) {
        Some(value.to_string())
    } else {
        None
    }
}

fn parse_bool_like(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
