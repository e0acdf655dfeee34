//! Runtime configuration for the monitor.
//!
//! Read from the environment once at startup. Unknown values fall back to the
//! defaults with a warning.

use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Which volume channels to attach on each output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionPolicy {
    /// Mute plus main, left and right volume, whatever the device reports.
    /// Survives capability changes at runtime, such as a Bluetooth profile switch.
    #[default]
    Unconditional,

    /// Mute plus main volume if the device exposes it, otherwise left and right.
    Probed,
}

/// Configuration error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown subscription policy: {0} (expected \"all\" or \"probed\")")]
    UnknownPolicy(String),
}

impl FromStr for SubscriptionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "unconditional" => Ok(SubscriptionPolicy::Unconditional),
            "probed" => Ok(SubscriptionPolicy::Probed),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Monitor configuration.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    pub subscription_policy: SubscriptionPolicy,
}

impl MonitorConfig {
    pub const SUBSCRIPTION_ENV: &'static str = "MENUBAR_VOLUME_SUBSCRIPTION";

    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let subscription_policy = match lookup(Self::SUBSCRIPTION_ENV) {
            Some(value) => value.parse::<SubscriptionPolicy>().unwrap_or_else(|e: ConfigError| {
                warn!(error = %e, "Ignoring {}", Self::SUBSCRIPTION_ENV);
                SubscriptionPolicy::default()
            }),
            None => SubscriptionPolicy::default(),
        };

        Self {
            subscription_policy,
        }
    }
}
