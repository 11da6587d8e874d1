//! Centralized environment variable access for the daemon crate.

use std::time::Duration;

/// How often the background sweep runs. Default 30s (§4.6).
pub fn sweep_interval() -> Duration {
    sweep_interval_override().unwrap_or(Duration::from_secs(30))
}

/// `IQ_SWEEP_INTERVAL_SECS` if set, otherwise `None` — used by
/// [`crate::config::load`] to apply the env layer only where it was
/// actually set, leaving the config-file or built-in value in place
/// otherwise.
pub fn sweep_interval_override() -> Option<Duration> {
    std::env::var("IQ_SWEEP_INTERVAL_SECS").ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_secs)
}

/// Restrict sweeping to one company, by id string. Unset sweeps every
/// active company.
pub fn sweep_company_id() -> Option<String> {
    std::env::var("IQ_SWEEP_COMPANY_ID").ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
