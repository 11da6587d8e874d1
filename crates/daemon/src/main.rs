//! Binary entry point: wires an `Engine` to the sweep timer and installs
//! the `tracing` subscriber every component logs through.

use iq_core::{CompanyId, SystemClock};
use iq_daemon::config;
use iq_engine::Engine;
use iq_storage::InMemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let engine = Engine::new(InMemoryStore::new(), SystemClock);
    let config = config::load();
    let company_id = config.sweep_company_id.and_then(|raw| match CompanyId::try_from_string(&raw) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::warn!(%err, "ignoring malformed sweep company id, sweeping every company");
            None
        }
    });

    tracing::info!(interval_secs = config.sweep_interval.as_secs(), "sweep loop starting");
    iq_daemon::run_sweep_loop(&engine, config.sweep_interval, company_id).await;
}
