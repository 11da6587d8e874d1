#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! iq-daemon: the process that owns the Consistency Sweeper's timer
//! (§4.6) and the `tracing` setup the rest of the workspace logs through.
//! Everything else about running the coordination core — the HTTP layer,
//! auth, the UI — is out of scope (§1) and lives outside this workspace.

pub mod config;
pub mod env;

use iq_core::{CompanyId, SystemClock};
use iq_engine::Engine;
use iq_storage::InMemoryStore;
use std::time::Duration;

/// Run the sweep loop until the process is told to stop. Each tick calls
/// `sweep` and logs the report; a failing sweep is logged and retried on
/// the next tick rather than terminating the loop (§4.6).
pub async fn run_sweep_loop(
    engine: &Engine<InMemoryStore, SystemClock>,
    interval: Duration,
    company_id: Option<CompanyId>,
) -> ! {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match engine.sweep(company_id).await {
            Ok(report) => tracing::info!(
                companies_checked = report.companies_checked,
                duplicate_in_progress_repaired = report.duplicate_in_progress_repaired,
                positions_recomputed = report.positions_recomputed,
                duplicate_active_repaired = report.duplicate_active_repaired,
                orphaned_entries_cancelled = report.orphaned_entries_cancelled,
                "sweep completed"
            ),
            Err(err) => tracing::warn!(%err, "sweep failed, retrying next tick"),
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
