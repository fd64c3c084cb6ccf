//! Run horizon scanner
//!
//! Pages through workflow runs (newest first, a precondition of the API, not
//! verified here) and stops paginating once a page contains a run older than
//! the lookback horizon. The triggering page is kept in full: its runs still
//! go through artifact classification, where the age cutoff decides what is
//! deleted. The horizon only bounds how far back the scan reaches.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::api::ActionsApi;
use crate::engine::pages;
use scour_client::PER_PAGE;
use scour_core::domain::WorkflowRun;

/// Lookback window bounding how many run pages are scanned. Deliberately
/// distinct from the deletion cutoff and not user-configurable.
pub(crate) const RUN_HORIZON_DAYS: i64 = 90;

/// Fetches workflow runs up to the horizon.
///
/// If no run ever falls outside the horizon, every page is scanned:
/// completeness is preferred over a hard page cap.
pub(crate) async fn scan_runs(api: &dyn ActionsApi, now: DateTime<Utc>) -> Result<Vec<WorkflowRun>> {
    let horizon = now - Duration::days(RUN_HORIZON_DAYS);

    let runs = pages::collect_until(
        PER_PAGE as usize,
        |page| api.runs_page(page),
        |batch| {
            let stop = batch.iter().any(|run| run.created_at < horizon);
            if stop {
                debug!("Reached a run older than {} days, stopping pagination", RUN_HORIZON_DAYS);
            }
            stop
        },
    )
    .await
    .context("Failed to fetch workflow runs")?;

    info!("Scanned {} workflow run(s)", runs.len());

    Ok(runs)
}
