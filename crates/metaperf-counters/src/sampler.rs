//! Periodic counter refresh.
//!
//! One tokio task per context calls `update_performance_counters` on a fixed
//! interval. Missed ticks are skipped rather than replayed. A component that
//! failed to initialize is reported once and the other keeps being refreshed;
//! the task ends only when no component has counters left to refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::context::PerfCountersContext;

/// Shortest accepted sampling period; `interval` rejects zero.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

pub fn spawn_sampler(
    ctx: Arc<PerfCountersContext>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = period.max(MIN_PERIOD);
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(period_ms, "metaspace sampler started");
        let mut warned = false;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = ctx.update_performance_counters() {
                        if !ctx.has_ready_counters() {
                            tracing::warn!(error = %e, kind = e.kind().as_str(), "metaspace sampler stopped");
                            break;
                        }
                        if !warned {
                            tracing::warn!(error = %e, kind = e.kind().as_str(), "metaspace sampler skipping a component");
                            warned = true;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped sender also means shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("metaspace sampler exited");
    })
}
