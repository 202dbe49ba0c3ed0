//! metaperf binary
//!
//! - Loads `metaperf.yaml` (or the path given as the first argument)
//! - Registers metaspace + compressed class space counters
//! - Samples them on a fixed interval until ctrl-c
//! - Dumps the registry on exit
//!
//! The accounting starts with the configured reservations and nothing
//! committed. An embedding allocator is expected to drive
//! `MetaspaceAccounting` (`commit`, `add_chunk`, `allocate`, `return_chunk`);
//! standalone, the sampler republishes the seeded figures.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use metaperf_core::error::{MetaperfError, Result};
use metaperf_counters::accounting::MetaspaceAccounting;
use metaperf_counters::obs::PerfDataRegistry;
use metaperf_counters::{config, sampler, PerfCountersContext};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind().as_str(), "metaperf failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "metaperf.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let registry = Arc::new(PerfDataRegistry::from_config(&cfg.perf_data));
    let accounting = Arc::new(MetaspaceAccounting::from_config(&cfg.metaspace));

    let ctx = Arc::new(PerfCountersContext::new(
        cfg.flags(),
        accounting,
        Arc::clone(&registry) as _,
    ));
    ctx.initialize_performance_counters()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let period = Duration::from_millis(cfg.perf_data.sample_interval_ms);
    let sampler = sampler::spawn_sampler(Arc::clone(&ctx), period, shutdown_rx);

    tracing::info!(config = %path, entries = registry.len(), "metaperf sampling");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| MetaperfError::Internal(format!("ctrl-c handler failed: {e}")))?;

    let _ = shutdown_tx.send(true);
    sampler
        .await
        .map_err(|e| MetaperfError::Internal(format!("sampler task failed: {e}")))?;

    let snapshot = serde_json::to_string(&registry.snapshot())
        .map_err(|e| MetaperfError::Internal(format!("snapshot encode failed: {e}")))?;
    tracing::info!(%snapshot, "final perf counters");
    print!("{}", registry.render());
    Ok(())
}
