use std::sync::Arc;

use metaperf_core::error::Result;
use metaperf_core::perf::PerfRegistry;
use metaperf_core::region::{MetaspaceStats, RegionScope};

use super::perf_set::PerfCounterSet;
use super::source::{RegionCounters, RegionSource};
use crate::config::PerfFlags;

/// Counters for the whole metaspace, published under `metaspace.*`.
pub struct MetaspaceCounters {
    inner: RegionCounters,
}

impl MetaspaceCounters {
    pub const NAMESPACE: &'static str = "metaspace";

    /// Chunks in use + committed free space + free list, across all types.
    pub fn calculate_capacity(stats: &dyn MetaspaceStats) -> u64 {
        RegionScope::Metaspace.capacity(stats)
    }

    /// Register the counters. Returns `None` when perf data is disabled, in
    /// which case nothing is registered.
    pub fn initialize_performance_counters(
        flags: &PerfFlags,
        stats: Arc<dyn MetaspaceStats>,
        registry: &dyn PerfRegistry,
    ) -> Result<Option<Self>> {
        if !flags.use_perf_data {
            tracing::debug!(ns = Self::NAMESPACE, "perf data disabled; counters not created");
            return Ok(None);
        }

        let source = RegionSource::Active { stats, scope: RegionScope::Metaspace };
        let inner = RegionCounters::register(Self::NAMESPACE, source, registry)?;
        Ok(Some(Self { inner }))
    }

    pub fn update_performance_counters(&self) {
        self.inner.update();
    }

    pub fn perf_counters(&self) -> &PerfCounterSet {
        self.inner.perf_counters()
    }
}
