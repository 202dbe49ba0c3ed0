use std::sync::Arc;

use metaperf_core::error::Result;
use metaperf_core::perf::PerfRegistry;
use metaperf_core::region::{MetaspaceStats, RegionScope, RegionSizes};

use super::perf_set::PerfCounterSet;

/// Where a counter set gets its values from.
#[derive(Clone)]
pub enum RegionSource {
    /// Live aggregates from the allocator for `scope`.
    Active {
        stats: Arc<dyn MetaspaceStats>,
        scope: RegionScope,
    },
    /// Feature is off: counters exist with every value at zero and are never
    /// written again.
    Disabled,
}

impl RegionSource {
    pub fn min_capacity(&self) -> u64 {
        match self {
            RegionSource::Active { stats, .. } => stats.min_chunk_size(),
            RegionSource::Disabled => 0,
        }
    }

    /// Fresh sample, or `None` when there is nothing to publish.
    pub fn sample(&self) -> Option<RegionSizes> {
        match self {
            RegionSource::Active { stats, scope } => Some(scope.sample(stats.as_ref())),
            RegionSource::Disabled => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RegionSource::Active { .. })
    }
}

/// A registered counter set bound to its source.
pub struct RegionCounters {
    source: RegionSource,
    set: PerfCounterSet,
}

impl RegionCounters {
    /// Sample the source once and register the counters under `namespace`.
    pub fn register(
        namespace: &str,
        source: RegionSource,
        registry: &dyn PerfRegistry,
    ) -> Result<Self> {
        let min_capacity = source.min_capacity();
        let sizes = source.sample().unwrap_or_default();
        let set = PerfCounterSet::create(
            registry,
            namespace,
            min_capacity,
            sizes.capacity,
            sizes.max_capacity,
            sizes.used,
        )?;

        tracing::info!(
            ns = namespace,
            active = source.is_active(),
            min_capacity,
            capacity = sizes.capacity,
            max_capacity = sizes.max_capacity,
            used = sizes.used,
            "metaspace perf counters registered"
        );

        Ok(Self { source, set })
    }

    /// Re-sample an active source and publish. A disabled source is left
    /// untouched.
    pub fn update(&self) {
        if let Some(sizes) = self.source.sample() {
            self.set.update(sizes.capacity, sizes.max_capacity, sizes.used);
            tracing::trace!(
                ns = self.set.namespace(),
                capacity = sizes.capacity,
                max_capacity = sizes.max_capacity,
                used = sizes.used,
                "metaspace perf counters updated"
            );
        }
    }

    pub fn source(&self) -> &RegionSource {
        &self.source
    }

    pub fn perf_counters(&self) -> &PerfCounterSet {
        &self.set
    }
}
