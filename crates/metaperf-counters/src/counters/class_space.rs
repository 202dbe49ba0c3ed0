use std::sync::Arc;

use metaperf_core::error::Result;
use metaperf_core::perf::PerfRegistry;
use metaperf_core::region::{MetaspaceStats, RegionScope};

use super::perf_set::PerfCounterSet;
use super::source::{RegionCounters, RegionSource};
use crate::config::PerfFlags;

/// Counters for the compressed class space, published under
/// `compressedclassspace.*`.
///
/// The namespace is registered whenever perf data is on, so monitoring tools
/// always find it. Without compressed class pointers every value is zero.
pub struct CompressedClassSpaceCounters {
    inner: RegionCounters,
}

impl CompressedClassSpaceCounters {
    pub const NAMESPACE: &'static str = "compressedclassspace";

    pub fn calculate_capacity(stats: &dyn MetaspaceStats) -> u64 {
        RegionScope::CompressedClassSpace.capacity(stats)
    }

    pub fn initialize_performance_counters(
        flags: &PerfFlags,
        stats: Arc<dyn MetaspaceStats>,
        registry: &dyn PerfRegistry,
    ) -> Result<Option<Self>> {
        if !flags.use_perf_data {
            tracing::debug!(ns = Self::NAMESPACE, "perf data disabled; counters not created");
            return Ok(None);
        }

        let source = if flags.use_compressed_class_pointers {
            RegionSource::Active { stats, scope: RegionScope::CompressedClassSpace }
        } else {
            tracing::debug!(
                ns = Self::NAMESPACE,
                "compressed class pointers off; publishing zero counters"
            );
            RegionSource::Disabled
        };

        let inner = RegionCounters::register(Self::NAMESPACE, source, registry)?;
        Ok(Some(Self { inner }))
    }

    /// Republish when compressed class pointers are in use; a zeroed set
    /// stays as registered.
    pub fn update_performance_counters(&self) {
        self.inner.update();
    }

    pub fn is_active(&self) -> bool {
        self.inner.source().is_active()
    }

    pub fn perf_counters(&self) -> &PerfCounterSet {
        self.inner.perf_counters()
    }
}
