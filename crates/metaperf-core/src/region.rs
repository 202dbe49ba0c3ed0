//! Allocator accounting contract and region-level aggregation.
//!
//! The allocator keeps capacity in three disjoint structures: chunks in use,
//! committed space not yet handed out, and the chunk free list. None of them
//! tracks total committed capacity, so `RegionScope::capacity` reconciles all
//! three at the moment of the call. The sum is a point-in-time sample with no
//! transactional guarantee across the three reads.

use serde::Serialize;

/// Metadata type tracked separately by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataType {
    /// General metadata (methods, constant pools, ...).
    NonClass,
    /// Class structures living in the compressed class space.
    Class,
}

impl MetadataType {
    pub const ALL: [MetadataType; 2] = [MetadataType::NonClass, MetadataType::Class];

    pub fn as_str(self) -> &'static str {
        match self {
            MetadataType::NonClass => "non_class",
            MetadataType::Class => "class",
        }
    }
}

/// Aggregate queries the counter layer reads from the metadata allocator.
///
/// All values are bytes. Implementations may be read concurrently with
/// allocator mutation; callers treat results as advisory.
pub trait MetaspaceStats: Send + Sync {
    /// Capacity of chunks currently in use.
    fn allocated_capacity_bytes(&self, ty: MetadataType) -> u64;
    /// Committed space not yet handed out as a chunk.
    fn free_bytes(&self, ty: MetadataType) -> u64;
    /// Capacity sitting in the chunk free list.
    fn free_chunks_total_in_bytes(&self, ty: MetadataType) -> u64;
    /// Reserved address space, the most the region can grow to.
    fn reserved_in_bytes(&self, ty: MetadataType) -> u64;
    /// Bytes occupied by live metadata.
    fn allocated_used_bytes(&self, ty: MetadataType) -> u64;
    /// Smallest chunk the allocator hands out.
    fn min_chunk_size(&self) -> u64;
}

/// Which part of the metaspace a counter set reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionScope {
    /// The whole metaspace: every metadata type.
    Metaspace,
    /// Only the compressed class space.
    CompressedClassSpace,
}

impl RegionScope {
    /// Metadata types summed for this scope.
    pub fn types(self) -> &'static [MetadataType] {
        match self {
            RegionScope::Metaspace => &MetadataType::ALL,
            RegionScope::CompressedClassSpace => &[MetadataType::Class],
        }
    }

    fn sum(self, f: impl Fn(MetadataType) -> u64) -> u64 {
        self.types().iter().map(|&ty| f(ty)).fold(0, u64::saturating_add)
    }

    /// Committed capacity: chunks in use + committed free space + free list.
    pub fn capacity(self, stats: &dyn MetaspaceStats) -> u64 {
        self.sum(|ty| {
            stats
                .allocated_capacity_bytes(ty)
                .saturating_add(stats.free_bytes(ty))
                .saturating_add(stats.free_chunks_total_in_bytes(ty))
        })
    }

    pub fn max_capacity(self, stats: &dyn MetaspaceStats) -> u64 {
        self.sum(|ty| stats.reserved_in_bytes(ty))
    }

    pub fn used(self, stats: &dyn MetaspaceStats) -> u64 {
        self.sum(|ty| stats.allocated_used_bytes(ty))
    }

    /// Sample the three mutable quantities.
    pub fn sample(self, stats: &dyn MetaspaceStats) -> RegionSizes {
        RegionSizes {
            capacity: self.capacity(stats),
            max_capacity: self.max_capacity(stats),
            used: self.used(stats),
        }
    }
}

/// One sample of a region's mutable counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegionSizes {
    pub capacity: u64,
    pub max_capacity: u64,
    pub used: u64,
}
