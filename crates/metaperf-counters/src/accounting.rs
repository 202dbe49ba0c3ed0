//! Atomic chunk bookkeeping that an embedding allocator can report into.
//!
//! Each metadata type keeps the same disjoint structures the allocator does:
//! committed space not yet carved into chunks, chunks in use, and the chunk
//! free list. `MetaspaceAccounting` only mirrors the sizes; it never hands out
//! memory. Per-field updates are atomic but a multi-field operation is not,
//! which matches the advisory nature of the counters reading it.

use std::sync::atomic::{AtomicU64, Ordering};

use metaperf_core::region::{MetadataType, MetaspaceStats};

use crate::config::MetaspaceSection;

#[derive(Default)]
struct TypeAccounting {
    reserved: AtomicU64,
    committed_free: AtomicU64,
    chunk_capacity: AtomicU64,
    used: AtomicU64,
    free_chunks: AtomicU64,
}

impl TypeAccounting {
    fn committed(&self) -> u64 {
        self.committed_free.load(Ordering::Relaxed)
            + self.chunk_capacity.load(Ordering::Relaxed)
            + self.free_chunks.load(Ordering::Relaxed)
    }
}

/// Subtract up to `want` from `cell`, returning how much was taken.
fn take_up_to(cell: &AtomicU64, want: u64) -> u64 {
    let prev = cell
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
            Some(cur - cur.min(want))
        })
        .unwrap_or_else(|cur| cur);
    prev.min(want)
}

pub struct MetaspaceAccounting {
    min_chunk_size: u64,
    non_class: TypeAccounting,
    class: TypeAccounting,
}

impl MetaspaceAccounting {
    pub fn new(min_chunk_size: u64) -> Self {
        Self {
            min_chunk_size,
            non_class: TypeAccounting::default(),
            class: TypeAccounting::default(),
        }
    }

    /// Seed reservations from config: non-class always, class only when
    /// compressed class pointers are in use.
    pub fn from_config(cfg: &MetaspaceSection) -> Self {
        let acc = Self::new(cfg.min_chunk_bytes);
        acc.set_reserved(MetadataType::NonClass, cfg.max_metaspace_bytes);
        if cfg.compressed_class_pointers {
            acc.set_reserved(MetadataType::Class, cfg.compressed_class_space_bytes);
        }
        acc
    }

    fn of(&self, ty: MetadataType) -> &TypeAccounting {
        match ty {
            MetadataType::NonClass => &self.non_class,
            MetadataType::Class => &self.class,
        }
    }

    pub fn set_reserved(&self, ty: MetadataType, bytes: u64) {
        self.of(ty).reserved.store(bytes, Ordering::Relaxed);
    }

    /// Commit more space for `ty`, bounded by its reservation.
    /// Returns the bytes actually committed.
    pub fn commit(&self, ty: MetadataType, bytes: u64) -> u64 {
        let acc = self.of(ty);
        let headroom = acc
            .reserved
            .load(Ordering::Relaxed)
            .saturating_sub(acc.committed());
        let grant = bytes.min(headroom);
        acc.committed_free.fetch_add(grant, Ordering::Relaxed);
        grant
    }

    /// Put a chunk of `bytes` into use, preferring the free list over fresh
    /// committed space. Returns false when neither can supply it.
    pub fn add_chunk(&self, ty: MetadataType, bytes: u64) -> bool {
        let bytes = bytes.max(self.min_chunk_size);
        let acc = self.of(ty);

        let from_free_list = acc
            .free_chunks
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                (cur >= bytes).then(|| cur - bytes)
            })
            .is_ok();

        if !from_free_list {
            let from_committed = acc
                .committed_free
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                    (cur >= bytes).then(|| cur - bytes)
                })
                .is_ok();
            if !from_committed {
                return false;
            }
        }

        acc.chunk_capacity.fetch_add(bytes, Ordering::Relaxed);
        true
    }

    /// Record `bytes` of live metadata inside chunks already in use.
    /// Returns false when the chunks in use have no room left.
    pub fn allocate(&self, ty: MetadataType, bytes: u64) -> bool {
        let acc = self.of(ty);
        let capacity = acc.chunk_capacity.load(Ordering::Relaxed);
        acc.used
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                let next = cur.checked_add(bytes)?;
                (next <= capacity).then_some(next)
            })
            .is_ok()
    }

    /// Retire a chunk that held `used_bytes` of metadata to the free list.
    pub fn return_chunk(&self, ty: MetadataType, chunk_bytes: u64, used_bytes: u64) {
        let acc = self.of(ty);
        let moved = take_up_to(&acc.chunk_capacity, chunk_bytes);
        take_up_to(&acc.used, used_bytes.min(moved));
        acc.free_chunks.fetch_add(moved, Ordering::Relaxed);
    }
}

impl MetaspaceStats for MetaspaceAccounting {
    fn allocated_capacity_bytes(&self, ty: MetadataType) -> u64 {
        self.of(ty).chunk_capacity.load(Ordering::Relaxed)
    }

    fn free_bytes(&self, ty: MetadataType) -> u64 {
        self.of(ty).committed_free.load(Ordering::Relaxed)
    }

    fn free_chunks_total_in_bytes(&self, ty: MetadataType) -> u64 {
        self.of(ty).free_chunks.load(Ordering::Relaxed)
    }

    fn reserved_in_bytes(&self, ty: MetadataType) -> u64 {
        self.of(ty).reserved.load(Ordering::Relaxed)
    }

    fn allocated_used_bytes(&self, ty: MetadataType) -> u64 {
        self.of(ty).used.load(Ordering::Relaxed)
    }

    fn min_chunk_size(&self) -> u64 {
        self.min_chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaperf_core::region::RegionScope;

    fn assert_ordered(acc: &MetaspaceAccounting) {
        for scope in [RegionScope::Metaspace, RegionScope::CompressedClassSpace] {
            let s = scope.sample(acc);
            assert!(s.used <= s.capacity, "{scope:?}: {s:?}");
            assert!(s.capacity <= s.max_capacity, "{scope:?}: {s:?}");
        }
    }

    #[test]
    fn config_seeds_reservations() {
        let cfg = MetaspaceSection {
            compressed_class_pointers: false,
            min_chunk_bytes: 512,
            compressed_class_space_bytes: 1 << 30,
            max_metaspace_bytes: 64 << 20,
        };
        let acc = MetaspaceAccounting::from_config(&cfg);
        assert_eq!(acc.min_chunk_size(), 512);
        assert_eq!(acc.reserved_in_bytes(MetadataType::NonClass), 64 << 20);
        assert_eq!(acc.reserved_in_bytes(MetadataType::Class), 0);
        assert_eq!(RegionScope::Metaspace.max_capacity(&acc), 64 << 20);

        let cfg = MetaspaceSection { compressed_class_pointers: true, ..cfg };
        let acc = MetaspaceAccounting::from_config(&cfg);
        assert_eq!(acc.reserved_in_bytes(MetadataType::Class), 1 << 30);
    }

    #[test]
    fn commit_is_bounded_by_reservation() {
        let acc = MetaspaceAccounting::new(64);
        acc.set_reserved(MetadataType::NonClass, 1000);
        assert_eq!(acc.commit(MetadataType::NonClass, 600), 600);
        assert_eq!(acc.commit(MetadataType::NonClass, 600), 400);
        assert_eq!(acc.commit(MetadataType::NonClass, 1), 0);
        assert_eq!(acc.free_bytes(MetadataType::NonClass), 1000);
    }

    #[test]
    fn chunks_round_up_to_min_chunk_size() {
        let acc = MetaspaceAccounting::new(256);
        acc.set_reserved(MetadataType::Class, 4096);
        acc.commit(MetadataType::Class, 4096);
        assert!(acc.add_chunk(MetadataType::Class, 10));
        assert_eq!(acc.allocated_capacity_bytes(MetadataType::Class), 256);
        assert_eq!(acc.free_bytes(MetadataType::Class), 4096 - 256);
    }

    #[test]
    fn allocation_cannot_exceed_chunks_in_use() {
        let acc = MetaspaceAccounting::new(64);
        acc.set_reserved(MetadataType::NonClass, 1024);
        acc.commit(MetadataType::NonClass, 1024);
        assert!(acc.add_chunk(MetadataType::NonClass, 128));
        assert!(acc.allocate(MetadataType::NonClass, 100));
        assert!(!acc.allocate(MetadataType::NonClass, 100));
        assert_eq!(acc.allocated_used_bytes(MetadataType::NonClass), 100);
    }

    #[test]
    fn returned_chunks_are_reused_before_committed_space() {
        let acc = MetaspaceAccounting::new(64);
        acc.set_reserved(MetadataType::NonClass, 1024);
        acc.commit(MetadataType::NonClass, 512);
        assert!(acc.add_chunk(MetadataType::NonClass, 256));
        assert!(acc.allocate(MetadataType::NonClass, 200));
        acc.return_chunk(MetadataType::NonClass, 256, 200);

        assert_eq!(acc.free_chunks_total_in_bytes(MetadataType::NonClass), 256);
        assert_eq!(acc.allocated_used_bytes(MetadataType::NonClass), 0);

        assert!(acc.add_chunk(MetadataType::NonClass, 256));
        assert_eq!(acc.free_chunks_total_in_bytes(MetadataType::NonClass), 0);
        assert_eq!(acc.free_bytes(MetadataType::NonClass), 256);
    }

    #[test]
    fn aggregates_stay_ordered_under_normal_operation() {
        let acc = MetaspaceAccounting::new(64);
        acc.set_reserved(MetadataType::NonClass, 64 * 1024);
        acc.set_reserved(MetadataType::Class, 16 * 1024);
        assert_ordered(&acc);

        for round in 0..32u64 {
            let ty = if round % 3 == 0 { MetadataType::Class } else { MetadataType::NonClass };
            acc.commit(ty, 1024);
            if acc.add_chunk(ty, 64 + (round % 4) * 64) {
                acc.allocate(ty, 48);
            }
            if round % 5 == 4 {
                acc.return_chunk(ty, 64, 48);
            }
            assert_ordered(&acc);
        }

        let total = RegionScope::Metaspace.sample(&acc);
        assert!(total.capacity > 0);
        assert!(total.used > 0);
    }
}
