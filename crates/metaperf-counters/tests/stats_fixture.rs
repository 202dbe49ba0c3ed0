//! Scripted allocator figures shared by the counter tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Mutex;

use metaperf_core::region::{MetadataType, MetaspaceStats};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeFigures {
    pub allocated_capacity: u64,
    pub free: u64,
    pub free_chunks: u64,
    pub reserved: u64,
    pub used: u64,
}

pub struct ScriptedStats {
    min_chunk: u64,
    non_class: Mutex<TypeFigures>,
    class: Mutex<TypeFigures>,
}

impl ScriptedStats {
    pub fn new(min_chunk: u64, non_class: TypeFigures, class: TypeFigures) -> Self {
        Self {
            min_chunk,
            non_class: Mutex::new(non_class),
            class: Mutex::new(class),
        }
    }

    pub fn set(&self, ty: MetadataType, figures: TypeFigures) {
        *self.slot(ty).lock().unwrap() = figures;
    }

    fn slot(&self, ty: MetadataType) -> &Mutex<TypeFigures> {
        match ty {
            MetadataType::NonClass => &self.non_class,
            MetadataType::Class => &self.class,
        }
    }

    fn read(&self, ty: MetadataType) -> TypeFigures {
        *self.slot(ty).lock().unwrap()
    }
}

impl MetaspaceStats for ScriptedStats {
    fn allocated_capacity_bytes(&self, ty: MetadataType) -> u64 {
        self.read(ty).allocated_capacity
    }
    fn free_bytes(&self, ty: MetadataType) -> u64 {
        self.read(ty).free
    }
    fn free_chunks_total_in_bytes(&self, ty: MetadataType) -> u64 {
        self.read(ty).free_chunks
    }
    fn reserved_in_bytes(&self, ty: MetadataType) -> u64 {
        self.read(ty).reserved
    }
    fn allocated_used_bytes(&self, ty: MetadataType) -> u64 {
        self.read(ty).used
    }
    fn min_chunk_size(&self) -> u64 {
        self.min_chunk
    }
}

/// Non-class: capacity 100 + 50 + 25 = 175. Class: 40 + 20 + 4 = 64.
pub fn baseline() -> ScriptedStats {
    ScriptedStats::new(
        512,
        TypeFigures { allocated_capacity: 100, free: 50, free_chunks: 25, reserved: 4096, used: 90 },
        TypeFigures { allocated_capacity: 40, free: 20, free_chunks: 4, reserved: 1024, used: 30 },
    )
}
