//! Periodic refresh driven by the sampler task.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use metaperf_core::region::MetadataType;
use metaperf_core::{PerfRegistry, PerfUnit};
use metaperf_counters::accounting::MetaspaceAccounting;
use metaperf_counters::config::PerfFlags;
use metaperf_counters::obs::PerfDataRegistry;
use metaperf_counters::{sampler, PerfCountersContext};

const ON: PerfFlags = PerfFlags { use_perf_data: true, use_compressed_class_pointers: true };

async fn wait_for(reg: &PerfDataRegistry, path: &str, want: u64) -> bool {
    for _ in 0..200 {
        if reg.get(path) == Some(want) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn sampler_publishes_allocator_growth() {
    let acc = Arc::new(MetaspaceAccounting::new(64));
    acc.set_reserved(MetadataType::NonClass, 1 << 20);
    let reg = Arc::new(PerfDataRegistry::new("", 16));
    let ctx = Arc::new(PerfCountersContext::new(ON, Arc::clone(&acc) as _, Arc::clone(&reg) as _));
    ctx.initialize_performance_counters().unwrap();
    assert_eq!(reg.get("metaspace.capacity"), Some(0));

    let (tx, rx) = watch::channel(false);
    let handle = sampler::spawn_sampler(Arc::clone(&ctx), Duration::from_millis(10), rx);

    acc.commit(MetadataType::NonClass, 4096);
    assert!(acc.add_chunk(MetadataType::NonClass, 1024));
    assert!(acc.allocate(MetadataType::NonClass, 700));

    assert!(wait_for(&reg, "metaspace.used", 700).await);
    assert_eq!(reg.get("metaspace.capacity"), Some(4096));
    assert_eq!(reg.get("metaspace.maxCapacity"), Some(1 << 20));

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("sampler should stop on shutdown")
        .unwrap();
}

#[tokio::test]
async fn sampler_stops_when_counters_were_never_initialized() {
    let acc = Arc::new(MetaspaceAccounting::new(64));
    let reg = Arc::new(PerfDataRegistry::new("", 16));
    let ctx = Arc::new(PerfCountersContext::new(ON, acc as _, reg as _));

    let (_tx, rx) = watch::channel(false);
    let handle = sampler::spawn_sampler(ctx, Duration::from_millis(10), rx);

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("sampler should exit on call-order error")
        .unwrap();
}

#[tokio::test]
async fn dropped_shutdown_sender_stops_sampler() {
    let acc = Arc::new(MetaspaceAccounting::new(64));
    let reg = Arc::new(PerfDataRegistry::new("", 16));
    let ctx = Arc::new(PerfCountersContext::new(ON, acc as _, reg as _));
    ctx.initialize_performance_counters().unwrap();

    let (tx, rx) = watch::channel(false);
    let handle = sampler::spawn_sampler(ctx, Duration::from_millis(10), rx);
    drop(tx);

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("sampler should exit when the sender is gone")
        .unwrap();
}

#[tokio::test]
async fn sampler_keeps_refreshing_the_component_that_initialized() {
    let acc = Arc::new(MetaspaceAccounting::new(64));
    acc.set_reserved(MetadataType::Class, 1 << 16);
    acc.commit(MetadataType::Class, 4096);
    let reg = Arc::new(PerfDataRegistry::new("", 16));
    reg.create_variable("metaspace", "used", PerfUnit::Bytes, 0).unwrap();
    let ctx = Arc::new(PerfCountersContext::new(ON, Arc::clone(&acc) as _, Arc::clone(&reg) as _));
    assert!(ctx.initialize_performance_counters().is_err());
    assert!(ctx.class_space().is_some());

    let (tx, rx) = watch::channel(false);
    let handle = sampler::spawn_sampler(Arc::clone(&ctx), Duration::from_millis(10), rx);

    assert!(acc.add_chunk(MetadataType::Class, 512));
    assert!(acc.allocate(MetadataType::Class, 300));
    assert!(wait_for(&reg, "compressedclassspace.used", 300).await);
    assert!(!handle.is_finished());

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("sampler should stop on shutdown")
        .unwrap();
}

#[tokio::test]
async fn zero_period_is_clamped_instead_of_panicking() {
    let acc = Arc::new(MetaspaceAccounting::new(64));
    acc.set_reserved(MetadataType::NonClass, 1 << 16);
    let reg = Arc::new(PerfDataRegistry::new("", 16));
    let ctx = Arc::new(PerfCountersContext::new(ON, Arc::clone(&acc) as _, Arc::clone(&reg) as _));
    ctx.initialize_performance_counters().unwrap();

    let (tx, rx) = watch::channel(false);
    let handle = sampler::spawn_sampler(ctx, Duration::ZERO, rx);

    acc.commit(MetadataType::NonClass, 2048);
    assert!(wait_for(&reg, "metaspace.capacity", 2048).await);

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("sampler should stop on shutdown")
        .unwrap();
}
