//! Composition overhead benchmarks
//!
//! Compares a bare region against the same region behind each wrapper, and
//! a fallback chain against the system allocator.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nebula_alloc::prelude::*;
use std::alloc::Layout;
use std::hint::black_box;

/// Benchmark single allocation/deallocation cycle
fn bench_single_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_allocation");

    group.bench_function("stack_64b", |b| {
        let mut allocator =
            StackAllocator::with_config(1024 * 1024, StackConfig::production()).unwrap();

        b.iter(|| {
            let a = allocator.allocate(black_box(64));
            allocator.deallocate(a);
            black_box(a);
        });
    });

    group.bench_function("limited_64b", |b| {
        let mut allocator = StackAllocator::with_config(1024 * 1024, StackConfig::production())
            .unwrap()
            .limited::<1, 128>();

        b.iter(|| {
            let a = allocator.allocate(black_box(64));
            allocator.deallocate(a);
            black_box(a);
        });
    });

    group.bench_function("managed_noop_64b", |b| {
        let mut allocator = StackAllocator::with_config(1024 * 1024, StackConfig::production())
            .unwrap()
            .unmanaged();

        b.iter(|| {
            let a = allocator.allocate(black_box(64));
            allocator.deallocate(a);
            black_box(a);
        });
    });

    group.bench_function("managed_stats_64b", |b| {
        let mut allocator = StackAllocator::with_config(1024 * 1024, StackConfig::production())
            .unwrap()
            .managed(StatsObserver::new());

        b.iter(|| {
            let a = allocator.allocate(black_box(64));
            allocator.deallocate(a);
            black_box(a);
        });
    });

    // System allocator (baseline)
    group.bench_function("system_64b", |b| {
        let layout = Layout::from_size_align(64, 8).unwrap();

        b.iter(|| unsafe {
            let ptr = std::alloc::alloc(layout);
            std::alloc::dealloc(ptr, layout);
            black_box(ptr);
        });
    });

    group.finish();
}

/// Benchmark a fill-then-reset cycle through a fallback chain
fn bench_fallback_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fallback_chain");

    for depth in [1usize, 2, 3] {
        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::new("100x64b", depth), &depth, |b, &depth| {
            // Each stage fits a third of the batch, so deeper chains spill further
            let stage = || StackAllocator::with_config(64 * 34, StackConfig::production()).unwrap();
            let big = || StackAllocator::with_config(64 * 100, StackConfig::production()).unwrap();

            match depth {
                1 => {
                    let mut allocator = big();
                    b.iter(|| fill_and_reset(&mut allocator));
                }
                2 => {
                    let mut allocator = stage().fallback(big());
                    b.iter(|| fill_and_reset(&mut allocator));
                }
                _ => {
                    let mut allocator = nebula_alloc::try_chain![stage(), stage(), big()];
                    b.iter(|| fill_and_reset(&mut allocator));
                }
            }
        });
    }

    group.finish();
}

fn fill_and_reset<A: Allocator + DeallocateAll>(allocator: &mut A) {
    for _ in 0..100 {
        black_box(allocator.allocate(64));
    }
    allocator.deallocate_all();
}

/// Benchmark in-place growth against move-based reallocation
fn bench_reallocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("reallocate");

    group.bench_function("grow_in_place", |b| {
        let mut allocator = StackAllocator::with_config(64 * 1024, StackConfig::production()).unwrap();

        b.iter(|| {
            let mut a = allocator.allocate(16);
            unsafe { allocator.reallocate(&mut a, black_box(4096)).unwrap() };
            allocator.deallocate_all();
        });
    });

    group.bench_function("grow_by_copy", |b| {
        let mut allocator = StackAllocator::with_config(64 * 1024, StackConfig::production()).unwrap();

        b.iter(|| {
            let mut a = allocator.allocate(16);
            let _pin = allocator.allocate(1);
            unsafe { allocator.reallocate(&mut a, black_box(4096)).unwrap() };
            allocator.deallocate_all();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_allocation,
    bench_fallback_chain,
    bench_reallocate
);
criterion_main!(benches);
