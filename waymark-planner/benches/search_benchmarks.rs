//! Criterion benchmarks for the exhaustive planner.
//!
//! Every candidate has its own type so none are de-duplicated away, and the
//! visitor states no preferences so none are filtered out. The search then
//! walks all `n(n-1) + n(n-1)(n-2)` arrangements.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package waymark-planner
//! ```

#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use waymark_core::test_support::{context, place, request, sample_tables};
use waymark_core::{PlanRequest, Planner};
use waymark_planner::{ExhaustivePlanner, permutation_count};

/// Candidate counts to benchmark.
const PROBLEM_SIZES: &[usize] = &[4, 8, 12, 16];

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "spreads places over a few hundred metres"
)]
fn build_request(size: usize) -> PlanRequest {
    let places = (0..size)
        .map(|n| place(&format!("p{n:02}"), &format!("kind-{n}"), 0.05 * n as f64, ""))
        .collect();
    request(context(600, 600, &[]), places, sample_tables())
}

fn bench_plan_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_time");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(5));

    let planner = ExhaustivePlanner::new();
    for &size in PROBLEM_SIZES {
        let plan_request = build_request(size);
        let arrangements = permutation_count(size, 2) + permutation_count(size, 3);
        group.throughput(Throughput::Elements(
            u64::try_from(arrangements).unwrap_or(u64::MAX),
        ));
        group.bench_with_input(BenchmarkId::new("candidates", size), &size, |b, _| {
            b.iter(|| black_box(planner.plan(black_box(&plan_request))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan_times);
criterion_main!(benches);
