//! Benchmarks for the region kernel.
//!
//! Run with: `cargo bench --bench kernel_benchmarks`
//!
//! These benchmarks test:
//! - Interval set insertion, ordered and shuffled
//! - Compact list parsing and expansion
//! - Region parsing, evaluation and simplification

use divan::{Bencher, black_box};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use region_algebra::{CompactList, IntervalSet, Plane, RegionRule, SurfaceMap};

fn main() {
    divan::main();
}

// ============================================================================
// Test Data Generators
// ============================================================================

/// Values `0..count` in a seeded random order
fn shuffled_values(count: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values: Vec<i64> = (0..count as i64).collect();
    for i in (1..values.len()).rev() {
        let j = rng.random_range(0..=i);
        values.swap(i, j);
    }
    values
}

/// Random values scattered over a wide range, leaving gaps
fn sparse_values(count: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| rng.random_range(0..count as i64 * 4))
        .collect()
}

/// Parallel planes `x = k` for `k` in `0..count`, numbered from 1
fn slab_surfaces(count: u32) -> SurfaceMap {
    let mut map = SurfaceMap::default();
    for k in 0..count {
        map.insert(k + 1, Plane::new(DVec3::X, f64::from(k)).into());
    }
    map
}

/// A random intersection of `count` signed leaves over `surfaces` planes
fn random_rule(count: usize, surfaces: u32, seed: u64) -> RegionRule {
    let mut rng = StdRng::seed_from_u64(seed);
    let leaves = (0..count).filter_map(|_| {
        let number = rng.random_range(1..=surfaces).cast_signed();
        let raw = if rng.random_bool(0.5) { number } else { -number };
        RegionRule::from_leaf(raw).ok()
    });
    RegionRule::all_of(leaves)
}

// ============================================================================
// Interval Set Benchmarks
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn interval_insert_ordered(bencher: Bencher, n: usize) {
    bencher.bench_local(|| {
        let mut set = IntervalSet::new();
        for v in 0..n as i64 {
            set.insert(v);
        }
        black_box(set.interval_count())
    });
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn interval_insert_shuffled(bencher: Bencher, n: usize) {
    let values = shuffled_values(n, 0xdead_beef);

    bencher.bench_local(|| {
        let set: IntervalSet = values.iter().copied().collect();
        black_box(set.interval_count())
    });
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn interval_contains_sparse(bencher: Bencher, n: usize) {
    let set: IntervalSet = sparse_values(n, 42).into_iter().collect();
    let probes = sparse_values(n, 7);

    bencher.bench_local(|| probes.iter().filter(|&&v| set.contains(v)).count());
}

// ============================================================================
// Compact List Benchmarks
// ============================================================================

#[divan::bench]
fn compact_parse(bencher: Bencher) {
    let text = "1 3R 2 8I 11 (4 2R) J 1e-3 5LOG 1e3 M 2J 7";

    bencher.bench_local(|| CompactList::parse(black_box(text)).map(|l| l.count()));
}

#[divan::bench(args = [10, 100, 1_000])]
fn compact_expand(bencher: Bencher, n: usize) {
    let list = CompactList::parse(&format!("0 {n}I 1 {n}R 1e-2 {n}LOG 1e2")).unwrap();

    bencher.bench_local(|| black_box(list.actual_values().len()));
}

// ============================================================================
// Region Benchmarks
// ============================================================================

#[divan::bench]
fn region_parse(bencher: Bencher) {
    let text = "1 -2 (3 : -4 : (5 6)) #(7 : -8) (9 : #(10 -11 12))";

    bencher.bench_local(|| RegionRule::parse_numeric(black_box(text)).map(|r| r.leaf_count()));
}

#[divan::bench(args = [8, 32, 128])]
fn region_evaluate(bencher: Bencher, n: usize) {
    let surfaces = slab_surfaces(16);
    let rule = random_rule(n, 16, 0xdead_beef) | random_rule(n, 16, 0xcafe);
    let point = DVec3::new(7.5, 0.0, 0.0);

    bencher.bench_local(|| rule.evaluate(black_box(point), &surfaces));
}

#[divan::bench(args = [8, 32, 128])]
fn region_simplify(bencher: Bencher, n: usize) {
    let surfaces = slab_surfaces(64);
    let rule = random_rule(n, 64, 0xdead_beef).complement() & random_rule(n, 64, 0xcafe);

    bencher.bench_local(|| rule.simplify(&surfaces).map(|r| r.leaf_count()));
}
