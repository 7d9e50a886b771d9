//! Workload builders for well-known textbook cases.
//!
//! Everything here is deterministic. The process sets are small enough to
//! check by hand and each one exercises a specific scheduling effect; the
//! reference strings do the same for page replacement.

use crate::process::ProcessSpec;
use crate::types::{pages, PageId};

/// Three processes where SJF clearly beats FCFS.
///
/// SJF runs P1 0-5, P3 5-6, P2 6-9.
pub fn sjf_example() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(1, 0, 5),
        ProcessSpec::new(2, 1, 3),
        ProcessSpec::new(3, 2, 1),
    ]
}

/// One long job followed by `shorts` one-tick jobs arriving just after it.
///
/// FCFS makes every short job wait behind the long one (the convoy
/// effect); SJF and RR do not.
pub fn convoy(long_burst: i64, shorts: u32) -> Vec<ProcessSpec> {
    let mut out = vec![ProcessSpec::new(1, 0, long_burst)];
    out.extend((0..shorts).map(|i| ProcessSpec::new(i + 2, 1, 1)));
    out
}

/// `n` equal jobs arriving `gap` ticks apart.
pub fn staggered(n: u32, burst: i64, gap: i64) -> Vec<ProcessSpec> {
    (0..n)
        .map(|i| ProcessSpec::new(i + 1, i as i64 * gap, burst))
        .collect()
}

/// Mixed priorities where a late urgent arrival exposes preemption.
pub fn priority_mix() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(1, 0, 10).priority(3),
        ProcessSpec::new(2, 1, 1).priority(1),
        ProcessSpec::new(3, 2, 2).priority(4),
        ProcessSpec::new(4, 3, 1).priority(5),
        ProcessSpec::new(5, 4, 5).priority(2),
    ]
}

/// Real-time set with absolute deadlines; EDF misses two of them.
pub fn real_time() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(1, 0, 3).deadline(7),
        ProcessSpec::new(2, 1, 4).deadline(6),
        ProcessSpec::new(3, 2, 2).deadline(9),
        ProcessSpec::new(4, 3, 1).deadline(5),
    ]
}

/// Reference string showing Belady's anomaly under FIFO: 9 faults with
/// three frames, 10 with four.
pub fn belady() -> Vec<PageId> {
    pages(&[1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5])
}

/// The classic 20-reference string: FIFO 15, LRU 12, Optimal 9 faults
/// with three frames.
pub fn textbook_references() -> Vec<PageId> {
    pages(&[7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1])
}

/// Cycle over pages `0..working_set` for `loops` rounds.
///
/// With fewer frames than `working_set`, FIFO and LRU fault on every
/// reference.
pub fn looping(working_set: u32, loops: usize) -> Vec<PageId> {
    (0..loops)
        .flat_map(|_| (0..working_set).map(PageId))
        .collect()
}

/// Phases of strong locality: each phase cycles `repeat` times over its
/// own `width` pages, then moves to the next disjoint set.
pub fn locality(phases: u32, width: u32, repeat: usize) -> Vec<PageId> {
    (0..phases)
        .flat_map(|p| {
            let base = p * width;
            (0..repeat).flat_map(move |_| (base..base + width).map(PageId))
        })
        .collect()
}
