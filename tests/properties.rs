//! Property tests over randomly generated workloads.

mod common;

use std::collections::BTreeSet;

use algosim::*;
use proptest::prelude::*;

fn arb_processes() -> impl Strategy<Value = Vec<ProcessSpec>> {
    prop::collection::vec((0i64..20, 1i64..10, 0i32..4), 0..8).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (arrival, burst, priority))| {
                ProcessSpec::new(i as u32 + 1, arrival, burst).priority(priority)
            })
            .collect()
    })
}

/// Processes with strictly increasing arrivals.
fn arb_distinct_arrivals() -> impl Strategy<Value = Vec<ProcessSpec>> {
    prop::collection::vec((1i64..5, 1i64..10), 1..8).prop_map(|rows| {
        let mut arrival = 0;
        rows.into_iter()
            .enumerate()
            .map(|(i, (gap, burst))| {
                arrival += gap;
                ProcessSpec::new(i as u32 + 1, arrival, burst)
            })
            .collect()
    })
}

fn arb_references() -> impl Strategy<Value = Vec<PageId>> {
    prop::collection::vec((0u32..8).prop_map(PageId), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every algorithm runs each process for exactly its burst and
    /// completes it exactly once.
    #[test]
    fn prop_no_lost_work(specs in arb_processes(), quantum in 1u64..5) {
        common::setup_test();
        let config = SchedConfig::builder().quantum(quantum).build();
        let total: u64 = specs.iter().map(|s| s.burst as u64).sum();

        for alg in CpuAlgorithm::ALL {
            if alg == CpuAlgorithm::Edf {
                continue;
            }
            let run = schedule(alg, &specs, &config).unwrap();
            prop_assert_eq!(run.timeline.busy_time(), total);
            prop_assert_eq!(run.completions.len(), specs.len());
            for s in &specs {
                let pid = Pid(s.pid);
                prop_assert_eq!(run.timeline.runtime_of(pid), s.burst as u64);
                let r = run.record(pid).unwrap();
                prop_assert!(r.first_run >= r.arrival);
                prop_assert!(r.completion >= r.first_run + 1);
                prop_assert_eq!(run.trace.completion_time(pid), Some(r.completion));
            }
            let intervals = run.timeline.intervals();
            for pair in intervals.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }

    #[test]
    fn prop_fcfs_ignores_input_order(specs in arb_distinct_arrivals()) {
        common::setup_test();
        let mut reversed = specs.clone();
        reversed.reverse();
        let config = SchedConfig::default();

        let a = schedule(CpuAlgorithm::Fcfs, &specs, &config).unwrap();
        let b = schedule(CpuAlgorithm::Fcfs, &reversed, &config).unwrap();
        prop_assert_eq!(a.completion_order(), b.completion_order());
        prop_assert_eq!(&a.timeline, &b.timeline);
    }

    /// A quantum no process can exhaust turns RR into FCFS.
    #[test]
    fn prop_rr_with_large_quantum_is_fcfs(specs in arb_processes()) {
        common::setup_test();
        let fcfs = schedule(CpuAlgorithm::Fcfs, &specs, &SchedConfig::default()).unwrap();
        let rr = schedule(CpuAlgorithm::RoundRobin, &specs, &common::rr(10)).unwrap();
        prop_assert_eq!(&fcfs.timeline, &rr.timeline);
        prop_assert_eq!(rr.trace.summary().quantum_expiries, 0);
    }

    #[test]
    fn prop_srtf_minimizes_average_waiting(specs in arb_processes()) {
        common::setup_test();
        let config = SchedConfig::builder().quantum(2).build();
        let avg = |alg| {
            schedule(alg, &specs, &config)
                .unwrap()
                .metrics
                .get(Metric::AverageWaitingTime)
                .unwrap()
        };
        let srtf = avg(CpuAlgorithm::Sjf { preemptive: true });
        for alg in [CpuAlgorithm::Fcfs, CpuAlgorithm::RoundRobin, CpuAlgorithm::Mlfq] {
            prop_assert!(srtf <= avg(alg) + 1e-9);
        }
    }

    #[test]
    fn prop_paging_accounting(refs in arb_references(), capacity in 1usize..6) {
        common::setup_test();
        let distinct = refs.iter().collect::<BTreeSet<_>>().len();

        for alg in PageAlgorithm::ALL {
            let run = replace(alg, &refs, capacity).unwrap();
            prop_assert_eq!(run.hits + run.faults, refs.len());
            prop_assert_eq!(run.states.len(), refs.len());
            prop_assert!(run.faults >= distinct);
            prop_assert_eq!(run.evictions().len(), run.faults.saturating_sub(capacity));
            if distinct <= capacity {
                prop_assert_eq!(run.faults, distinct);
            }
            for (step, state) in run.states.iter().enumerate() {
                prop_assert_eq!(state.frames.len(), capacity);
                prop_assert!(state.resident().any(|p| p == refs[step]));
                let resident: Vec<PageId> = state.resident().collect();
                let unique: BTreeSet<PageId> = resident.iter().copied().collect();
                prop_assert_eq!(unique.len(), resident.len());
                if state.evicted.is_some() {
                    prop_assert!(!state.hit);
                }
            }
        }
    }

    #[test]
    fn prop_lru_matches_optimal_on_distinct_pages(
        raw in prop::collection::btree_set(0u32..50, 0..20),
        capacity in 1usize..6,
    ) {
        common::setup_test();
        let refs: Vec<PageId> = raw.into_iter().rev().map(PageId).collect();
        let lru = replace(PageAlgorithm::Lru, &refs, capacity).unwrap();
        let opt = replace(PageAlgorithm::Optimal, &refs, capacity).unwrap();
        prop_assert_eq!(lru.faults, opt.faults);
        prop_assert_eq!(lru.faults, refs.len());
    }

    #[test]
    fn prop_optimal_is_a_lower_bound(refs in arb_references(), capacity in 1usize..6) {
        common::setup_test();
        let opt = replace(PageAlgorithm::Optimal, &refs, capacity).unwrap().faults;
        for alg in PageAlgorithm::ALL {
            prop_assert!(opt <= replace(alg, &refs, capacity).unwrap().faults);
        }
    }

    #[test]
    fn prop_duel_is_deterministic(specs in arb_processes()) {
        common::setup_test();
        let w = DuelWorkload::Cpu { processes: specs, config: common::rr(2) };
        let names = ["fcfs", "sjf", "srtf", "rr", "priority", "mlfq"];
        let a = duel(&names, &w, Category::Cpu, None).unwrap();
        let b = duel(&names, &w, Category::Cpu, None).unwrap();

        prop_assert_eq!(a.ranking(), b.ranking());
        let ranks: Vec<usize> = a.entries.iter().map(|e| e.rank).collect();
        prop_assert_eq!(ranks, (1..=names.len()).collect::<Vec<_>>());
        for pair in a.entries.windows(2) {
            prop_assert!(pair[0].value <= pair[1].value);
        }
    }
}
