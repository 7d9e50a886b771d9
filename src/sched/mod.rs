//! CPU scheduling engine.
//!
//! [`schedule`] validates configuration and input, then hands the workload
//! to one of four drivers:
//!
//! - `nonpreemptive`: FCFS, SJF, Priority
//! - `preemptive`: SRTF, preemptive Priority, EDF
//! - `round_robin`: RR
//! - `mlfq`: multi-level feedback queue
//!
//! Each driver runs on a [`RunState`] that owns all per-run mutable data
//! in arrays indexed by the process' position in the arrival-sorted
//! workload. The processes themselves are never mutated.

mod mlfq;
mod nonpreemptive;
mod preemptive;
mod round_robin;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::algorithm::CpuAlgorithm;
use crate::config::SchedConfig;
use crate::error::SimError;
use crate::metrics::{self, MetricsReport};
use crate::process::{Process, ProcessSpec, Workload};
use crate::timeline::Timeline;
use crate::trace::{Trace, TraceKind};
use crate::types::{Pid, Time};

/// Final accounting for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRecord {
    pub pid: Pid,
    pub arrival: Time,
    pub burst: Time,
    pub priority: i32,
    pub deadline: Option<Time>,
    /// Time the process first received the CPU.
    pub first_run: Time,
    pub completion: Time,
    /// `None` when the process has no deadline.
    pub deadline_missed: Option<bool>,
}

impl CompletionRecord {
    pub fn turnaround(&self) -> Time {
        self.completion - self.arrival
    }

    pub fn waiting(&self) -> Time {
        self.turnaround() - self.burst
    }

    pub fn response(&self) -> Time {
        self.first_run - self.arrival
    }
}

/// Everything produced by one scheduling run.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRun {
    pub algorithm: CpuAlgorithm,
    pub timeline: Timeline,
    /// Ordered by completion time, ties by input order.
    pub completions: Vec<CompletionRecord>,
    pub trace: Trace,
    pub metrics: MetricsReport,
}

impl ScheduleRun {
    pub fn record(&self, pid: Pid) -> Option<&CompletionRecord> {
        self.completions.iter().find(|r| r.pid == pid)
    }

    /// Pids in the order they finished.
    pub fn completion_order(&self) -> Vec<Pid> {
        self.completions.iter().map(|r| r.pid).collect()
    }
}

/// Run a CPU scheduling algorithm over `processes`.
///
/// Configuration is checked before the input, so a Round Robin request
/// without a quantum reports `MissingQuantum` even if the processes are
/// also invalid. `config.preemptive` selects SRTF and preemptive Priority.
pub fn schedule(
    algorithm: CpuAlgorithm,
    processes: &[ProcessSpec],
    config: &SchedConfig,
) -> Result<ScheduleRun, SimError> {
    let algorithm = algorithm.with_config(config);

    let quantum = match algorithm {
        CpuAlgorithm::RoundRobin => config.rr_quantum()?,
        _ => 0,
    };
    let (quanta, boost) = match algorithm {
        CpuAlgorithm::Mlfq => (config.mlfq_quanta()?, config.mlfq_boost()?),
        _ => (Vec::new(), None),
    };

    let workload = Workload::new(processes)?;
    if algorithm == CpuAlgorithm::Edf {
        workload.require_deadlines()?;
    }

    let mut st = RunState::new(workload.processes());
    match algorithm {
        CpuAlgorithm::Fcfs => nonpreemptive::run(&mut st, |_| ()),
        CpuAlgorithm::Sjf { preemptive: false } => nonpreemptive::run(&mut st, |p| p.burst),
        CpuAlgorithm::Sjf { preemptive: true } => preemptive::run(&mut st, |_, remaining| remaining),
        CpuAlgorithm::Priority { preemptive: false } => {
            nonpreemptive::run(&mut st, |p| p.priority)
        }
        CpuAlgorithm::Priority { preemptive: true } => preemptive::run(&mut st, |p, _| p.priority),
        CpuAlgorithm::RoundRobin => round_robin::run(&mut st, quantum),
        CpuAlgorithm::Mlfq => mlfq::run(&mut st, &quanta, boost),
        CpuAlgorithm::Edf => {
            preemptive::run(&mut st, |p, _| p.deadline.unwrap_or(Time::MAX))
        }
    }

    Ok(st.finish(algorithm))
}

/// Parse `name` and run it. See [`schedule`].
pub fn schedule_named(
    name: &str,
    processes: &[ProcessSpec],
    config: &SchedConfig,
) -> Result<ScheduleRun, SimError> {
    schedule(CpuAlgorithm::resolve(name)?, processes, config)
}

/// Mutable state of one scheduling run.
pub(crate) struct RunState<'a> {
    procs: &'a [Process],
    remaining: Vec<Time>,
    first_run: Vec<Option<Time>>,
    completion: Vec<Option<Time>>,
    /// Index of the first process that has not yet been admitted.
    next: usize,
    running: Option<usize>,
    timeline: Timeline,
    trace: Trace,
}

impl<'a> RunState<'a> {
    fn new(procs: &'a [Process]) -> Self {
        Self {
            procs,
            remaining: procs.iter().map(|p| p.burst).collect(),
            first_run: vec![None; procs.len()],
            completion: vec![None; procs.len()],
            next: 0,
            running: None,
            timeline: Timeline::new(),
            trace: Trace::new(),
        }
    }

    pub(crate) fn procs(&self) -> &'a [Process] {
        self.procs
    }

    pub(crate) fn remaining(&self, i: usize) -> Time {
        self.remaining[i]
    }

    /// Admit every process arriving at or before `now`, in arrival order.
    pub(crate) fn admit(&mut self, now: Time) -> Vec<usize> {
        let start = self.next;
        while self.next < self.procs.len() && self.procs[self.next].arrival <= now {
            let p = &self.procs[self.next];
            self.trace.record(p.arrival, TraceKind::Arrived { pid: p.pid });
            self.next += 1;
        }
        (start..self.next).collect()
    }

    /// Arrival time of the next process not yet admitted.
    pub(crate) fn next_arrival(&self) -> Option<Time> {
        self.procs.get(self.next).map(|p| p.arrival)
    }

    /// Idle the CPU from `now` until the next arrival.
    ///
    /// Returns the new time, or `None` once every process has arrived.
    pub(crate) fn idle_until_arrival(&mut self, now: Time) -> Option<Time> {
        let t = self.next_arrival()?;
        if t > now {
            debug!(t = now, until = t, "cpu idle");
            self.trace.record(now, TraceKind::CpuIdle);
            self.timeline.idle(now, t);
        }
        self.running = None;
        Some(t.max(now))
    }

    /// Give the CPU to process `i`.
    pub(crate) fn dispatch(&mut self, i: usize, now: Time) {
        if self.running == Some(i) {
            return;
        }
        let pid = self.procs[i].pid;
        debug!(t = now, %pid, remaining = self.remaining[i], "dispatch");
        self.trace.record(now, TraceKind::Dispatched { pid });
        self.first_run[i].get_or_insert(now);
        self.running = Some(i);
    }

    /// Run process `i` over `[start, end)`.
    pub(crate) fn run(&mut self, i: usize, start: Time, end: Time) {
        debug_assert!(end - start <= self.remaining[i]);
        self.remaining[i] -= end - start;
        self.timeline.run(self.procs[i].pid, start, end);
    }

    pub(crate) fn preempt(&mut self, i: usize, by: usize, now: Time) {
        let (pid, by) = (self.procs[i].pid, self.procs[by].pid);
        debug!(t = now, %pid, %by, "preempt");
        self.trace.record(now, TraceKind::Preempted { pid, by });
        self.running = None;
    }

    pub(crate) fn expire(&mut self, i: usize, now: Time) {
        let pid = self.procs[i].pid;
        debug!(t = now, %pid, remaining = self.remaining[i], "quantum expired");
        self.trace.record(now, TraceKind::QuantumExpired { pid });
        self.running = None;
    }

    pub(crate) fn demote(&mut self, i: usize, level: usize, now: Time) {
        let pid = self.procs[i].pid;
        debug!(t = now, %pid, level, "demote");
        self.trace.record(now, TraceKind::Demoted { pid, level });
    }

    pub(crate) fn boost(&mut self, moved: usize, now: Time) {
        debug!(t = now, moved, "priority boost");
        self.trace.record(now, TraceKind::Boosted { moved });
    }

    pub(crate) fn complete(&mut self, i: usize, now: Time) {
        let p = &self.procs[i];
        debug!(t = now, pid = %p.pid, "complete");
        self.trace.record(now, TraceKind::Completed { pid: p.pid });
        if let Some(deadline) = p.deadline {
            if now > deadline {
                warn!(t = now, pid = %p.pid, deadline, "deadline missed");
                self.trace.record(
                    now,
                    TraceKind::DeadlineMissed {
                        pid: p.pid,
                        deadline,
                    },
                );
            }
        }
        self.completion[i] = Some(now);
        self.running = None;
    }

    fn finish(self, algorithm: CpuAlgorithm) -> ScheduleRun {
        let mut completions: Vec<(usize, CompletionRecord)> = self
            .procs
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let completion = self.completion[i]?;
                let first_run = self.first_run[i]?;
                Some((
                    p.input_index,
                    CompletionRecord {
                        pid: p.pid,
                        arrival: p.arrival,
                        burst: p.burst,
                        priority: p.priority,
                        deadline: p.deadline,
                        first_run,
                        completion,
                        deadline_missed: p.deadline.map(|d| completion > d),
                    },
                ))
            })
            .collect();
        debug_assert_eq!(completions.len(), self.procs.len());
        completions.sort_by_key(|(input_index, r)| (r.completion, *input_index));
        let completions: Vec<CompletionRecord> =
            completions.into_iter().map(|(_, r)| r).collect();

        let metrics = metrics::cpu_report(&completions, &self.timeline);
        info!(
            t = self.timeline.end(),
            algorithm = algorithm.label(),
            processes = completions.len(),
            "schedule complete"
        );

        ScheduleRun {
            algorithm,
            timeline: self.timeline,
            completions,
            trace: self.trace,
            metrics,
        }
    }
}
