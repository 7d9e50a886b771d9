//! Scheduler decision log.
//!
//! Every decision the CPU engine makes (arrival, dispatch, preemption,
//! quantum expiry, demotion, boost, completion) is recorded as a
//! `TraceEvent` with its simulated timestamp.

use serde::Serialize;

use crate::fmt::FmtTs;
use crate::types::{Pid, Time};

/// A single decision made by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// Simulated time at which the decision was taken.
    pub time: Time,
    pub kind: TraceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceKind {
    /// A process became ready.
    Arrived { pid: Pid },
    /// A process was given the CPU.
    Dispatched { pid: Pid },
    /// A running process was displaced by a more urgent arrival.
    Preempted { pid: Pid, by: Pid },
    /// A process used up its time quantum.
    QuantumExpired { pid: Pid },
    /// MLFQ moved a process to a lower-priority level.
    Demoted { pid: Pid, level: usize },
    /// MLFQ moved every waiting process back to the top level.
    Boosted { moved: usize },
    /// A process finished its burst.
    Completed { pid: Pid },
    /// A process finished after its deadline.
    DeadlineMissed { pid: Pid, deadline: Time },
    /// Nothing was ready to run.
    CpuIdle,
}

/// Aggregate counts over a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    pub total_events: usize,
    pub dispatches: usize,
    pub preemptions: usize,
    pub quantum_expiries: usize,
    pub demotions: usize,
    pub boosts: usize,
    pub deadline_misses: usize,
    pub idle_periods: usize,
}

impl std::fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Trace Summary:")?;
        writeln!(f, "  total_events:      {}", self.total_events)?;
        writeln!(f, "  dispatches:        {}", self.dispatches)?;
        writeln!(f, "  preemptions:       {}", self.preemptions)?;
        writeln!(f, "  quantum_expiries:  {}", self.quantum_expiries)?;
        writeln!(f, "  demotions:         {}", self.demotions)?;
        writeln!(f, "  boosts:            {}", self.boosts)?;
        writeln!(f, "  deadline_misses:   {}", self.deadline_misses)?;
        write!(f, "  idle_periods:      {}", self.idle_periods)
    }
}

/// Chronological list of scheduler decisions for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn record(&mut self, time: Time, kind: TraceKind) {
        self.events.push(TraceEvent { time, kind });
    }

    /// Get all events in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Count the number of times a process was dispatched.
    pub fn dispatch_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p } if p == pid))
            .count()
    }

    /// Count the number of times a process was preempted.
    pub fn preemption_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Preempted { pid: p, .. } if p == pid))
            .count()
    }

    /// Time at which a process completed, if it did.
    pub fn completion_time(&self, pid: Pid) -> Option<Time> {
        self.events.iter().find_map(|e| match e.kind {
            TraceKind::Completed { pid: p } if p == pid => Some(e.time),
            _ => None,
        })
    }

    pub fn summary(&self) -> TraceSummary {
        let mut s = TraceSummary {
            total_events: self.events.len(),
            ..Default::default()
        };
        for event in &self.events {
            match event.kind {
                TraceKind::Dispatched { .. } => s.dispatches += 1,
                TraceKind::Preempted { .. } => s.preemptions += 1,
                TraceKind::QuantumExpired { .. } => s.quantum_expiries += 1,
                TraceKind::Demoted { .. } => s.demotions += 1,
                TraceKind::Boosted { .. } => s.boosts += 1,
                TraceKind::DeadlineMissed { .. } => s.deadline_misses += 1,
                TraceKind::CpuIdle => s.idle_periods += 1,
                TraceKind::Arrived { .. } | TraceKind::Completed { .. } => {}
            }
        }
        s
    }

    /// Pretty-print the trace for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match &event.kind {
                TraceKind::Arrived { pid } => format!("ARRIVE   {pid}"),
                TraceKind::Dispatched { pid } => format!("DISPATCH {pid}"),
                TraceKind::Preempted { pid, by } => format!("PREEMPT  {pid} by={by}"),
                TraceKind::QuantumExpired { pid } => format!("EXPIRE   {pid}"),
                TraceKind::Demoted { pid, level } => format!("DEMOTE   {pid} level={level}"),
                TraceKind::Boosted { moved } => format!("BOOST    moved={moved}"),
                TraceKind::Completed { pid } => format!("COMPLETE {pid}"),
                TraceKind::DeadlineMissed { pid, deadline } => {
                    format!("MISS     {pid} deadline={deadline}")
                }
                TraceKind::CpuIdle => "IDLE".to_string(),
            };
            eprintln!("[{}] {}", FmtTs(event.time), desc);
        }
    }
}
