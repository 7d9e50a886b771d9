//! Process model: raw input records, validated processes and workloads.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::ValidationError;
use crate::types::{PageId, Pid, Time};

/// A process exactly as supplied by the caller, before validation.
///
/// Times are signed so that out-of-range input can be reported instead of
/// silently wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub pid: u32,
    pub arrival: i64,
    pub burst: i64,
    /// Lower value is more urgent.
    pub priority: i32,
    /// Absolute completion deadline.
    pub deadline: Option<i64>,
    /// Pages touched by this process, used by hybrid workloads.
    pub memory_pages: Vec<PageId>,
}

impl ProcessSpec {
    pub fn new(pid: u32, arrival: i64, burst: i64) -> Self {
        Self {
            pid,
            arrival,
            burst,
            priority: 0,
            deadline: None,
            memory_pages: Vec::new(),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn pages(mut self, pages: Vec<PageId>) -> Self {
        self.memory_pages = pages;
        self
    }
}

/// A validated, immutable process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    pub pid: Pid,
    pub arrival: Time,
    pub burst: Time,
    pub priority: i32,
    pub deadline: Option<Time>,
    /// Position in the caller's original list; the final tie-breaker.
    pub input_index: usize,
}

impl Process {
    fn validate(spec: &ProcessSpec, input_index: usize) -> Result<Self, ValidationError> {
        if spec.arrival < 0 {
            return Err(ValidationError::NegativeArrival {
                pid: spec.pid,
                arrival: spec.arrival,
            });
        }
        if spec.burst <= 0 {
            return Err(ValidationError::NonPositiveBurst {
                pid: spec.pid,
                burst: spec.burst,
            });
        }
        if let Some(deadline) = spec.deadline {
            if deadline <= spec.arrival {
                return Err(ValidationError::InvalidDeadline {
                    pid: spec.pid,
                    arrival: spec.arrival,
                    deadline,
                });
            }
        }
        Ok(Self {
            pid: Pid(spec.pid),
            arrival: spec.arrival as Time,
            burst: spec.burst as Time,
            priority: spec.priority,
            deadline: spec.deadline.map(|d| d as Time),
            input_index,
        })
    }
}

/// A validated set of processes, ordered by arrival.
///
/// The sort is stable, so processes arriving together keep the order the
/// caller listed them in.
#[derive(Debug, Clone, Default)]
pub struct Workload {
    processes: Vec<Process>,
}

impl Workload {
    /// Validate every record and normalize ordering.
    pub fn new(specs: &[ProcessSpec]) -> Result<Self, ValidationError> {
        let mut seen = BTreeSet::new();
        let mut processes = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let p = Process::validate(spec, i)?;
            if !seen.insert(spec.pid) {
                return Err(ValidationError::DuplicatePid(spec.pid));
            }
            processes.push(p);
        }
        let latest = processes.iter().map(|p| p.arrival).max().unwrap_or(0);
        processes
            .iter()
            .try_fold(latest, |end: Time, p| end.checked_add(p.burst))
            .ok_or(ValidationError::HorizonOverflow)?;
        processes.sort_by_key(|p| p.arrival);
        Ok(Self { processes })
    }

    /// Fail if any process lacks a deadline.
    pub fn require_deadlines(&self) -> Result<(), ValidationError> {
        match self.processes.iter().find(|p| p.deadline.is_none()) {
            Some(p) => Err(ValidationError::MissingDeadline { pid: p.pid }),
            None => Ok(()),
        }
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn total_burst(&self) -> Time {
        self.processes.iter().map(|p| p.burst).sum()
    }

    pub fn has_deadlines(&self) -> bool {
        self.processes.iter().any(|p| p.deadline.is_some())
    }
}
