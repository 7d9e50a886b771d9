//! Gantt-style execution timeline produced by the CPU scheduler.
//!
//! A timeline always starts at time 0 and is contiguous: every interval
//! begins where the previous one ended. Idle gaps are explicit intervals
//! with no pid, and consecutive slices of the same process are merged.

use std::io::Write;

use serde::Serialize;
use serde_json::json;

use crate::types::{Pid, Time};

/// One contiguous stretch of CPU time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionInterval {
    /// Running process, or `None` when the CPU is idle.
    pub pid: Option<Pid>,
    pub start: Time,
    pub end: Time,
}

impl ExecutionInterval {
    pub fn duration(&self) -> Time {
        self.end - self.start
    }

    pub fn is_idle(&self) -> bool {
        self.pid.is_none()
    }
}

/// Ordered list of execution intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    intervals: Vec<ExecutionInterval>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `pid` running over `[start, end)`.
    ///
    /// Any gap since the previous interval becomes an idle interval.
    /// Empty ranges are ignored.
    pub(crate) fn run(&mut self, pid: Pid, start: Time, end: Time) {
        self.push(Some(pid), start, end);
    }

    /// Record the CPU idling over `[start, end)`.
    pub(crate) fn idle(&mut self, start: Time, end: Time) {
        self.push(None, start, end);
    }

    fn push(&mut self, pid: Option<Pid>, start: Time, end: Time) {
        if end <= start {
            return;
        }
        let tail = self.end();
        debug_assert!(start >= tail, "interval starts before timeline end");
        if start > tail {
            self.push(None, tail, start);
        }
        match self.intervals.last_mut() {
            Some(last) if last.pid == pid && last.end == start => last.end = end,
            _ => self.intervals.push(ExecutionInterval { pid, start, end }),
        }
    }

    pub fn intervals(&self) -> &[ExecutionInterval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Time at which the last interval ends (0 for an empty timeline).
    pub fn end(&self) -> Time {
        self.intervals.last().map_or(0, |i| i.end)
    }

    /// Total non-idle time.
    pub fn busy_time(&self) -> Time {
        self.intervals
            .iter()
            .filter(|i| !i.is_idle())
            .map(|i| i.duration())
            .sum()
    }

    pub fn idle_time(&self) -> Time {
        self.end() - self.busy_time()
    }

    /// Total CPU time given to `pid`.
    pub fn runtime_of(&self, pid: Pid) -> Time {
        self.intervals
            .iter()
            .filter(|i| i.pid == Some(pid))
            .map(|i| i.duration())
            .sum()
    }

    /// Number of separate slices `pid` ran in.
    pub fn slice_count(&self, pid: Pid) -> usize {
        self.intervals.iter().filter(|i| i.pid == Some(pid)).count()
    }

    /// Write the timeline as Chrome Trace Event Format JSON.
    ///
    /// The output loads in chrome://tracing or ui.perfetto.dev as a single
    /// CPU track with one duration block per interval. One tick maps to
    /// one microsecond.
    pub fn write_trace_json(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writer.write_all(b"{\"traceEvents\":[")?;

        let mut need_comma = false;

        write_comma(writer, &mut need_comma)?;
        serde_json::to_writer(
            &mut *writer,
            &json!({
                "ph": "M",
                "pid": 0,
                "tid": 0,
                "name": "process_name",
                "args": { "name": "CPU" }
            }),
        )?;

        for interval in &self.intervals {
            write_comma(writer, &mut need_comma)?;
            let value = match interval.pid {
                Some(pid) => json!({
                    "ph": "X",
                    "pid": 0,
                    "tid": 0,
                    "ts": interval.start,
                    "dur": interval.duration(),
                    "name": pid.to_string(),
                    "cat": "sched",
                    "args": { "pid": pid.0 }
                }),
                None => json!({
                    "ph": "X",
                    "pid": 0,
                    "tid": 0,
                    "ts": interval.start,
                    "dur": interval.duration(),
                    "name": "idle",
                    "cat": "idle"
                }),
            };
            serde_json::to_writer(&mut *writer, &value)?;
        }

        writer.write_all(b"]}")?;
        Ok(())
    }
}

fn write_comma(writer: &mut impl Write, need_comma: &mut bool) -> std::io::Result<()> {
    if *need_comma {
        writer.write_all(b",")?;
    }
    *need_comma = true;
    Ok(())
}
