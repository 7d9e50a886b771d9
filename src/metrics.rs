//! Performance metrics for scheduling and paging runs.
//!
//! Values are kept at full `f64` precision; rounding is left to whoever
//! renders them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::algorithm::Category;
use crate::error::ConfigError;
use crate::sched::CompletionRecord;
use crate::timeline::Timeline;
use crate::types::{Pid, Time};

/// Whether smaller or larger values of a metric are preferable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
    /// Descriptive only; cannot rank algorithms.
    Neutral,
}

/// A named aggregate metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AverageWaitingTime,
    AverageTurnaroundTime,
    AverageResponseTime,
    MaxWaitingTime,
    CpuUtilization,
    Throughput,
    TotalExecutionTime,
    MissedDeadlines,
    DeadlineMissRatio,
    Schedulability,
    TotalReferences,
    PageFaults,
    PageHits,
    HitRatio,
    FaultRatio,
}

impl Metric {
    pub const ALL: [Metric; 15] = [
        Metric::AverageWaitingTime,
        Metric::AverageTurnaroundTime,
        Metric::AverageResponseTime,
        Metric::MaxWaitingTime,
        Metric::CpuUtilization,
        Metric::Throughput,
        Metric::TotalExecutionTime,
        Metric::MissedDeadlines,
        Metric::DeadlineMissRatio,
        Metric::Schedulability,
        Metric::TotalReferences,
        Metric::PageFaults,
        Metric::PageHits,
        Metric::HitRatio,
        Metric::FaultRatio,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::AverageWaitingTime => "average_waiting_time",
            Metric::AverageTurnaroundTime => "average_turnaround_time",
            Metric::AverageResponseTime => "average_response_time",
            Metric::MaxWaitingTime => "max_waiting_time",
            Metric::CpuUtilization => "cpu_utilization",
            Metric::Throughput => "throughput",
            Metric::TotalExecutionTime => "total_execution_time",
            Metric::MissedDeadlines => "missed_deadlines",
            Metric::DeadlineMissRatio => "deadline_miss_ratio",
            Metric::Schedulability => "schedulability",
            Metric::TotalReferences => "total_references",
            Metric::PageFaults => "page_faults",
            Metric::PageHits => "page_hits",
            Metric::HitRatio => "hit_ratio",
            Metric::FaultRatio => "fault_ratio",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Metric::TotalReferences
            | Metric::PageFaults
            | Metric::PageHits
            | Metric::HitRatio
            | Metric::FaultRatio => Category::Paging,
            _ => Category::Cpu,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Metric::AverageWaitingTime
            | Metric::AverageTurnaroundTime
            | Metric::AverageResponseTime
            | Metric::MaxWaitingTime
            | Metric::TotalExecutionTime
            | Metric::MissedDeadlines
            | Metric::DeadlineMissRatio
            | Metric::PageFaults
            | Metric::FaultRatio => Direction::LowerIsBetter,
            Metric::CpuUtilization
            | Metric::Throughput
            | Metric::Schedulability
            | Metric::PageHits
            | Metric::HitRatio => Direction::HigherIsBetter,
            Metric::TotalReferences => Direction::Neutral,
        }
    }

    /// Whether `a` is strictly better than `b` under this metric.
    pub fn better(&self, a: f64, b: f64) -> bool {
        match self.direction() {
            Direction::LowerIsBetter => a < b,
            Direction::HigherIsBetter => a > b,
            Direction::Neutral => false,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownMetric(s.to_string()))
    }
}

/// Per-process timing derived from a completion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub turnaround: Time,
    pub waiting: Time,
    pub response: Time,
    pub deadline_missed: Option<bool>,
}

/// Result of the metrics calculator for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub category: Category,
    /// Empty for paging runs.
    pub per_process: Vec<ProcessMetrics>,
    pub values: BTreeMap<Metric, f64>,
}

impl MetricsReport {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// Look up a metric that must be present.
    pub fn require(&self, metric: Metric) -> Result<f64, ConfigError> {
        self.get(metric)
            .ok_or_else(|| ConfigError::MetricUnavailable(metric.name().to_string()))
    }
}

/// Mean of `values` over `n` samples, 0 when empty.
///
/// Summed in `u128` so that many long turnarounds cannot overflow.
fn mean(values: impl Iterator<Item = Time>, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    values.map(u128::from).sum::<u128>() as f64 / n as f64
}

/// Compute the CPU metrics for a finished schedule.
///
/// Rates use the schedule span (the time the last process completed) as
/// the denominator. The deadline metrics are only present when at least
/// one process has a deadline.
pub fn cpu_report(completions: &[CompletionRecord], timeline: &Timeline) -> MetricsReport {
    let per_process: Vec<ProcessMetrics> = completions
        .iter()
        .map(|r| ProcessMetrics {
            pid: r.pid,
            turnaround: r.turnaround(),
            waiting: r.waiting(),
            response: r.response(),
            deadline_missed: r.deadline_missed,
        })
        .collect();


    let span = completions.iter().map(|r| r.completion).max().unwrap_or(0);
    let busy = timeline.busy_time();
    let n = completions.len();
    let max_waiting = per_process.iter().map(|p| p.waiting).max().unwrap_or(0);
    let rate = |num: f64| if span > 0 { num / span as f64 } else { 0.0 };

    let mut values = BTreeMap::new();
    values.insert(
        Metric::AverageWaitingTime,
        mean(per_process.iter().map(|p| p.waiting), n),
    );
    values.insert(
        Metric::AverageTurnaroundTime,
        mean(per_process.iter().map(|p| p.turnaround), n),
    );
    values.insert(
        Metric::AverageResponseTime,
        mean(per_process.iter().map(|p| p.response), n),
    );
    values.insert(Metric::MaxWaitingTime, max_waiting as f64);
    values.insert(Metric::CpuUtilization, rate(busy as f64));
    values.insert(Metric::Throughput, rate(n as f64));
    values.insert(Metric::TotalExecutionTime, span as f64);

    let with_deadline = completions.iter().filter(|r| r.deadline.is_some()).count();
    if with_deadline > 0 {
        let missed = completions
            .iter()
            .filter(|r| r.deadline_missed == Some(true))
            .count();
        let ratio = missed as f64 / with_deadline as f64;
        values.insert(Metric::MissedDeadlines, missed as f64);
        values.insert(Metric::DeadlineMissRatio, ratio);
        values.insert(Metric::Schedulability, 1.0 - ratio);
    }

    MetricsReport {
        category: Category::Cpu,
        per_process,
        values,
    }
}

/// Compute the paging metrics from hit and fault counts.
///
/// `fault_ratio` is derived as `1 - hit_ratio` so the two always sum to
/// exactly one. An empty reference string reports zero for both.
pub fn paging_report(hits: usize, faults: usize) -> MetricsReport {
    let total = hits + faults;
    let hit_ratio = if total > 0 {
        hits as f64 / total as f64
    } else {
        0.0
    };
    let fault_ratio = if total > 0 { 1.0 - hit_ratio } else { 0.0 };

    let mut values = BTreeMap::new();
    values.insert(Metric::TotalReferences, total as f64);
    values.insert(Metric::PageFaults, faults as f64);
    values.insert(Metric::PageHits, hits as f64);
    values.insert(Metric::HitRatio, hit_ratio);
    values.insert(Metric::FaultRatio, fault_ratio);

    MetricsReport {
        category: Category::Paging,
        per_process: Vec::new(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32, arrival: Time, burst: Time, first_run: Time, completion: Time) -> CompletionRecord {
        CompletionRecord {
            pid: Pid(pid),
            arrival,
            burst,
            priority: 0,
            deadline: None,
            first_run,
            completion,
            deadline_missed: None,
        }
    }

    #[test]
    fn test_metric_names_round_trip() {
        for m in Metric::ALL {
            assert_eq!(m.name().parse::<Metric>(), Ok(m));
        }
        assert_eq!("Hit-Ratio".parse::<Metric>(), Ok(Metric::HitRatio));
        assert_eq!(
            "latency".parse::<Metric>(),
            Err(ConfigError::UnknownMetric("latency".into()))
        );
    }

    #[test]
    fn test_directions() {
        assert!(Metric::AverageWaitingTime.better(1.0, 2.0));
        assert!(Metric::HitRatio.better(0.5, 0.25));
        assert!(!Metric::TotalReferences.better(1.0, 2.0));
        assert_eq!(Metric::PageFaults.category(), Category::Paging);
        assert_eq!(Metric::Throughput.category(), Category::Cpu);
    }

    #[test]
    fn test_cpu_report() {
        let completions = [record(1, 0, 5, 0, 5), record(3, 2, 1, 5, 6), record(2, 1, 3, 6, 9)];
        let mut timeline = Timeline::new();
        timeline.run(Pid(1), 0, 5);
        timeline.run(Pid(3), 5, 6);
        timeline.run(Pid(2), 6, 9);

        let r = cpu_report(&completions, &timeline);
        assert_eq!(r.get(Metric::AverageWaitingTime), Some(8.0 / 3.0));
        assert_eq!(r.get(Metric::AverageTurnaroundTime), Some(17.0 / 3.0));
        assert_eq!(r.get(Metric::MaxWaitingTime), Some(5.0));
        assert_eq!(r.get(Metric::CpuUtilization), Some(1.0));
        assert_eq!(r.get(Metric::Throughput), Some(3.0 / 9.0));
        assert_eq!(r.get(Metric::TotalExecutionTime), Some(9.0));
        assert_eq!(r.get(Metric::MissedDeadlines), None);
        assert_eq!(
            r.require(Metric::Schedulability),
            Err(ConfigError::MetricUnavailable("schedulability".into()))
        );
    }

    #[test]
    fn test_cpu_report_empty() {
        let r = cpu_report(&[], &Timeline::new());
        assert!(r.per_process.is_empty());
        assert!(r.values.values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_paging_report() {
        let r = paging_report(3, 9);
        assert_eq!(r.get(Metric::TotalReferences), Some(12.0));
        assert_eq!(r.get(Metric::HitRatio), Some(0.25));
        assert_eq!(r.get(Metric::HitRatio).unwrap() + r.get(Metric::FaultRatio).unwrap(), 1.0);

        let empty = paging_report(0, 0);
        assert_eq!(empty.get(Metric::HitRatio), Some(0.0));
        assert_eq!(empty.get(Metric::FaultRatio), Some(0.0));
    }

    #[test]
    fn test_averages_do_not_overflow() {
        // Turnarounds sum to 10 * 2^61, past u64::MAX.
        let b = 1u64 << 61;
        let completions: Vec<CompletionRecord> = (0..4)
            .map(|i| record(i as u32 + 1, 0, b, i * b, (i + 1) * b))
            .collect();
        let mut timeline = Timeline::new();
        for r in &completions {
            timeline.run(r.pid, r.first_run, r.completion);
        }

        let r = cpu_report(&completions, &timeline);
        assert_eq!(r.get(Metric::AverageTurnaroundTime), Some(2.5 * b as f64));
        assert_eq!(r.get(Metric::AverageWaitingTime), Some(1.5 * b as f64));
        assert_eq!(r.get(Metric::MaxWaitingTime), Some(3.0 * b as f64));
        assert_eq!(r.get(Metric::CpuUtilization), Some(1.0));
    }
}
