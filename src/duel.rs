//! Algorithm duel: run several algorithms of one category on the same
//! workload and rank them by a metric.
//!
//! Ranking is fully deterministic. Ties on the ranking metric fall back
//! to a secondary metric and then to the algorithm label:
//!
//! | primary                   | secondary                 |
//! |---------------------------|---------------------------|
//! | any CPU metric            | `average_turnaround_time` |
//! | `average_turnaround_time` | `average_waiting_time`    |
//! | any paging metric         | `page_faults`             |
//! | `page_faults`             | `hit_ratio`               |

use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::info;

use crate::algorithm::{Algorithm, Category};
use crate::config::SchedConfig;
use crate::error::{ConfigError, SimError};
use crate::metrics::{Direction, Metric, MetricsReport};
use crate::paging::{replace, PagingWorkload};
use crate::process::ProcessSpec;
use crate::sched::schedule;

/// Input shared by every contestant.
#[derive(Debug, Clone)]
pub enum DuelWorkload {
    Cpu {
        processes: Vec<ProcessSpec>,
        config: SchedConfig,
    },
    Paging(PagingWorkload),
}

impl DuelWorkload {
    pub fn category(&self) -> Category {
        match self {
            DuelWorkload::Cpu { .. } => Category::Cpu,
            DuelWorkload::Paging(_) => Category::Paging,
        }
    }
}

/// One ranked contestant.
#[derive(Debug, Clone, Serialize)]
pub struct DuelEntry {
    /// 1-based; every entry has a distinct rank.
    pub rank: usize,
    pub algorithm: &'static str,
    /// Value of the ranking metric.
    pub value: f64,
    /// Absolute difference from the entry ranked just above (0 for the
    /// winner).
    pub delta: f64,
    pub report: MetricsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuelResult {
    pub category: Category,
    pub metric: Metric,
    /// Best first.
    pub entries: Vec<DuelEntry>,
    pub winner: &'static str,
    pub verdict: String,
}

impl DuelResult {
    pub fn ranking(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.algorithm).collect()
    }

    pub fn entry(&self, algorithm: &str) -> Option<&DuelEntry> {
        self.entries.iter().find(|e| e.algorithm == algorithm)
    }
}

/// Run every algorithm in `algorithms` on `workload` and rank them.
///
/// `rank_by` defaults to `average_waiting_time` for CPU duels and
/// `hit_ratio` for paging duels. Any failing contestant fails the whole
/// duel.
pub fn duel(
    algorithms: &[&str],
    workload: &DuelWorkload,
    category: Category,
    rank_by: Option<&str>,
) -> Result<DuelResult, SimError> {
    if algorithms.is_empty() {
        return Err(ConfigError::EmptyDuel.into());
    }

    let mut contestants: Vec<Algorithm> = Vec::with_capacity(algorithms.len());
    for &name in algorithms {
        let algorithm = match (Algorithm::parse_in(name, category)?, workload) {
            (Algorithm::Cpu(a), DuelWorkload::Cpu { config, .. }) => {
                Algorithm::Cpu(a.with_config(config))
            }
            (a, w) if a.category() == w.category() => a,
            _ => {
                return Err(ConfigError::CategoryMismatch {
                    algorithm: name.to_string(),
                    expected: workload.category().to_string(),
                }
                .into())
            }
        };
        if contestants.contains(&algorithm) {
            return Err(ConfigError::DuplicateAlgorithm(name.to_string()).into());
        }
        contestants.push(algorithm);
    }

    let metric = ranking_metric(category, rank_by)?;
    let secondary = secondary_metric(metric);

    let mut entries = Vec::with_capacity(contestants.len());
    for algorithm in contestants {
        let report = run_one(algorithm, workload)?;
        let value = report.require(metric)?;
        entries.push((algorithm.label(), value, report));
    }

    let oriented = |m: Metric, v: f64| match m.direction() {
        Direction::HigherIsBetter => OrderedFloat(-v),
        _ => OrderedFloat(v),
    };
    entries.sort_by_key(|(label, value, report)| {
        let tie = report.get(secondary).unwrap_or(0.0);
        (oriented(metric, *value), oriented(secondary, tie), *label)
    });

    let mut ranked: Vec<DuelEntry> = Vec::with_capacity(entries.len());
    for (i, (algorithm, value, report)) in entries.into_iter().enumerate() {
        let delta = ranked.last().map_or(0.0, |prev| (value - prev.value).abs());
        ranked.push(DuelEntry {
            rank: i + 1,
            algorithm,
            value,
            delta,
            report,
        });
    }

    let verdict = verdict(&ranked, metric);
    let winner = ranked[0].algorithm;
    info!(%metric, winner, contestants = ranked.len(), "duel complete");

    Ok(DuelResult {
        category,
        metric,
        entries: ranked,
        winner,
        verdict,
    })
}

fn ranking_metric(category: Category, rank_by: Option<&str>) -> Result<Metric, ConfigError> {
    let metric = match rank_by {
        Some(name) => name.parse::<Metric>()?,
        None => match category {
            Category::Cpu => Metric::AverageWaitingTime,
            Category::Paging => Metric::HitRatio,
        },
    };
    if metric.category() != category {
        return Err(ConfigError::MetricUnavailable(metric.name().to_string()));
    }
    if metric.direction() == Direction::Neutral {
        return Err(ConfigError::UnrankableMetric(metric.name().to_string()));
    }
    Ok(metric)
}

fn secondary_metric(primary: Metric) -> Metric {
    match (primary.category(), primary) {
        (Category::Cpu, Metric::AverageTurnaroundTime) => Metric::AverageWaitingTime,
        (Category::Cpu, _) => Metric::AverageTurnaroundTime,
        (Category::Paging, Metric::PageFaults) => Metric::HitRatio,
        (Category::Paging, _) => Metric::PageFaults,
    }
}

fn run_one(algorithm: Algorithm, workload: &DuelWorkload) -> Result<MetricsReport, SimError> {
    match (algorithm, workload) {
        (Algorithm::Cpu(a), DuelWorkload::Cpu { processes, config }) => {
            Ok(schedule(a, processes, config)?.metrics)
        }
        (Algorithm::Paging(a), DuelWorkload::Paging(w)) => {
            Ok(replace(a, &w.references, w.frame_capacity)?.metrics)
        }
        (a, w) => Err(ConfigError::CategoryMismatch {
            algorithm: a.label().to_string(),
            expected: w.category().to_string(),
        }
        .into()),
    }
}

fn verdict(ranked: &[DuelEntry], metric: Metric) -> String {
    let winner = &ranked[0];
    match ranked.get(1) {
        None => format!(
            "{} is the only contestant: {} = {}",
            winner.algorithm, metric, winner.value
        ),
        Some(second) if second.delta == 0.0 => format!(
            "{} and {} tie on {} ({}); {} ranks first on the tie-break",
            winner.algorithm, second.algorithm, metric, winner.value, winner.algorithm
        ),
        Some(second) => format!(
            "{} wins on {} ({}), ahead of {} by {}",
            winner.algorithm, metric, winner.value, second.algorithm, second.delta
        ),
    }
}
