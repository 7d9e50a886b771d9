//! Hybrid workloads: one CPU schedule and one paging run over the same
//! process set, reported side by side.
//!
//! The two subsystems are independent. A failure in one is kept in its own
//! `Result` and never prevents the other from running.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::algorithm::{CpuAlgorithm, PageAlgorithm};
use crate::config::SchedConfig;
use crate::error::SimError;
use crate::metrics::Metric;
use crate::paging::{replace, PagingRun, PagingWorkload};
use crate::process::ProcessSpec;
use crate::sched::{schedule, ScheduleRun};

/// Outcome of one subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum SubsystemStatus {
    Ok,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HybridStatus {
    pub cpu: SubsystemStatus,
    pub memory: SubsystemStatus,
}

#[derive(Debug, Clone)]
pub struct HybridReport {
    pub cpu: Result<ScheduleRun, SimError>,
    pub memory: Result<PagingRun, SimError>,
}

impl HybridReport {
    pub fn status(&self) -> HybridStatus {
        fn of<T>(r: &Result<T, SimError>) -> SubsystemStatus {
            match r {
                Ok(_) => SubsystemStatus::Ok,
                Err(e) => SubsystemStatus::Failed(e.to_string()),
            }
        }
        HybridStatus {
            cpu: of(&self.cpu),
            memory: of(&self.memory),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cpu.is_ok() && self.memory.is_ok()
    }

    /// Metrics of both subsystems under `cpu.` and `memory.` prefixes.
    ///
    /// A failed subsystem contributes no keys.
    pub fn combined(&self) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        if let Ok(run) = &self.cpu {
            for (metric, value) in &run.metrics.values {
                out.insert(format!("cpu.{metric}"), *value);
            }
        }
        if let Ok(run) = &self.memory {
            for (metric, value) in &run.metrics.values {
                out.insert(format!("memory.{metric}"), *value);
            }
        }
        out
    }

    /// Single 0-100 style figure of merit: the mean of
    /// `100 - average_waiting_time` and `100 - 5 * page_faults`.
    ///
    /// Unclamped, so heavy workloads can go negative. `None` unless both
    /// subsystems succeeded.
    pub fn efficiency_score(&self) -> Option<f64> {
        let (Ok(cpu), Ok(memory)) = (&self.cpu, &self.memory) else {
            return None;
        };
        let waiting = cpu.metrics.get(Metric::AverageWaitingTime)?;
        let faults = memory.metrics.get(Metric::PageFaults)?;
        let cpu_eff = 100.0 - waiting;
        let mem_eff = 100.0 - faults * 5.0;
        Some((cpu_eff + mem_eff) / 2.0)
    }

    /// Summary suitable for rendering or logging.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "cpu_algorithm": self.cpu.as_ref().ok().map(|r| r.algorithm.label()),
            "paging_algorithm": self.memory.as_ref().ok().map(|r| r.algorithm.label()),
            "status": self.status(),
            "metrics": self.combined(),
            "efficiency_score": self.efficiency_score(),
        })
    }
}

/// Run `cpu_algorithm` over `processes` and `paging_algorithm` over
/// `paging`.
pub fn hybrid(
    processes: &[ProcessSpec],
    paging: &PagingWorkload,
    cpu_algorithm: &str,
    paging_algorithm: &str,
    config: &SchedConfig,
) -> HybridReport {
    let cpu = CpuAlgorithm::resolve(cpu_algorithm)
        .map_err(SimError::from)
        .and_then(|a| schedule(a, processes, config));
    let memory = PageAlgorithm::resolve(paging_algorithm)
        .map_err(SimError::from)
        .and_then(|a| replace(a, &paging.references, paging.frame_capacity));

    if let Err(e) = &cpu {
        warn!(%e, "hybrid: cpu subsystem failed");
    }
    if let Err(e) = &memory {
        warn!(%e, "hybrid: memory subsystem failed");
    }

    let report = HybridReport { cpu, memory };
    info!(complete = report.is_complete(), "hybrid run complete");
    report
}
