//! algosim - Deterministic simulator for textbook operating-system
//! algorithms.
//!
//! Turns a list of processes into a CPU schedule, or a page reference
//! string into a frame allocation trace, and derives the usual performance
//! metrics. On top of the two engines sit an algorithm duel (rank several
//! algorithms on one workload) and a hybrid report (one CPU and one paging
//! run side by side).
//!
//! # Architecture
//!
//! - **Model**: validated processes and workloads ([`process`])
//! - **Sched**: FCFS, SJF/SRTF, RR, Priority, MLFQ and EDF ([`sched`])
//! - **Paging**: FIFO, LRU, Optimal and Clock ([`paging`])
//! - **Metrics**: per-process and aggregate figures ([`metrics`])
//! - **Duel** / **Hybrid**: comparison and combined reporting
//!
//! Every run is a pure function of its input; nothing is shared between
//! runs.
//!
//! # Usage
//!
//! ```rust
//! use algosim::*;
//!
//! let run = schedule(
//!     CpuAlgorithm::Sjf { preemptive: false },
//!     &workloads::sjf_example(),
//!     &SchedConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(run.completion_order(), vec![Pid(1), Pid(3), Pid(2)]);
//!
//! let paging = replace(PageAlgorithm::Fifo, &workloads::belady(), 3).unwrap();
//! assert_eq!(paging.faults, 9);
//! ```

pub mod algorithm;
pub mod config;
pub mod duel;
pub mod error;
pub mod fmt;
pub mod hybrid;
pub mod metrics;
pub mod paging;
pub mod parse;
pub mod process;
pub mod sched;
pub mod timeline;
pub mod trace;
pub mod types;
pub mod workloads;

// Re-export the main public types for convenience.
pub use algorithm::{Algorithm, Category, CpuAlgorithm, PageAlgorithm};
pub use config::{SchedConfig, SchedConfigBuilder, DEFAULT_MLFQ_QUANTA};
pub use duel::{duel, DuelEntry, DuelResult, DuelWorkload};
pub use error::{ConfigError, SimError, ValidationError};
pub use fmt::{FmtTs, SimFormat};
pub use hybrid::{hybrid, HybridReport, HybridStatus, SubsystemStatus};
pub use metrics::{Direction, Metric, MetricsReport, ProcessMetrics};
pub use paging::{replace, replace_named, FrameState, PagingRun, PagingWorkload};
pub use process::{Process, ProcessSpec, Workload};
pub use sched::{schedule, schedule_named, CompletionRecord, ScheduleRun};
pub use timeline::{ExecutionInterval, Timeline};
pub use trace::{Trace, TraceEvent, TraceKind, TraceSummary};
pub use types::{pages, PageId, Pid, Time};
