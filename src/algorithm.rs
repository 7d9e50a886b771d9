//! Closed sets of supported algorithms and their names.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::SchedConfig;
use crate::error::ConfigError;

/// Which engine an algorithm belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cpu,
    Paging,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Cpu => write!(f, "CPU scheduling"),
            Category::Paging => write!(f, "page replacement"),
        }
    }
}

/// CPU scheduling algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CpuAlgorithm {
    Fcfs,
    /// Shortest Job First; preemptive is Shortest Remaining Time First.
    Sjf { preemptive: bool },
    RoundRobin,
    Priority { preemptive: bool },
    Mlfq,
    Edf,
}

impl CpuAlgorithm {
    pub const ALL: [CpuAlgorithm; 8] = [
        CpuAlgorithm::Fcfs,
        CpuAlgorithm::Sjf { preemptive: false },
        CpuAlgorithm::Sjf { preemptive: true },
        CpuAlgorithm::RoundRobin,
        CpuAlgorithm::Priority { preemptive: false },
        CpuAlgorithm::Priority { preemptive: true },
        CpuAlgorithm::Mlfq,
        CpuAlgorithm::Edf,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CpuAlgorithm::Fcfs => "FCFS",
            CpuAlgorithm::Sjf { preemptive: false } => "SJF",
            CpuAlgorithm::Sjf { preemptive: true } => "SRTF",
            CpuAlgorithm::RoundRobin => "RR",
            CpuAlgorithm::Priority { preemptive: false } => "Priority",
            CpuAlgorithm::Priority { preemptive: true } => "Priority (preemptive)",
            CpuAlgorithm::Mlfq => "MLFQ",
            CpuAlgorithm::Edf => "EDF",
        }
    }

    /// Like `parse`, but a page replacement name is reported as a
    /// category mismatch rather than as unknown.
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        name.parse().map_err(|e| {
            mismatch_or(e, name, name.parse::<PageAlgorithm>().is_ok(), Category::Cpu)
        })
    }

    /// Apply `config.preemptive` to algorithms that have a preemptive variant.
    pub fn with_config(self, config: &SchedConfig) -> Self {
        if !config.preemptive {
            return self;
        }
        match self {
            CpuAlgorithm::Sjf { .. } => CpuAlgorithm::Sjf { preemptive: true },
            CpuAlgorithm::Priority { .. } => CpuAlgorithm::Priority { preemptive: true },
            other => other,
        }
    }
}

impl fmt::Display for CpuAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CpuAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fcfs" => Ok(CpuAlgorithm::Fcfs),
            "sjf" => Ok(CpuAlgorithm::Sjf { preemptive: false }),
            "srtf" | "sjf-preemptive" => Ok(CpuAlgorithm::Sjf { preemptive: true }),
            "rr" | "round-robin" => Ok(CpuAlgorithm::RoundRobin),
            "priority" => Ok(CpuAlgorithm::Priority { preemptive: false }),
            "priority-preemptive" => Ok(CpuAlgorithm::Priority { preemptive: true }),
            "mlfq" => Ok(CpuAlgorithm::Mlfq),
            "edf" => Ok(CpuAlgorithm::Edf),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Page replacement algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageAlgorithm {
    Fifo,
    Lru,
    Optimal,
    Clock,
}

impl PageAlgorithm {
    pub const ALL: [PageAlgorithm; 4] = [
        PageAlgorithm::Fifo,
        PageAlgorithm::Lru,
        PageAlgorithm::Optimal,
        PageAlgorithm::Clock,
    ];

    /// Like `parse`, but a CPU scheduling name is reported as a category
    /// mismatch rather than as unknown.
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        name.parse().map_err(|e| {
            mismatch_or(e, name, name.parse::<CpuAlgorithm>().is_ok(), Category::Paging)
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageAlgorithm::Fifo => "FIFO",
            PageAlgorithm::Lru => "LRU",
            PageAlgorithm::Optimal => "Optimal",
            PageAlgorithm::Clock => "Clock",
        }
    }
}

impl fmt::Display for PageAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PageAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fifo" => Ok(PageAlgorithm::Fifo),
            "lru" => Ok(PageAlgorithm::Lru),
            "optimal" | "opt" | "min" => Ok(PageAlgorithm::Optimal),
            "clock" | "second-chance" => Ok(PageAlgorithm::Clock),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// An algorithm from either engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Cpu(CpuAlgorithm),
    Paging(PageAlgorithm),
}

impl Algorithm {
    pub fn category(&self) -> Category {
        match self {
            Algorithm::Cpu(_) => Category::Cpu,
            Algorithm::Paging(_) => Category::Paging,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Cpu(a) => a.label(),
            Algorithm::Paging(a) => a.label(),
        }
    }

    /// Parse `name` as an algorithm of `category`.
    pub fn parse_in(name: &str, category: Category) -> Result<Self, ConfigError> {
        match category {
            Category::Cpu => CpuAlgorithm::resolve(name).map(Algorithm::Cpu),
            Category::Paging => PageAlgorithm::resolve(name).map(Algorithm::Paging),
        }
    }
}

/// "FIFO" names the page replacement algorithm; FCFS is the CPU one.
impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(a) = s.parse::<PageAlgorithm>() {
            return Ok(Algorithm::Paging(a));
        }
        s.parse::<CpuAlgorithm>().map(Algorithm::Cpu)
    }
}

fn mismatch_or(e: ConfigError, name: &str, other: bool, expected: Category) -> ConfigError {
    if other {
        ConfigError::CategoryMismatch {
            algorithm: name.to_string(),
            expected: expected.to_string(),
        }
    } else {
        e
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_names() {
        assert_eq!("FCFS".parse(), Ok(CpuAlgorithm::Fcfs));
        assert_eq!("srtf".parse(), Ok(CpuAlgorithm::Sjf { preemptive: true }));
        assert_eq!("Round_Robin".parse(), Ok(CpuAlgorithm::RoundRobin));
        assert_eq!(
            "priority preemptive".parse(),
            Ok(CpuAlgorithm::Priority { preemptive: true })
        );
        assert_eq!(
            "lottery".parse::<CpuAlgorithm>(),
            Err(ConfigError::UnknownAlgorithm("lottery".into()))
        );
        for a in CpuAlgorithm::ALL {
            assert!(!a.label().is_empty());
        }
    }

    #[test]
    fn test_page_names() {
        assert_eq!("LRU".parse(), Ok(PageAlgorithm::Lru));
        assert_eq!("opt".parse(), Ok(PageAlgorithm::Optimal));
        assert!("nru".parse::<PageAlgorithm>().is_err());
    }

    #[test]
    fn test_any_algorithm_category() {
        assert_eq!("fifo".parse::<Algorithm>().unwrap().category(), Category::Paging);
        assert_eq!("fcfs".parse::<Algorithm>().unwrap().category(), Category::Cpu);
        assert_eq!("edf".parse::<Algorithm>().unwrap().label(), "EDF");
    }

    #[test]
    fn test_parse_in() {
        assert_eq!(
            Algorithm::parse_in("fifo", Category::Paging),
            Ok(Algorithm::Paging(PageAlgorithm::Fifo))
        );
        assert_eq!(
            Algorithm::parse_in("lru", Category::Cpu),
            Err(ConfigError::CategoryMismatch {
                algorithm: "lru".into(),
                expected: "CPU scheduling".into()
            })
        );
        assert_eq!(
            Algorithm::parse_in("bogus", Category::Paging),
            Err(ConfigError::UnknownAlgorithm("bogus".into()))
        );
    }

    #[test]
    fn test_with_config() {
        let pre = SchedConfig::builder().preemptive(true).build();
        assert_eq!(
            CpuAlgorithm::Sjf { preemptive: false }.with_config(&pre),
            CpuAlgorithm::Sjf { preemptive: true }
        );
        assert_eq!(CpuAlgorithm::Fcfs.with_config(&pre), CpuAlgorithm::Fcfs);
        assert_eq!(
            CpuAlgorithm::Priority { preemptive: false }.with_config(&SchedConfig::default()),
            CpuAlgorithm::Priority { preemptive: false }
        );
    }
}
