//! Scheduler configuration and its builder.

use serde::Serialize;

use crate::error::ConfigError;
use crate::types::Time;

/// Default MLFQ quanta, highest priority level first.
pub const DEFAULT_MLFQ_QUANTA: [Time; 3] = [2, 4, 8];

/// Parameters consumed by the CPU scheduling algorithms.
///
/// Fields an algorithm does not use are ignored by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedConfig {
    /// Round Robin time quantum.
    pub quantum: Option<Time>,
    /// Select the preemptive variant of SJF and Priority.
    pub preemptive: bool,
    /// MLFQ per-level quanta. `None` means [`DEFAULT_MLFQ_QUANTA`].
    pub queues: Option<Vec<Time>>,
    /// MLFQ priority boost period. `None` disables boosting.
    pub boost_interval: Option<Time>,
}

/// Builder for [`SchedConfig`].
pub struct SchedConfigBuilder {
    config: SchedConfig,
}

impl SchedConfig {
    pub fn builder() -> SchedConfigBuilder {
        SchedConfigBuilder {
            config: SchedConfig::default(),
        }
    }

    /// Build a configuration from `ALGOSIM_*` environment variables.
    ///
    /// - `ALGOSIM_QUANTUM`: Round Robin quantum, e.g. `4`
    /// - `ALGOSIM_MLFQ_QUANTA`: comma-separated per-level quanta, e.g. `2,4,8`
    /// - `ALGOSIM_MLFQ_BOOST`: MLFQ boost period, e.g. `20`
    /// - `ALGOSIM_PREEMPTIVE=1`: preemptive SJF/Priority
    ///
    /// Unset variables leave the default in place.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("ALGOSIM_QUANTUM") {
            config.quantum = Some(parse_ticks(&v).map_err(|reason| ConfigError::InvalidEnv {
                var: "ALGOSIM_QUANTUM",
                reason,
            })?);
        }
        if let Ok(v) = std::env::var("ALGOSIM_MLFQ_QUANTA") {
            config.queues = Some(parse_quanta(&v).map_err(|reason| ConfigError::InvalidEnv {
                var: "ALGOSIM_MLFQ_QUANTA",
                reason,
            })?);
        }
        if let Ok(v) = std::env::var("ALGOSIM_MLFQ_BOOST") {
            config.boost_interval =
                Some(parse_ticks(&v).map_err(|reason| ConfigError::InvalidEnv {
                    var: "ALGOSIM_MLFQ_BOOST",
                    reason,
                })?);
        }
        if std::env::var("ALGOSIM_PREEMPTIVE").ok().as_deref() == Some("1") {
            config.preemptive = true;
        }
        Ok(config)
    }

    /// Round Robin quantum, checked.
    pub(crate) fn rr_quantum(&self) -> Result<Time, ConfigError> {
        match self.quantum {
            None => Err(ConfigError::MissingQuantum),
            Some(0) => Err(ConfigError::InvalidQuantum { level: None }),
            Some(q) => Ok(q),
        }
    }

    /// MLFQ per-level quanta, checked.
    pub(crate) fn mlfq_quanta(&self) -> Result<Vec<Time>, ConfigError> {
        let quanta = match &self.queues {
            Some(q) => q.clone(),
            None => DEFAULT_MLFQ_QUANTA.to_vec(),
        };
        if quanta.is_empty() {
            return Err(ConfigError::EmptyQueues);
        }
        if let Some(level) = quanta.iter().position(|&q| q == 0) {
            return Err(ConfigError::InvalidQuantum { level: Some(level) });
        }
        Ok(quanta)
    }

    /// MLFQ boost period, checked.
    pub(crate) fn mlfq_boost(&self) -> Result<Option<Time>, ConfigError> {
        match self.boost_interval {
            Some(0) => Err(ConfigError::InvalidBoostInterval),
            b => Ok(b),
        }
    }
}

impl SchedConfigBuilder {
    /// Set the Round Robin time quantum.
    pub fn quantum(mut self, q: Time) -> Self {
        self.config.quantum = Some(q);
        self
    }

    /// Use the preemptive variants of SJF and Priority.
    pub fn preemptive(mut self, on: bool) -> Self {
        self.config.preemptive = on;
        self
    }

    /// Set the MLFQ per-level quanta.
    pub fn queues(mut self, quanta: Vec<Time>) -> Self {
        self.config.queues = Some(quanta);
        self
    }

    /// Enable periodic MLFQ priority boosting.
    pub fn boost_interval(mut self, interval: Time) -> Self {
        self.config.boost_interval = Some(interval);
        self
    }

    pub fn build(self) -> SchedConfig {
        self.config
    }
}

/// Parse a non-negative tick count.
pub fn parse_ticks(s: &str) -> Result<Time, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty value".to_string());
    }
    s.parse::<Time>()
        .map_err(|e| format!("invalid tick count {s:?}: {e}"))
}

/// Parse a comma-separated list of per-level quanta.
pub fn parse_quanta(s: &str) -> Result<Vec<Time>, String> {
    s.split(',').map(parse_ticks).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticks() {
        assert_eq!(parse_ticks("4"), Ok(4));
        assert_eq!(parse_ticks(" 12 "), Ok(12));
        assert!(parse_ticks("").is_err());
        assert!(parse_ticks("-3").is_err());
        assert!(parse_ticks("2ms").is_err());
    }

    #[test]
    fn test_parse_quanta() {
        assert_eq!(parse_quanta("2,4,8"), Ok(vec![2, 4, 8]));
        assert_eq!(parse_quanta("5"), Ok(vec![5]));
        assert!(parse_quanta("2,,8").is_err());
    }

    #[test]
    fn test_builder() {
        let c = SchedConfig::builder()
            .quantum(3)
            .preemptive(true)
            .queues(vec![1, 2])
            .boost_interval(10)
            .build();
        assert_eq!(c.rr_quantum(), Ok(3));
        assert_eq!(c.mlfq_quanta(), Ok(vec![1, 2]));
        assert_eq!(c.mlfq_boost(), Ok(Some(10)));
        assert!(c.preemptive);
    }

    #[test]
    fn test_checks() {
        let c = SchedConfig::default();
        assert_eq!(c.rr_quantum(), Err(ConfigError::MissingQuantum));
        assert_eq!(c.mlfq_quanta(), Ok(DEFAULT_MLFQ_QUANTA.to_vec()));
        assert_eq!(c.mlfq_boost(), Ok(None));

        let c = SchedConfig::builder().quantum(0).queues(vec![2, 0]).boost_interval(0).build();
        assert_eq!(c.rr_quantum(), Err(ConfigError::InvalidQuantum { level: None }));
        assert_eq!(c.mlfq_quanta(), Err(ConfigError::InvalidQuantum { level: Some(1) }));
        assert_eq!(c.mlfq_boost(), Err(ConfigError::InvalidBoostInterval));

        let c = SchedConfig::builder().queues(vec![]).build();
        assert_eq!(c.mlfq_quanta(), Err(ConfigError::EmptyQueues));
    }
}
