use algosim::{ProcessSpec, SchedConfig, SimFormat};

/// Initialize tracing from `RUST_LOG` with simulated-time output.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .event_format(SimFormat)
        .with_test_writer()
        .try_init();
}

/// Shorthand for a config with only a Round Robin quantum.
#[allow(dead_code)]
pub fn rr(quantum: u64) -> SchedConfig {
    SchedConfig::builder().quantum(quantum).build()
}

/// Shorthand for `(pid, arrival, burst)` triples.
#[allow(dead_code)]
pub fn procs(triples: &[(u32, i64, i64)]) -> Vec<ProcessSpec> {
    triples
        .iter()
        .map(|&(pid, arrival, burst)| ProcessSpec::new(pid, arrival, burst))
        .collect()
}
