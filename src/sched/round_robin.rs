//! Round Robin scheduling.

use std::collections::VecDeque;

use crate::sched::RunState;
use crate::types::Time;

/// Serve the ready queue in FIFO order, one quantum at a time.
///
/// A process whose quantum expires goes to the back of the queue, behind
/// everything that arrived during its slice, including arrivals at the
/// instant the quantum expired.
pub(crate) fn run(st: &mut RunState, quantum: Time) {
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut now = 0;

    loop {
        queue.extend(st.admit(now));

        let Some(i) = queue.pop_front() else {
            match st.idle_until_arrival(now) {
                Some(t) => {
                    now = t;
                    continue;
                }
                None => break,
            }
        };

        st.dispatch(i, now);
        let end = now + quantum.min(st.remaining(i));
        queue.extend(st.admit(end));
        st.run(i, now, end);
        now = end;

        if st.remaining(i) == 0 {
            st.complete(i, now);
        } else {
            st.expire(i, now);
            queue.push_back(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::algorithm::CpuAlgorithm;
    use crate::config::SchedConfig;
    use crate::error::{ConfigError, SimError};
    use crate::process::ProcessSpec;
    use crate::sched::schedule;
    use crate::timeline::ExecutionInterval;
    use crate::types::Pid;

    fn iv(pid: u32, start: u64, end: u64) -> ExecutionInterval {
        ExecutionInterval {
            pid: Some(Pid(pid)),
            start,
            end,
        }
    }

    #[test]
    fn test_arrival_at_expiry_goes_first() {
        let specs = [ProcessSpec::new(1, 0, 4), ProcessSpec::new(2, 2, 2)];
        let config = SchedConfig::builder().quantum(2).build();
        let run = schedule(CpuAlgorithm::RoundRobin, &specs, &config).unwrap();
        assert_eq!(run.timeline.intervals(), &[iv(1, 0, 2), iv(2, 2, 4), iv(1, 4, 6)]);
        assert_eq!(run.trace.summary().quantum_expiries, 1);
    }

    #[test]
    fn test_classic_three_process() {
        let specs = [
            ProcessSpec::new(1, 0, 5),
            ProcessSpec::new(2, 1, 3),
            ProcessSpec::new(3, 2, 1),
        ];
        let config = SchedConfig::builder().quantum(2).build();
        let run = schedule(CpuAlgorithm::RoundRobin, &specs, &config).unwrap();
        assert_eq!(
            run.timeline.intervals(),
            &[iv(1, 0, 2), iv(2, 2, 4), iv(3, 4, 5), iv(1, 5, 7), iv(2, 7, 8), iv(1, 8, 9)]
        );
        assert_eq!(run.completion_order(), vec![Pid(3), Pid(2), Pid(1)]);
    }

    #[test]
    fn test_single_process_keeps_cpu() {
        let specs = [ProcessSpec::new(1, 3, 5)];
        let config = SchedConfig::builder().quantum(2).build();
        let run = schedule(CpuAlgorithm::RoundRobin, &specs, &config).unwrap();
        assert_eq!(run.timeline.intervals().len(), 2);
        assert_eq!(run.timeline.intervals()[1], iv(1, 3, 8));
        assert_eq!(run.trace.dispatch_count(Pid(1)), 3);
    }

    #[test]
    fn test_quantum_required() {
        let specs = [ProcessSpec::new(1, 0, 5)];
        assert_eq!(
            schedule(CpuAlgorithm::RoundRobin, &specs, &SchedConfig::default()).unwrap_err(),
            SimError::Config(ConfigError::MissingQuantum)
        );
    }
}
