//! Preemptive scheduling by a dynamic key: SRTF, preemptive Priority and
//! EDF.

use crate::process::Process;
use crate::sched::RunState;

/// Run the process with the smallest `key(process, remaining)`, switching
/// only when an arrival has a strictly smaller key than the running one.
///
/// Time advances from event to event: the next arrival or the running
/// process' completion, whichever comes first. Ties among waiting
/// processes go to the earlier arrival.
pub(crate) fn run<K: Ord>(st: &mut RunState, key: impl Fn(&Process, u64) -> K) {
    let procs = st.procs();
    let mut ready: Vec<usize> = Vec::new();
    let mut current: Option<usize> = None;
    let mut now = 0;

    loop {
        ready.extend(st.admit(now));

        let best = ready
            .iter()
            .enumerate()
            .min_by_key(|&(_, &i)| (key(&procs[i], st.remaining(i)), i))
            .map(|(pos, &i)| (pos, i));

        let running = match (current, best) {
            (None, None) => match st.idle_until_arrival(now) {
                Some(t) => {
                    now = t;
                    continue;
                }
                None => break,
            },
            (None, Some((pos, i))) => {
                ready.swap_remove(pos);
                i
            }
            (Some(c), Some((pos, i)))
                if key(&procs[i], st.remaining(i)) < key(&procs[c], st.remaining(c)) =>
            {
                ready.swap_remove(pos);
                st.preempt(c, i, now);
                ready.push(c);
                i
            }
            (Some(c), _) => c,
        };
        current = Some(running);
        st.dispatch(running, now);

        let finish = now + st.remaining(running);
        let until = match st.next_arrival() {
            Some(t) if t < finish => t,
            _ => finish,
        };
        st.run(running, now, until);
        now = until;

        if st.remaining(running) == 0 {
            st.complete(running, now);
            current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::algorithm::CpuAlgorithm;
    use crate::config::SchedConfig;
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
    fn test_srtf_preempts_on_shorter_arrival() {
        let specs = [
            ProcessSpec::new(1, 0, 8),
            ProcessSpec::new(2, 1, 4),
            ProcessSpec::new(3, 2, 9),
            ProcessSpec::new(4, 3, 5),
        ];
        let run = schedule(
            CpuAlgorithm::Sjf { preemptive: true },
            &specs,
            &SchedConfig::default(),
        )
        .unwrap();
        assert_eq!(
            run.timeline.intervals(),
            &[iv(1, 0, 1), iv(2, 1, 5), iv(4, 5, 10), iv(1, 10, 17), iv(3, 17, 26)]
        );
        assert_eq!(run.trace.preemption_count(Pid(1)), 1);
        assert_eq!(run.record(Pid(2)).unwrap().waiting(), 0);
    }

    #[test]
    fn test_equal_remaining_does_not_preempt() {
        let specs = [ProcessSpec::new(1, 0, 4), ProcessSpec::new(2, 1, 3)];
        let run = schedule(
            CpuAlgorithm::Sjf { preemptive: true },
            &specs,
            &SchedConfig::default(),
        )
        .unwrap();
        assert_eq!(run.timeline.intervals(), &[iv(1, 0, 4), iv(2, 4, 7)]);
        assert_eq!(run.trace.summary().preemptions, 0);
    }

    #[test]
    fn test_preemptive_priority_via_config() {
        let specs = [
            ProcessSpec::new(1, 0, 5).priority(3),
            ProcessSpec::new(2, 2, 2).priority(1),
        ];
        let config = SchedConfig::builder().preemptive(true).build();
        let run = schedule(CpuAlgorithm::Priority { preemptive: false }, &specs, &config).unwrap();
        assert_eq!(run.algorithm, CpuAlgorithm::Priority { preemptive: true });
        assert_eq!(run.timeline.intervals(), &[iv(1, 0, 2), iv(2, 2, 4), iv(1, 4, 7)]);
    }

    #[test]
    fn test_edf_orders_by_deadline_and_flags_misses() {
        let specs = [
            ProcessSpec::new(1, 0, 3).deadline(7),
            ProcessSpec::new(2, 1, 4).deadline(6),
            ProcessSpec::new(3, 2, 2).deadline(9),
            ProcessSpec::new(4, 3, 1).deadline(5),
        ];
        let run = schedule(CpuAlgorithm::Edf, &specs, &SchedConfig::default()).unwrap();
        assert_eq!(
            run.timeline.intervals(),
            &[iv(1, 0, 1), iv(2, 1, 3), iv(4, 3, 4), iv(2, 4, 6), iv(1, 6, 8), iv(3, 8, 10)]
        );
        assert_eq!(run.record(Pid(4)).unwrap().deadline_missed, Some(false));
        assert_eq!(run.record(Pid(1)).unwrap().deadline_missed, Some(true));
        assert_eq!(run.record(Pid(3)).unwrap().deadline_missed, Some(true));
        assert_eq!(run.trace.summary().deadline_misses, 2);
    }
}
