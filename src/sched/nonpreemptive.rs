//! Run-to-completion scheduling by a static key.

use crate::process::Process;
use crate::sched::RunState;

/// Repeatedly pick the arrived process with the smallest `key` and run it
/// to completion.
///
/// Ties go to the earlier arrival, then to the earlier input position.
/// FCFS is this driver with a constant key.
pub(crate) fn run<K: Ord>(st: &mut RunState, key: impl Fn(&Process) -> K) {
    let procs = st.procs();
    let mut ready: Vec<usize> = Vec::new();
    let mut now = 0;

    loop {
        ready.extend(st.admit(now));

        let Some(pos) = ready
            .iter()
            .enumerate()
            .min_by_key(|&(_, &i)| (key(&procs[i]), i))
            .map(|(pos, _)| pos)
        else {
            match st.idle_until_arrival(now) {
                Some(t) => {
                    now = t;
                    continue;
                }
                None => break,
            }
        };

        let i = ready.swap_remove(pos);
        st.dispatch(i, now);
        let end = now + st.remaining(i);
        // Arrivals during the burst are logged before the completion.
        ready.extend(st.admit(end));
        st.run(i, now, end);
        now = end;
        st.complete(i, now);
    }
}
