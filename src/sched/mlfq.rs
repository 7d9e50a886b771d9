//! Multi-level feedback queue.
//!
//! Level 0 is the highest priority. New arrivals enter level 0; a process
//! that uses its whole quantum without finishing drops one level, and the
//! last level is round robin. A running slice is never interrupted by a
//! higher-level arrival.

use std::collections::VecDeque;

use crate::sched::RunState;
use crate::types::Time;

pub(crate) fn run(st: &mut RunState, quanta: &[Time], boost: Option<Time>) {
    let last = quanta.len() - 1;
    let mut levels: Vec<VecDeque<usize>> = vec![VecDeque::new(); quanta.len()];
    let mut next_boost = boost;
    let mut now = 0;

    loop {
        levels[0].extend(st.admit(now));

        if let (Some(interval), Some(at)) = (boost, next_boost) {
            if now >= at {
                let moved = boost_all(&mut levels);
                st.boost(moved, now);
                // Past the end of the time range no further boost is due.
                next_boost = (now / interval + 1).checked_mul(interval);
            }
        }

        let Some(level) = levels.iter().position(|q| !q.is_empty()) else {
            match st.idle_until_arrival(now) {
                Some(t) => {
                    now = t;
                    continue;
                }
                None => break,
            }
        };
        let Some(i) = levels[level].pop_front() else {
            continue;
        };

        st.dispatch(i, now);
        let end = now + quanta[level].min(st.remaining(i));
        levels[0].extend(st.admit(end));
        st.run(i, now, end);
        now = end;

        if st.remaining(i) == 0 {
            st.complete(i, now);
            continue;
        }

        st.expire(i, now);
        let target = (level + 1).min(last);
        if target != level {
            st.demote(i, target, now);
        }
        levels[target].push_back(i);
    }
}

/// Move every queued process to level 0, keeping level order.
fn boost_all(levels: &mut [VecDeque<usize>]) -> usize {
    let Some((top, lower)) = levels.split_first_mut() else {
        return 0;
    };
    let mut moved = 0;
    for q in lower {
        moved += q.len();
        top.extend(q.drain(..));
    }
    moved
}
