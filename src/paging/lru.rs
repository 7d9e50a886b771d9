//! Least-recently-used replacement.

use crate::paging::{oldest, Replacer};
use crate::types::PageId;

pub(crate) struct Lru {
    last_used: Vec<usize>,
}

impl Lru {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            last_used: vec![0; capacity],
        }
    }
}

impl Replacer for Lru {
    fn on_hit(&mut self, slot: usize, step: usize) {
        self.last_used[slot] = step;
    }

    fn on_load(&mut self, slot: usize, step: usize) {
        self.last_used[slot] = step;
    }

    fn victim(&mut self, _frames: &[Option<PageId>], _step: usize) -> usize {
        oldest(&self.last_used)
    }
}

#[cfg(test)]
mod tests {
    use crate::algorithm::PageAlgorithm;
    use crate::paging::replace;
    use crate::types::{pages, PageId};

    #[test]
    fn test_hit_refreshes_recency() {
        let run = replace(PageAlgorithm::Lru, &pages(&[1, 2, 1, 3]), 2).unwrap();
        assert_eq!(run.evictions(), vec![PageId(2)]);
        assert_eq!(run.states[3].frames, vec![Some(PageId(1)), Some(PageId(3))]);
    }

    #[test]
    fn test_textbook_string() {
        let refs = pages(&[7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1]);
        let run = replace(PageAlgorithm::Lru, &refs, 3).unwrap();
        assert_eq!(run.faults, 12);
    }
}
