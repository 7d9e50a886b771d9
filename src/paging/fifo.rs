//! First-in, first-out replacement.

use crate::paging::{oldest, Replacer};
use crate::types::PageId;

/// Evicts the page that has been resident longest. Hits do not count.
pub(crate) struct Fifo {
    loaded_at: Vec<usize>,
}

impl Fifo {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            loaded_at: vec![0; capacity],
        }
    }
}

impl Replacer for Fifo {
    fn on_load(&mut self, slot: usize, step: usize) {
        self.loaded_at[slot] = step;
    }

    fn victim(&mut self, _frames: &[Option<PageId>], _step: usize) -> usize {
        oldest(&self.loaded_at)
    }
}

#[cfg(test)]
mod tests {
    use crate::algorithm::PageAlgorithm;
    use crate::paging::replace;
    use crate::types::{pages, PageId};

    #[test]
    fn test_belady_sequence() {
        let refs = pages(&[1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5]);
        let three = replace(PageAlgorithm::Fifo, &refs, 3).unwrap();
        assert_eq!(three.faults, 9);
        assert_eq!(three.hits, 3);
        // Belady's anomaly: more frames, more faults.
        let four = replace(PageAlgorithm::Fifo, &refs, 4).unwrap();
        assert_eq!(four.faults, 10);
    }

    #[test]
    fn test_hit_does_not_refresh() {
        let run = replace(PageAlgorithm::Fifo, &pages(&[1, 2, 1, 3]), 2).unwrap();
        assert_eq!(run.evictions(), vec![PageId(1)]);
        assert_eq!(run.states[3].frames, vec![Some(PageId(3)), Some(PageId(2))]);
    }
}
