//! Clock (second chance) replacement.

use crate::paging::Replacer;
use crate::types::PageId;

/// Circular scan over slots with one reference bit each.
///
/// Loading or hitting a page sets its bit. To find a victim the hand
/// clears set bits as it passes them and stops at the first clear one;
/// that slot is evicted and the hand moves one past it.
pub(crate) struct Clock {
    referenced: Vec<bool>,
    hand: usize,
}

impl Clock {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            referenced: vec![false; capacity],
            hand: 0,
        }
    }
}

impl Replacer for Clock {
    fn on_hit(&mut self, slot: usize, _step: usize) {
        self.referenced[slot] = true;
    }

    fn on_load(&mut self, slot: usize, _step: usize) {
        self.referenced[slot] = true;
    }

    fn victim(&mut self, _frames: &[Option<PageId>], _step: usize) -> usize {
        let n = self.referenced.len();
        // Terminates within two sweeps: the first clears every bit.
        while self.referenced[self.hand] {
            self.referenced[self.hand] = false;
            self.hand = (self.hand + 1) % n;
        }
        let victim = self.hand;
        self.hand = (self.hand + 1) % n;
        victim
    }
}
