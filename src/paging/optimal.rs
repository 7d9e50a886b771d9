//! Belady's optimal replacement.

use crate::paging::Replacer;
use crate::types::PageId;

/// Evicts the resident page whose next use lies furthest ahead.
///
/// A page that is never referenced again is evicted first; among several
/// such pages the lowest slot goes.
pub(crate) struct Optimal<'a> {
    references: &'a [PageId],
}

impl<'a> Optimal<'a> {
    pub(crate) fn new(references: &'a [PageId]) -> Self {
        Self { references }
    }

    fn next_use(&self, page: PageId, step: usize) -> Option<usize> {
        self.references[step + 1..]
            .iter()
            .position(|&p| p == page)
    }
}

impl Replacer for Optimal<'_> {
    fn on_load(&mut self, _slot: usize, _step: usize) {}

    fn victim(&mut self, frames: &[Option<PageId>], step: usize) -> usize {
        let mut best: Option<(usize, usize)> = None;
        for (slot, frame) in frames.iter().enumerate() {
            let Some(page) = *frame else {
                continue;
            };
            match self.next_use(page, step) {
                None => return slot,
                Some(d) => {
                    if best.map_or(true, |(furthest, _)| d > furthest) {
                        best = Some((d, slot));
                    }
                }
            }
        }
        best.map_or(0, |(_, slot)| slot)
    }
}
