//! Page replacement engine.
//!
//! A single driver walks the reference string over a fixed set of frame
//! slots. Empty slots are filled lowest first; once every slot is in use,
//! the algorithm's [`Replacer`] picks the slot to evict.

mod clock;
mod fifo;
mod lru;
mod optimal;

use serde::Serialize;
use tracing::{debug, info};

use crate::algorithm::PageAlgorithm;
use crate::error::{ConfigError, SimError};
use crate::metrics::{self, MetricsReport};
use crate::process::ProcessSpec;
use crate::types::PageId;

/// A reference string and the number of frames available to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagingWorkload {
    pub references: Vec<PageId>,
    pub frame_capacity: usize,
}

impl PagingWorkload {
    pub fn new(references: Vec<PageId>, frame_capacity: usize) -> Self {
        Self {
            references,
            frame_capacity,
        }
    }

    /// Concatenate each process' memory pages, in the order given.
    pub fn from_processes(processes: &[ProcessSpec], frame_capacity: usize) -> Self {
        let references = processes
            .iter()
            .flat_map(|p| p.memory_pages.iter().copied())
            .collect();
        Self::new(references, frame_capacity)
    }
}

/// Frame contents after one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameState {
    pub step: usize,
    pub page: PageId,
    pub hit: bool,
    /// Slot contents in slot order; `None` is an empty slot.
    pub frames: Vec<Option<PageId>>,
    pub evicted: Option<PageId>,
}

impl FrameState {
    /// Pages currently resident, in slot order.
    pub fn resident(&self) -> impl Iterator<Item = PageId> + '_ {
        self.frames.iter().flatten().copied()
    }
}

/// Everything produced by one page replacement run.
#[derive(Debug, Clone, Serialize)]
pub struct PagingRun {
    pub algorithm: PageAlgorithm,
    pub frame_capacity: usize,
    pub states: Vec<FrameState>,
    pub hits: usize,
    pub faults: usize,
    pub metrics: MetricsReport,
}

impl PagingRun {
    /// Hit (`true`) or fault (`false`) for every reference.
    pub fn hit_pattern(&self) -> Vec<bool> {
        self.states.iter().map(|s| s.hit).collect()
    }

    /// Pages evicted over the run, in order.
    pub fn evictions(&self) -> Vec<PageId> {
        self.states.iter().filter_map(|s| s.evicted).collect()
    }
}

/// Replacement policy hooks called by the driver.
///
/// Slots are frame indices in `0..capacity`.
pub(crate) trait Replacer {
    /// The page in `slot` was referenced again.
    fn on_hit(&mut self, _slot: usize, _step: usize) {}

    /// A page was loaded into `slot`.
    fn on_load(&mut self, slot: usize, step: usize);

    /// Pick the slot to evict. Only called when every slot is occupied.
    fn victim(&mut self, frames: &[Option<PageId>], step: usize) -> usize;
}

/// Run a page replacement algorithm over `references`.
pub fn replace(
    algorithm: PageAlgorithm,
    references: &[PageId],
    frame_capacity: usize,
) -> Result<PagingRun, SimError> {
    if frame_capacity == 0 {
        return Err(ConfigError::ZeroFrameCapacity.into());
    }

    let mut replacer: Box<dyn Replacer + '_> = match algorithm {
        PageAlgorithm::Fifo => Box::new(fifo::Fifo::new(frame_capacity)),
        PageAlgorithm::Lru => Box::new(lru::Lru::new(frame_capacity)),
        PageAlgorithm::Optimal => Box::new(optimal::Optimal::new(references)),
        PageAlgorithm::Clock => Box::new(clock::Clock::new(frame_capacity)),
    };

    let (states, hits, faults) = drive(replacer.as_mut(), references, frame_capacity);
    info!(
        algorithm = algorithm.label(),
        frames = frame_capacity,
        references = references.len(),
        faults,
        "paging complete"
    );

    Ok(PagingRun {
        algorithm,
        frame_capacity,
        states,
        hits,
        faults,
        metrics: metrics::paging_report(hits, faults),
    })
}

/// Parse `name` and run it. See [`replace`].
pub fn replace_named(
    name: &str,
    references: &[PageId],
    frame_capacity: usize,
) -> Result<PagingRun, SimError> {
    replace(PageAlgorithm::resolve(name)?, references, frame_capacity)
}

fn drive<R: Replacer + ?Sized>(
    replacer: &mut R,
    references: &[PageId],
    capacity: usize,
) -> (Vec<FrameState>, usize, usize) {
    let mut frames: Vec<Option<PageId>> = vec![None; capacity];
    let mut states = Vec::with_capacity(references.len());
    let (mut hits, mut faults) = (0, 0);

    for (step, &page) in references.iter().enumerate() {
        let (hit, evicted) = match frames.iter().position(|f| *f == Some(page)) {
            Some(slot) => {
                hits += 1;
                replacer.on_hit(slot, step);
                (true, None)
            }
            None => {
                faults += 1;
                let slot = match frames.iter().position(Option::is_none) {
                    Some(slot) => slot,
                    None => replacer.victim(&frames, step),
                };
                let evicted = frames[slot].replace(page);
                replacer.on_load(slot, step);
                debug!(step, %page, slot, evicted = ?evicted, "page fault");
                (false, evicted)
            }
        };

        states.push(FrameState {
            step,
            page,
            hit,
            frames: frames.clone(),
            evicted,
        });
    }

    (states, hits, faults)
}

/// Index of the smallest stamp; the lowest slot wins ties.
pub(crate) fn oldest(stamps: &[usize]) -> usize {
    stamps
        .iter()
        .enumerate()
        .min_by_key(|&(slot, &stamp)| (stamp, slot))
        .map_or(0, |(slot, _)| slot)
}
