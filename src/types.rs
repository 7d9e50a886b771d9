//! Core identifier and time types shared by every simulator component.

use std::fmt;

use serde::Serialize;

/// Process identifier as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Virtual page number in a reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageId(pub u32);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulated time in abstract ticks.
pub type Time = u64;

/// Convert a slice of raw page numbers into a reference string.
pub fn pages(raw: &[u32]) -> Vec<PageId> {
    raw.iter().copied().map(PageId).collect()
}
