//! Overlap lifecycle: turns per-step contacts into begin/end transitions
//!
//! The tracker keeps the pairs seen overlapping last step and the pairs
//! recorded so far this step. A pair recorded now but absent last step has
//! begun; a pair present last step but not recorded now has ended.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::world::ShapeHandle;

/// Unordered pair of shapes, stored lowest handle first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OverlapPair {
    first: ShapeHandle,
    second: ShapeHandle,
}

impl OverlapPair {
    pub fn new(a: ShapeHandle, b: ShapeHandle) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    #[inline]
    pub fn first(&self) -> ShapeHandle {
        self.first
    }

    #[inline]
    pub fn second(&self) -> ShapeHandle {
        self.second
    }

    pub fn contains(&self, handle: ShapeHandle) -> bool {
        self.first == handle || self.second == handle
    }

    /// The partner of `handle` in this pair
    pub fn other(&self, handle: ShapeHandle) -> Option<ShapeHandle> {
        if handle == self.first {
            Some(self.second)
        } else if handle == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Begin or end of an overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapKind {
    Begin,
    End,
}

/// Notification for one shape about one partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapEvent {
    pub kind: OverlapKind,
    /// Shape being notified
    pub shape: ShapeHandle,
    /// The shape it started or stopped overlapping
    pub other: ShapeHandle,
}

impl OverlapEvent {
    pub fn begin(shape: ShapeHandle, other: ShapeHandle) -> Self {
        Self {
            kind: OverlapKind::Begin,
            shape,
            other,
        }
    }

    pub fn end(shape: ShapeHandle, other: ShapeHandle) -> Self {
        Self {
            kind: OverlapKind::End,
            shape,
            other,
        }
    }
}

/// Previous/current overlap sets for the lifetime of a world
#[derive(Debug, Clone, Default)]
pub struct OverlapTracker {
    previous: BTreeSet<OverlapPair>,
    current: BTreeSet<OverlapPair>,
}

impl OverlapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting a new step's overlaps
    pub fn begin_step(&mut self) {
        self.current.clear();
    }

    /// Record a pair as overlapping this step
    ///
    /// Returns true exactly once per NotOverlapping -> Overlapping
    /// transition: the first time the pair is recorded in a step where it
    /// was not overlapping the step before.
    pub fn record(&mut self, pair: OverlapPair) -> bool {
        self.current.insert(pair) && !self.previous.contains(&pair)
    }

    /// Close the step: returns the pairs that stopped overlapping and makes
    /// the current set the new previous set
    pub fn finish_step(&mut self) -> Vec<OverlapPair> {
        let ended: Vec<OverlapPair> = self.previous.difference(&self.current).copied().collect();
        self.previous = std::mem::take(&mut self.current);
        ended
    }

    /// True if the pair overlapped in the last finished step
    pub fn is_overlapping(&self, pair: &OverlapPair) -> bool {
        self.previous.contains(pair)
    }

    /// Pairs that overlapped in the last finished step, in handle order
    pub fn pairs(&self) -> impl Iterator<Item = &OverlapPair> {
        self.previous.iter()
    }

    /// Partners of `handle` in the last finished step
    pub fn partners(&self, handle: ShapeHandle) -> impl Iterator<Item = ShapeHandle> + '_ {
        self.previous.iter().filter_map(move |p| p.other(handle))
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}
