/*
Monotone bucket queue used by Dial's algorithm.

One bucket per integer distance in [0, max_dist). A cursor walks the buckets in increasing
order and never moves back, so a whole search costs O(max_dist) cursor steps plus O(1) per
push and pop. Entries are never removed early: a vertex may sit in several buckets at once and
the caller drops the stale copies when they are popped.
*/

use crate::error::EngineError;
use crate::graph::{Cost, VertexId};

/// Distance ceiling used by the tile recipe tooling.
pub const DEFAULT_MAX_DIST: usize = 655_336;

#[derive(Debug)]
pub struct BucketQueue {
    buckets: Vec<Vec<VertexId>>,
    cursor: usize,
    // One past the highest bucket pushed to since the last reset.
    end: usize,
    len: usize,
}

impl BucketQueue {
    pub fn new(max_dist: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); max_dist],
            cursor: 0,
            end: 0,
            len: 0,
        }
    }

    pub fn max_dist(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Queues `vertex` at `distance`, ahead of anything already in that bucket.
    pub fn push(&mut self, vertex: VertexId, distance: u64) -> Result<(), EngineError> {
        let max_dist = self.buckets.len();
        let bucket = match usize::try_from(distance) {
            Ok(d) if d < max_dist => d,
            _ => {
                return Err(EngineError::Capacity {
                    distance,
                    max_dist: max_dist as u64,
                })
            }
        };
        debug_assert!(bucket >= self.cursor, "push at {} behind cursor {}", bucket, self.cursor);
        self.buckets[bucket].push(vertex);
        self.end = self.end.max(bucket + 1);
        self.len += 1;
        Ok(())
    }

    /// Removes the most recently pushed entry of the lowest non-empty bucket at or after the
    /// cursor, returning it with its distance.
    pub fn pop_min(&mut self) -> Option<(VertexId, Cost)> {
        while self.cursor < self.end {
            if let Some(vertex) = self.buckets[self.cursor].pop() {
                self.len -= 1;
                return Some((vertex, self.cursor as Cost));
            }
            self.cursor += 1;
        }
        None
    }

    /// Empties every bucket and rewinds the cursor. Bucket allocations are kept for the next run.
    pub fn reset(&mut self) {
        for bucket in &mut self.buckets[..self.end] {
            bucket.clear();
        }
        self.cursor = 0;
        self.end = 0;
        self.len = 0;
    }
}
