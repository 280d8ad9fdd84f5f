// Dial's algorithm: Dijkstra over a bucket queue, for small non-negative integer weights.
use crate::bucket_queue::BucketQueue;
use crate::error::EngineError;
use crate::graph::{DistanceRecord, Graph, VertexId};
use crate::ShortestPathEngine;

/// Scratch state for repeated single-source searches over graphs of one size.
///
/// Records, the finalized set and the queue are reset in place at the start of every run, so a
/// single `DialSearch` can serve all `V` sources of an all-pairs computation without
/// reallocating.
#[derive(Debug)]
pub struct DialSearch {
    records: Vec<DistanceRecord>,
    finalized: Vec<bool>,
    queue: BucketQueue,
}

impl DialSearch {
    pub fn new(vertex_count: usize, max_dist: usize) -> Self {
        Self {
            records: vec![DistanceRecord::UNREACHED; vertex_count],
            finalized: vec![false; vertex_count],
            queue: BucketQueue::new(max_dist),
        }
    }

    pub fn records(&self) -> &[DistanceRecord] {
        &self.records
    }

    fn reset(&mut self, source: VertexId) {
        self.records.fill(DistanceRecord::UNREACHED);
        self.records[source as usize] = DistanceRecord::SOURCE;
        self.finalized.fill(false);
        self.queue.reset();
    }
}

impl ShortestPathEngine for DialSearch {
    fn run(&mut self, graph: &Graph, source: VertexId) -> Result<&[DistanceRecord], EngineError> {
        let vertex_count = self.records.len();
        if graph.vertex_count() != vertex_count {
            return Err(EngineError::SizeMismatch {
                expected: vertex_count,
                actual: graph.vertex_count(),
            });
        }
        if source as usize >= vertex_count {
            return Err(EngineError::SourceOutOfRange {
                vertex: source,
                vertex_count,
            });
        }

        self.reset(source);
        self.queue.push(source, 0)?;

        while let Some((node_id, cost)) = self.queue.pop_min() {
            let node = node_id as usize;
            // Stale entry from a relaxation that was later improved on.
            if self.finalized[node] || cost != self.records[node].value {
                continue;
            }
            self.finalized[node] = true;

            for edge in graph.edges(node_id) {
                let candidate = u64::from(cost) + u64::from(edge.cost);
                let target = edge.target as usize;
                if candidate < self.records[target].comparable() {
                    self.queue.push(edge.target, candidate)?;
                    self.records[target] = DistanceRecord {
                        value: candidate as u32,
                        predecessor: Some(node_id),
                        recipe: Some(edge.recipe),
                    };
                }
            }
        }

        Ok(&self.records)
    }
}
