use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::EngineError;
use crate::graph::{DistanceRecord, Graph, VertexId, INFINITY};
use crate::ShortestPathEngine;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct State {
    cost: u64,
    node_id: VertexId,
}

// Min-heap by cost
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse ordering for min-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node_id.cmp(&self.node_id))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary-heap Dijkstra producing the same records as [`crate::DialSearch`], without a bucket
/// ceiling. Distances only have to stay below [`INFINITY`].
#[derive(Debug, Default)]
pub struct HeapSearch {
    records: Vec<DistanceRecord>,
    finalized: Vec<bool>,
    heap: BinaryHeap<State>,
}

impl HeapSearch {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            records: vec![DistanceRecord::UNREACHED; vertex_count],
            finalized: vec![false; vertex_count],
            heap: BinaryHeap::new(),
        }
    }
}

impl ShortestPathEngine for HeapSearch {
    fn run(&mut self, graph: &Graph, source: VertexId) -> Result<&[DistanceRecord], EngineError> {
        let n = self.records.len();
        if graph.vertex_count() != n {
            return Err(EngineError::SizeMismatch {
                expected: n,
                actual: graph.vertex_count(),
            });
        }
        if source as usize >= n {
            return Err(EngineError::SourceOutOfRange {
                vertex: source,
                vertex_count: n,
            });
        }

        self.records.fill(DistanceRecord::UNREACHED);
        self.finalized.fill(false);
        self.heap.clear();

        self.records[source as usize] = DistanceRecord::SOURCE;
        self.heap.push(State {
            cost: 0,
            node_id: source,
        });

        while let Some(State { cost, node_id }) = self.heap.pop() {
            let node = node_id as usize;
            if self.finalized[node] || cost > self.records[node].comparable() {
                continue;
            }
            self.finalized[node] = true;

            for edge in graph.edges(node_id) {
                let next_cost = cost + u64::from(edge.cost);
                let next = edge.target as usize;
                if next_cost < self.records[next].comparable() {
                    if next_cost >= u64::from(INFINITY) {
                        return Err(EngineError::Capacity {
                            distance: next_cost,
                            max_dist: u64::from(INFINITY),
                        });
                    }
                    self.records[next] = DistanceRecord {
                        value: next_cost as u32,
                        predecessor: Some(node_id),
                        recipe: Some(edge.recipe),
                    };
                    self.heap.push(State {
                        cost: next_cost,
                        node_id: edge.target,
                    });
                }
            }
        }

        Ok(&self.records)
    }
}
