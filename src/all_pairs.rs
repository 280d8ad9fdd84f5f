use std::time::Instant;

use clap::ValueEnum;
use log::{debug, info};

use crate::bucket_queue::DEFAULT_MAX_DIST;
use crate::dial::DialSearch;
use crate::dijkstra::HeapSearch;
use crate::error::EngineError;
use crate::graph::{DistanceRecord, Graph, RecipeId, VertexId};
use crate::ShortestPathEngine;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Bucket-queue Dijkstra, bounded by `max_dist`
    #[default]
    Dial,
    /// Binary-heap Dijkstra, no distance ceiling
    Dijkstra,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    pub algorithm: Algorithm,
    /// Number of buckets in the Dial queue. Every finite distance stays below it.
    pub max_dist: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Dial,
            max_dist: DEFAULT_MAX_DIST,
        }
    }
}

impl EngineOptions {
    fn engine(&self, vertex_count: usize) -> Box<dyn ShortestPathEngine> {
        match self.algorithm {
            Algorithm::Dial => Box::new(DialSearch::new(vertex_count, self.max_dist)),
            Algorithm::Dijkstra => Box::new(HeapSearch::new(vertex_count)),
        }
    }
}

/// One edge on a reconstructed path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub from: VertexId,
    pub to: VertexId,
    pub recipe: RecipeId,
}

/// Dense `V x V` grid of records; row `s` holds the search from source `s`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultMatrix {
    vertex_count: usize,
    records: Vec<DistanceRecord>,
}

impl ResultMatrix {
    /// Wraps row-major records. Returns `None` unless there are exactly `vertex_count²` of them.
    pub fn from_records(vertex_count: usize, records: Vec<DistanceRecord>) -> Option<Self> {
        (vertex_count.checked_mul(vertex_count) == Some(records.len())).then_some(Self {
            vertex_count,
            records,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn records(&self) -> &[DistanceRecord] {
        &self.records
    }

    pub fn row(&self, source: VertexId) -> &[DistanceRecord] {
        let start = source as usize * self.vertex_count;
        &self.records[start..start + self.vertex_count]
    }

    pub fn get(&self, source: VertexId, target: VertexId) -> &DistanceRecord {
        &self.row(source)[target as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[DistanceRecord]> {
        self.records.chunks(self.vertex_count.max(1))
    }

    /// Edges of the cheapest path from `source` to `target`, in travel order.
    ///
    /// Walks predecessor links back from `target`. Returns `None` if the pair is unreachable or
    /// the links do not lead back to `source` within `V` steps.
    pub fn path(&self, source: VertexId, target: VertexId) -> Option<Vec<PathStep>> {
        let row = self.row(source);
        if !row.get(target as usize)?.is_reachable() {
            return None;
        }
        let mut steps = Vec::new();
        let mut current = target;
        while current != source {
            if steps.len() >= self.vertex_count {
                return None;
            }
            let record = row.get(current as usize)?;
            let (from, recipe) = (record.predecessor?, record.recipe?);
            steps.push(PathStep {
                from,
                to: current,
                recipe,
            });
            current = from;
        }
        steps.reverse();
        Some(steps)
    }
}

/// Runs one single-source search per vertex, in increasing source order, and assembles the
/// results into a matrix. Any failing run fails the whole computation.
pub fn compute_all_pairs(graph: &Graph, options: EngineOptions) -> Result<ResultMatrix, EngineError> {
    let n = graph.vertex_count();
    let mut engine = options.engine(n);
    let mut records = Vec::with_capacity(n * n);

    let now = Instant::now();
    for source in graph.vertices() {
        let row = engine.run(graph, source)?;
        records.extend_from_slice(row);
        if (source as usize + 1) % 1024 == 0 {
            debug!("Finished {} of {} sources", source as usize + 1, n);
        }
    }
    info!(
        "Computed {}x{} recipe matrix with {:?} in {:.3} s",
        n,
        n,
        options.algorithm,
        now.elapsed().as_secs_f64()
    );

    Ok(ResultMatrix {
        vertex_count: n,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Cost, Edge};

    fn graph(vertex_count: usize, edges: &[(VertexId, VertexId, Cost, RecipeId)]) -> Graph {
        Graph::from_edges(
            vertex_count,
            edges
                .iter()
                .map(|&(from, to, cost, recipe)| (from, Edge::new(to, cost, recipe))),
        )
        .unwrap()
    }

    fn tile_graph() -> Graph {
        graph(
            6,
            &[
                (0, 1, 5, 10),
                (1, 2, 3, 11),
                (0, 2, 100, 12),
                (2, 0, 1, 13),
                (2, 4, 2, 14),
                (4, 1, 0, 15),
                (1, 4, 7, 16),
                (4, 2, 6, 17),
            ],
        )
    }

    fn cost_of(graph: &Graph, step: &PathStep) -> Cost {
        graph
            .edges(step.from)
            .iter()
            .filter(|e| e.target == step.to && e.recipe == step.recipe)
            .map(|e| e.cost)
            .min()
            .unwrap()
    }

    #[test]
    fn diagonal_is_zero() {
        let g = tile_graph();
        let matrix = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        assert_eq!(matrix.vertex_count(), 6);
        for v in g.vertices() {
            assert_eq!(*matrix.get(v, v), DistanceRecord::SOURCE);
        }
    }

    #[test]
    fn three_vertex_example() {
        let g = graph(3, &[(0, 1, 5, 10), (1, 2, 3, 11), (0, 2, 100, 12)]);
        let matrix = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        let to_two = matrix.get(0, 2);
        assert_eq!(to_two.value, 8);
        assert_eq!(to_two.predecessor, Some(1));
        assert_eq!(to_two.recipe, Some(11));
        assert_eq!(matrix.get(0, 1).value, 5);
        assert_eq!(matrix.get(0, 1).recipe, Some(10));
        assert!(!matrix.get(2, 0).is_reachable());
    }

    #[test]
    fn isolated_vertex_is_unreachable_both_ways() {
        let g = tile_graph();
        let matrix = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        for x in (0..6).filter(|&x| x != 3) {
            assert_eq!(*matrix.get(x, 3), DistanceRecord::UNREACHED);
            assert_eq!(*matrix.get(3, x), DistanceRecord::UNREACHED);
            assert_eq!(matrix.path(x, 3), None);
        }
    }

    #[test]
    fn triangle_inequality_holds() {
        let g = tile_graph();
        let matrix = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        for s in g.vertices() {
            for t in g.vertices() {
                for u in g.vertices() {
                    let (st, su, ut) = (matrix.get(s, t), matrix.get(s, u), matrix.get(u, t));
                    if st.is_reachable() && su.is_reachable() && ut.is_reachable() {
                        assert!(st.value <= su.value + ut.value, "{} {} {}", s, t, u);
                    }
                }
            }
        }
    }

    #[test]
    fn paths_sum_to_reported_distance() {
        let g = tile_graph();
        let matrix = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        for s in g.vertices() {
            for t in g.vertices() {
                let record = matrix.get(s, t);
                match matrix.path(s, t) {
                    Some(steps) => {
                        assert!(record.is_reachable());
                        if let Some(first) = steps.first() {
                            assert_eq!(first.from, s);
                        }
                        if let Some(last) = steps.last() {
                            assert_eq!(last.to, t);
                            assert_eq!(Some(last.recipe), record.recipe);
                        }
                        let total: Cost = steps.iter().map(|step| cost_of(&g, step)).sum();
                        assert_eq!(total, record.value);
                    }
                    None => assert!(!record.is_reachable()),
                }
            }
        }
        assert_eq!(
            matrix.path(0, 4),
            Some(vec![
                PathStep { from: 0, to: 1, recipe: 10 },
                PathStep { from: 1, to: 2, recipe: 11 },
                PathStep { from: 2, to: 4, recipe: 14 },
            ])
        );
        assert_eq!(matrix.path(2, 2), Some(vec![]));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let g = tile_graph();
        let first = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        let second = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn engines_agree_on_distances() {
        let g = tile_graph();
        let dial = compute_all_pairs(&g, EngineOptions::default()).unwrap();
        let heap = compute_all_pairs(
            &g,
            EngineOptions {
                algorithm: Algorithm::Dijkstra,
                ..EngineOptions::default()
            },
        )
        .unwrap();
        let values = |m: &ResultMatrix| m.records().iter().map(|r| r.value).collect::<Vec<_>>();
        assert_eq!(values(&dial), values(&heap));
    }

    #[test]
    fn capacity_error_fails_everything() {
        let g = tile_graph();
        let result = compute_all_pairs(
            &g,
            EngineOptions {
                algorithm: Algorithm::Dial,
                max_dist: 8,
            },
        );
        assert!(matches!(result, Err(EngineError::Capacity { max_dist: 8, .. })));
    }

    #[test]
    fn empty_graph_gives_empty_matrix() {
        let matrix = compute_all_pairs(&Graph::default(), EngineOptions::default()).unwrap();
        assert_eq!(matrix.vertex_count(), 0);
        assert!(matrix.records().is_empty());
        assert_eq!(matrix.rows().count(), 0);
    }

    #[test]
    fn from_records_checks_shape() {
        assert!(ResultMatrix::from_records(2, vec![DistanceRecord::SOURCE; 3]).is_none());
        let matrix = ResultMatrix::from_records(2, vec![DistanceRecord::UNREACHED; 4]).unwrap();
        assert_eq!(matrix.rows().count(), 2);
    }
}
