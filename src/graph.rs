use crate::error::GraphError;

pub type VertexId = u32;
pub type Cost = u32;
pub type RecipeId = u32;

/// Distance of a vertex the search never reached. Larger than any distance
/// either engine can finalize.
pub const INFINITY: Cost = Cost::MAX;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub target: VertexId,
    pub cost: Cost,
    pub recipe: RecipeId,
}

impl Edge {
    pub fn new(target: VertexId, cost: Cost, recipe: RecipeId) -> Self {
        Self { target, cost, recipe }
    }
}

/// Best known way of reaching a vertex from the current source: total cost,
/// the vertex it was reached from and the recipe on that last edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DistanceRecord {
    pub value: Cost,
    pub predecessor: Option<VertexId>,
    pub recipe: Option<RecipeId>,
}

impl DistanceRecord {
    pub const UNREACHED: DistanceRecord = DistanceRecord {
        value: INFINITY,
        predecessor: None,
        recipe: None,
    };

    pub const SOURCE: DistanceRecord = DistanceRecord {
        value: 0,
        predecessor: None,
        recipe: None,
    };

    pub fn is_reachable(&self) -> bool {
        self.value != INFINITY
    }

    /// Value widened for relaxation comparisons, with unreached vertices above
    /// every candidate.
    pub(crate) fn comparable(&self) -> u64 {
        if self.is_reachable() {
            u64::from(self.value)
        } else {
            u64::MAX
        }
    }
}

impl Default for DistanceRecord {
    fn default() -> Self {
        Self::UNREACHED
    }
}

/// Directed graph with a fixed vertex count and per-vertex outgoing edge lists.
/// Read-only once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Builds a graph from per-vertex edge lists, rejecting edges that point
    /// past the last vertex.
    pub fn from_adjacency(adjacency: Vec<Vec<Edge>>) -> Result<Self, GraphError> {
        let vertex_count = adjacency.len();
        if VertexId::try_from(vertex_count).is_err() {
            return Err(GraphError::TooManyVertices(vertex_count));
        }
        for (from, edges) in adjacency.iter().enumerate() {
            if let Some(edge) = edges.iter().find(|e| e.target as usize >= vertex_count) {
                return Err(GraphError::TargetOutOfRange {
                    from: from as VertexId,
                    target: edge.target,
                    vertex_count,
                });
            }
        }
        Ok(Self { adjacency })
    }

    /// Builds a graph of `vertex_count` vertices from `(from, edge)` pairs.
    /// Edges keep their relative order within each source vertex.
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (VertexId, Edge)>,
    {
        let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); vertex_count];
        for (from, edge) in edges {
            match adjacency.get_mut(from as usize) {
                Some(list) => list.push(edge),
                None => {
                    return Err(GraphError::TargetOutOfRange {
                        from,
                        target: edge.target,
                        vertex_count,
                    })
                }
            }
        }
        Self::from_adjacency(adjacency)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn edges(&self, vertex: VertexId) -> &[Edge] {
        &self.adjacency[vertex as usize]
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        0..self.adjacency.len() as VertexId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_edges_keeps_adjacency_order() {
        let graph = Graph::from_edges(
            3,
            vec![
                (0, Edge::new(2, 4, 7)),
                (1, Edge::new(0, 1, 8)),
                (0, Edge::new(1, 2, 9)),
            ],
        )
        .unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges(0), &[Edge::new(2, 4, 7), Edge::new(1, 2, 9)]);
        assert!(graph.edges(2).is_empty());
    }

    #[test]
    fn rejects_edge_past_last_vertex() {
        let err = Graph::from_edges(2, vec![(0, Edge::new(5, 1, 0))]).unwrap_err();
        assert_eq!(
            err,
            GraphError::TargetOutOfRange {
                from: 0,
                target: 5,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn unreached_compares_above_everything() {
        assert!(!DistanceRecord::UNREACHED.is_reachable());
        assert!(DistanceRecord::UNREACHED.comparable() > u64::from(Cost::MAX));
        assert_eq!(DistanceRecord::SOURCE.comparable(), 0);
    }
}
