use crate::graph::VertexId;

/// Failures raised by the search engines.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("path cost {distance} reaches the distance ceiling {max_dist}")]
    Capacity { distance: u64, max_dist: u64 },

    #[error("source vertex {vertex} out of range for a graph of {vertex_count} vertices")]
    SourceOutOfRange { vertex: VertexId, vertex_count: usize },

    #[error("search state sized for {expected} vertices but the graph has {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Failures raised while assembling a graph.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge {from} -> {target} points outside a graph of {vertex_count} vertices")]
    TargetOutOfRange {
        from: VertexId,
        target: VertexId,
        vertex_count: usize,
    },

    #[error("vertex count {0} does not fit in a 32-bit vertex id")]
    TooManyVertices(usize),
}
