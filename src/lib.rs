//! All-pairs cheapest tile-conversion recipes.
//!
//! A graph of tiles connected by integer-cost recipes is searched once per
//! source vertex with Dial's bucket-queue variant of Dijkstra, and the
//! per-source results are assembled into a dense `V x V` matrix of
//! [`DistanceRecord`]s.

pub mod all_pairs;
pub mod bucket_queue;
pub mod dial;
pub mod dijkstra;
pub mod error;
pub mod graph;
pub mod graph_io;
pub mod logging;
pub mod result_io;

pub use all_pairs::{compute_all_pairs, Algorithm, EngineOptions, PathStep, ResultMatrix};
pub use bucket_queue::{BucketQueue, DEFAULT_MAX_DIST};
pub use dial::DialSearch;
pub use dijkstra::HeapSearch;
pub use error::{EngineError, GraphError};
pub use graph::{Cost, DistanceRecord, Edge, Graph, RecipeId, VertexId, INFINITY};
pub use logging::init_logging;

/// A reusable single-source search. Implementations own their scratch state
/// and reset it at the start of every `run`.
pub trait ShortestPathEngine {
    fn run(&mut self, graph: &Graph, source: VertexId) -> Result<&[DistanceRecord], EngineError>;
}
