//! Graph files.
//!
//! The binary layout is little-endian `u32`s throughout: the vertex count `V`, then `V` edge
//! counts in vertex order, then for each vertex its edges as `(target, cost, recipe)` triples.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use fnv::FnvHashMap;
use log::{info, warn};

use crate::graph::{Edge, Graph, VertexId};

// Counts in the header are untrusted until the data behind them has been read.
const MAX_PREALLOC: usize = 1 << 16;

fn read_u32<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Reads a graph in the binary layout. A short file or an edge pointing past the last vertex
/// is an error.
pub fn read_graph<R: Read>(mut reader: R) -> Result<Graph> {
    let vertex_count = read_u32(&mut reader).context("reading vertex count")? as usize;

    let mut edge_counts = Vec::with_capacity(vertex_count.min(MAX_PREALLOC));
    for vertex in 0..vertex_count {
        let count = read_u32(&mut reader)
            .with_context(|| format!("reading edge count of vertex {}", vertex))?;
        edge_counts.push(count as usize);
    }

    let mut adjacency = Vec::with_capacity(edge_counts.len());
    for (vertex, &count) in edge_counts.iter().enumerate() {
        let mut edges = Vec::with_capacity(count.min(MAX_PREALLOC));
        for i in 0..count {
            let mut record = [0u8; 12];
            reader
                .read_exact(&mut record)
                .with_context(|| format!("reading edge {} of vertex {}", i, vertex))?;
            let field = |at: usize| {
                u32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
            };
            edges.push(Edge::new(field(0), field(4), field(8)));
        }
        adjacency.push(edges);
    }

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).context("reading past last edge")?;
    if !rest.is_empty() {
        warn!("Ignoring {} trailing bytes after the last edge", rest.len());
    }

    Ok(Graph::from_adjacency(adjacency)?)
}

pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening graph {}", path.display()))?;
    let graph = read_graph(BufReader::new(file))
        .with_context(|| format!("loading graph {}", path.display()))?;
    info!(
        "Loaded graph consisting of {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok(graph)
}

pub fn write_graph<W: Write>(mut writer: W, graph: &Graph) -> Result<()> {
    writer.write_all(&(graph.vertex_count() as u32).to_le_bytes())?;
    for vertex in graph.vertices() {
        writer.write_all(&(graph.edges(vertex).len() as u32).to_le_bytes())?;
    }
    for vertex in graph.vertices() {
        for edge in graph.edges(vertex) {
            writer.write_all(&edge.target.to_le_bytes())?;
            writer.write_all(&edge.cost.to_le_bytes())?;
            writer.write_all(&edge.recipe.to_le_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn save_graph<P: AsRef<Path>>(path: P, graph: &Graph) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating graph {}", path.display()))?;
    write_graph(BufWriter::new(file), graph).with_context(|| format!("writing graph {}", path.display()))
}

/// A graph whose vertices carry the names they had in a CSV edge list.
#[derive(Clone, Debug)]
pub struct LabeledGraph {
    pub graph: Graph,
    pub labels: Vec<String>,
}

/// Reads an edge list with a `from,to,cost,recipe` header row. Vertex names are arbitrary
/// strings and get dense ids in order of first appearance.
pub fn read_csv_graph<R: Read>(reader: R) -> Result<LabeledGraph> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true) // important: skip header line
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut id_to_idx: FnvHashMap<String, VertexId> = FnvHashMap::default();
    let mut labels: Vec<String> = Vec::new();
    let mut intern = |name: &str| -> VertexId {
        if let Some(&idx) = id_to_idx.get(name) {
            return idx;
        }
        let idx = labels.len() as VertexId;
        labels.push(name.to_string());
        id_to_idx.insert(name.to_string(), idx);
        idx
    };

    let mut edges = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() != 4 {
            bail!("row {}: expected 4 fields, found {}", line + 1, record.len());
        }
        let from = intern(&record[0]);
        let to = intern(&record[1]);
        let cost: u32 = record[2]
            .parse()
            .with_context(|| format!("row {}: bad cost {:?}", line + 1, &record[2]))?;
        let recipe: u32 = record[3]
            .parse()
            .with_context(|| format!("row {}: bad recipe {:?}", line + 1, &record[3]))?;
        edges.push((from, Edge::new(to, cost, recipe)));
    }

    let graph = Graph::from_edges(labels.len(), edges)?;
    Ok(LabeledGraph { graph, labels })
}

pub fn load_csv_graph<P: AsRef<Path>>(path: P) -> Result<LabeledGraph> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening CSV {}", path.display()))?;
    let labeled = read_csv_graph(file).with_context(|| format!("loading CSV {}", path.display()))?;
    info!(
        "Loaded graph consisting of {} vertices and {} edges",
        labeled.graph.vertex_count(),
        labeled.graph.edge_count()
    );
    Ok(labeled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn reads_binary_layout() {
        // 3 vertices; vertex 0 has two edges, vertex 1 one, vertex 2 none.
        let bytes = words(&[3, 2, 1, 0, 1, 5, 10, 2, 100, 12, 2, 3, 11]);
        let graph = read_graph(bytes.as_slice()).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edges(0), &[Edge::new(1, 5, 10), Edge::new(2, 100, 12)]);
        assert_eq!(graph.edges(1), &[Edge::new(2, 3, 11)]);
        assert!(graph.edges(2).is_empty());
    }

    #[test]
    fn truncated_file_is_an_error() {
        let bytes = words(&[2, 1, 0, 1, 5]);
        let err = read_graph(bytes.as_slice()).unwrap_err();
        assert!(format!("{:#}", err).contains("reading edge 0 of vertex 0"));

        let err = read_graph(&[1u8, 0][..]).unwrap_err();
        assert!(format!("{:#}", err).contains("vertex count"));
    }

    #[test]
    fn oversized_header_counts_fail_cleanly() {
        let err = read_graph(words(&[u32::MAX]).as_slice()).unwrap_err();
        assert!(format!("{:#}", err).contains("reading edge count of vertex 0"));

        let err = read_graph(words(&[1, u32::MAX]).as_slice()).unwrap_err();
        assert!(format!("{:#}", err).contains("reading edge 0 of vertex 0"));
    }

    #[test]
    fn out_of_range_target_is_an_error() {
        let bytes = words(&[1, 1, 4, 1, 0]);
        assert!(read_graph(bytes.as_slice()).is_err());
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = words(&[1, 0]);
        bytes.extend_from_slice(&[0xff, 0xff]);
        let graph = read_graph(bytes.as_slice()).unwrap();
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn saved_graph_loads_back() {
        let graph = Graph::from_edges(
            4,
            vec![(0, Edge::new(3, 9, 1)), (2, Edge::new(0, 0, 7)), (0, Edge::new(1, 2, 4))],
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph");
        save_graph(&path, &graph).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4 * (1 + 4) + 12 * 3);
        assert_eq!(load_graph(&path).unwrap(), graph);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_graph("/definitely/not/here/graph").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/graph"));
    }

    #[test]
    fn csv_labels_are_interned_in_order() {
        let data = "from,to,cost,recipe\n\
                    block 0 0,blinker 1 1,3,0\n\
                    blinker 1 1,beehive 2 0, 4 ,1\n\
                    block 0 0,beehive 2 0,9,2\n";
        let labeled = read_csv_graph(data.as_bytes()).unwrap();
        assert_eq!(labeled.labels, vec!["block 0 0", "blinker 1 1", "beehive 2 0"]);
        assert_eq!(labeled.graph.edges(0), &[Edge::new(1, 3, 0), Edge::new(2, 9, 2)]);
        assert_eq!(labeled.graph.edges(1), &[Edge::new(2, 4, 1)]);
    }

    #[test]
    fn csv_bad_cost_is_an_error() {
        let data = "from,to,cost,recipe\na,b,-1,0\n";
        let err = read_csv_graph(data.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("bad cost"));
    }
}
