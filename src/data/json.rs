//! JSON file handling for graph data

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::data::GraphData;

/// Failures at the ingestion boundary
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("graph file not found: {0}")]
    NotFound(String),

    #[error("failed to read graph file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse graph file")]
    Parse(#[from] serde_json::Error),
}

/// Load a graph document produced by the upstream data layer
pub fn load_graph_data(path: &str) -> Result<GraphData, DataError> {
    log::info!("Reading graph file: {}", path);

    if !Path::new(path).exists() {
        return Err(DataError::NotFound(path.to_string()));
    }

    let file = File::open(path)?;
    let data: GraphData = serde_json::from_reader(BufReader::new(file))?;

    log::info!(
        "Loaded {} nodes and {} edges",
        data.nodes.len(),
        data.edges.len()
    );

    Ok(data)
}
