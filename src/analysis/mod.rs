//! Co-occurrence analysis: presence matrices in, node and edge tables out.

pub mod datasets;
pub mod engine;
pub mod error;
pub mod graph_model;
pub mod matrix;
pub mod pipeline;
pub mod settings;
pub mod summary;

pub use datasets::{BUILTIN_DATASETS, DatasetSource, load_matrix};
pub use engine::{
	CooccurrenceEngine, CooccurrenceRecord, HypergeometricEngine, SIGNIFICANCE_THRESHOLD,
};
pub use error::AnalysisError;
pub use graph_model::{
	EDGE_DARK_COLOR, EDGE_LIGHT_COLOR, Edge, GraphModel, NODE_COLOR, Node, build_graph_model,
};
pub use matrix::PresenceMatrix;
pub use pipeline::{PipelineOutput, run_pipeline};
pub use settings::{AnalysisSettings, CUSTOM_DATASET};
pub use summary::{Association, Summary};
