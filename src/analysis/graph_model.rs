//! Node and edge tables derived from a matrix and its notable pairs.

use log::debug;
use serde::{Deserialize, Serialize};

use super::engine::CooccurrenceRecord;
use super::error::{AnalysisError, Result};
use super::matrix::PresenceMatrix;

/// Fill shared by every node.
pub const NODE_COLOR: &str = "#606482";
/// Style for pairs that co-occur less often than expected.
pub const EDGE_LIGHT_COLOR: &str = "#B0B2C1";
/// Style for pairs that co-occur more often than expected.
pub const EDGE_DARK_COLOR: &str = "#3C3F51";

/// One matrix row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
	/// 1-based row position of the item.
	pub id: usize,
	/// Item label from the matrix.
	pub label: String,
	/// Fill colour, always [`NODE_COLOR`].
	pub color: String,
	/// Draw a drop shadow.
	pub shadow: bool,
}

/// An undirected link; `from`/`to` carry no orientation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	/// 1-based position of one endpoint.
	pub from: usize,
	/// 1-based position of the other endpoint.
	pub to: usize,
	/// [`EDGE_LIGHT_COLOR`] or [`EDGE_DARK_COLOR`].
	pub color: String,
	/// Dashed stroke, set exactly for light edges.
	pub dashed: bool,
}

impl Edge {
	/// Endpoints in ascending order.
	pub fn key(&self) -> (usize, usize) {
		(self.from.min(self.to), self.from.max(self.to))
	}

	/// True when the edge joins `a` and `b` in either order.
	pub fn connects(&self, a: usize, b: usize) -> bool {
		self.key() == (a.min(b), a.max(b))
	}

	/// The endpoint opposite `id`, if `id` is an endpoint.
	pub fn other(&self, id: usize) -> Option<usize> {
		if id == self.from {
			Some(self.to)
		} else if id == self.to {
			Some(self.from)
		} else {
			None
		}
	}
}

/// Node and edge tables handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphModel {
	/// One node per matrix row, in row order.
	pub nodes: Vec<Node>,
	/// One edge per notable pair, in record order.
	pub edges: Vec<Edge>,
}

impl GraphModel {
	/// Both tables as pretty-printed JSON.
	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string_pretty(self).map_err(|e| AnalysisError::Export(e.to_string()))
	}

	/// Number of edges touching a node.
	pub fn degree(&self, id: usize) -> usize {
		self.edges.iter().filter(|e| e.other(id).is_some()).count()
	}
}

/// Maps a matrix and its engine records onto node and edge tables.
///
/// Records whose low-side p-value clears `threshold` get the light dashed
/// style; that check runs first, so it also wins when both sides clear.
pub fn build_graph_model(
	matrix: &PresenceMatrix,
	records: &[CooccurrenceRecord],
	threshold: f64,
) -> Result<GraphModel> {
	let nodes: Vec<Node> = matrix
		.items()
		.iter()
		.enumerate()
		.map(|(i, label)| Node {
			id: i + 1,
			label: label.clone(),
			color: NODE_COLOR.to_string(),
			shadow: true,
		})
		.collect();

	let edges = records
		.iter()
		.map(|r| {
			check_reference(matrix, r.first, r.first_name.as_deref())?;
			check_reference(matrix, r.second, r.second_name.as_deref())?;
			let less_than_expected = r.p_low <= threshold;
			Ok(Edge {
				from: r.first,
				to: r.second,
				color: if less_than_expected {
					EDGE_LIGHT_COLOR
				} else {
					EDGE_DARK_COLOR
				}
				.to_string(),
				dashed: less_than_expected,
			})
		})
		.collect::<Result<Vec<_>>>()?;

	debug!("graph model: {} nodes, {} edges", nodes.len(), edges.len());
	Ok(GraphModel { nodes, edges })
}

fn check_reference(matrix: &PresenceMatrix, index: usize, name: Option<&str>) -> Result<()> {
	if index == 0 || index > matrix.item_count() {
		return Err(AnalysisError::UnknownNodeReference {
			index,
			item_count: matrix.item_count(),
		});
	}
	match name {
		Some(name) if matrix.position_of(name) != Some(index) => {
			Err(AnalysisError::MisplacedNodeReference {
				name: name.to_string(),
				index,
			})
		}
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analysis::engine::SIGNIFICANCE_THRESHOLD;

	fn worked_example() -> PresenceMatrix {
		PresenceMatrix::parse("x,s1,s2,s3,s4\nitem 1,1,1,0,0\nitem 2,1,1,0,1\nitem 3,0,0,1,1\n")
			.unwrap()
	}

	fn edge(from: usize, to: usize, color: &str, dashed: bool) -> Edge {
		Edge {
			from,
			to,
			color: color.to_string(),
			dashed,
		}
	}

	#[test]
	fn one_node_per_row_in_order() {
		let m = worked_example();
		let model = build_graph_model(&m, &[], SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(model.nodes.len(), m.item_count());
		for (i, node) in model.nodes.iter().enumerate() {
			assert_eq!(node.id, i + 1);
			assert_eq!(node.label, m.items()[i]);
			assert_eq!(node.color, NODE_COLOR);
			assert!(node.shadow);
		}
		assert!(model.edges.is_empty());
	}

	#[test]
	fn more_than_expected_is_dark_and_solid() {
		let records = [CooccurrenceRecord::new(1, 2, 0.6, 0.02)];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		let ids: Vec<usize> = model.nodes.iter().map(|n| n.id).collect();
		assert_eq!(ids, [1, 2, 3]);
		assert_eq!(model.edges, [edge(1, 2, "#3C3F51", false)]);
	}

	#[test]
	fn less_than_expected_is_light_and_dashed() {
		let records = [CooccurrenceRecord::new(1, 3, 0.01, 0.8)];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(model.edges, [edge(1, 3, "#B0B2C1", true)]);
	}

	#[test]
	fn low_side_wins_when_both_sides_are_significant() {
		let records = [CooccurrenceRecord::new(2, 3, 0.01, 0.04)];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(model.edges, [edge(2, 3, EDGE_LIGHT_COLOR, true)]);
	}

	#[test]
	fn threshold_is_inclusive() {
		let records = [CooccurrenceRecord::new(1, 2, 0.05, 0.9)];
		let model = build_graph_model(&worked_example(), &records, 0.05).unwrap();
		assert!(model.edges[0].dashed);
	}

	#[test]
	fn dashed_iff_light_iff_low_side() {
		let records = [
			CooccurrenceRecord::new(1, 2, 0.6, 0.02),
			CooccurrenceRecord::new(1, 3, 0.01, 0.8),
			CooccurrenceRecord::new(2, 3, 0.049, 0.9),
			CooccurrenceRecord::new(2, 3, 0.051, 0.001),
		];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(model.edges.len(), records.len());
		for (edge, record) in model.edges.iter().zip(&records) {
			assert_eq!((edge.from, edge.to), (record.first, record.second));
			assert_eq!(edge.dashed, edge.color == EDGE_LIGHT_COLOR);
			assert_eq!(edge.dashed, record.p_low <= SIGNIFICANCE_THRESHOLD);
		}
	}

	#[test]
	fn duplicate_records_are_not_merged() {
		let records = [
			CooccurrenceRecord::new(1, 2, 0.6, 0.02),
			CooccurrenceRecord::new(1, 2, 0.6, 0.02),
		];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(model.edges.len(), 2);
	}

	#[test]
	fn out_of_range_references_are_rejected() {
		let m = worked_example();
		for (first, second) in [(0, 2), (1, 4), (4, 1)] {
			let records = [CooccurrenceRecord::new(first, second, 0.6, 0.01)];
			let err = build_graph_model(&m, &records, SIGNIFICANCE_THRESHOLD).unwrap_err();
			assert!(matches!(
				err,
				AnalysisError::UnknownNodeReference { item_count: 3, .. }
			));
		}
	}

	#[test]
	fn names_must_agree_with_positions() {
		let m = worked_example();
		let mut record = CooccurrenceRecord::new(1, 2, 0.6, 0.01);
		record.first_name = Some("item 1".into());
		record.second_name = Some("item 2".into());
		assert!(build_graph_model(&m, &[record.clone()], SIGNIFICANCE_THRESHOLD).is_ok());

		record.second_name = Some("item 3".into());
		let err = build_graph_model(&m, &[record], SIGNIFICANCE_THRESHOLD).unwrap_err();
		assert_eq!(
			err,
			AnalysisError::MisplacedNodeReference {
				name: "item 3".into(),
				index: 2
			}
		);
	}

	#[test]
	fn single_row_gives_one_node_and_no_edges() {
		let m = PresenceMatrix::parse("x,s1,s2\nlonely,1,1\n").unwrap();
		let model = build_graph_model(&m, &[], SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(model.nodes.len(), 1);
		assert!(model.edges.is_empty());
	}

	#[test]
	fn building_twice_is_byte_identical() {
		let m = worked_example();
		let records = [
			CooccurrenceRecord::new(1, 2, 0.6, 0.02),
			CooccurrenceRecord::new(1, 3, 0.01, 0.8),
		];
		let a = build_graph_model(&m, &records, SIGNIFICANCE_THRESHOLD).unwrap();
		let b = build_graph_model(&m, &records, SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
	}

	#[test]
	fn edges_are_orientation_free() {
		let e = edge(3, 1, EDGE_DARK_COLOR, false);
		assert_eq!(e.key(), (1, 3));
		assert!(e.connects(1, 3));
		assert!(e.connects(3, 1));
		assert!(!e.connects(1, 2));
		assert_eq!(e.other(1), Some(3));
		assert_eq!(e.other(2), None);
	}

	#[test]
	fn degree_counts_incident_edges() {
		let records = [
			CooccurrenceRecord::new(1, 2, 0.6, 0.02),
			CooccurrenceRecord::new(1, 3, 0.01, 0.8),
		];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		assert_eq!(model.degree(1), 2);
		assert_eq!(model.degree(2), 1);
		assert_eq!(model.degree(3), 1);
	}

	#[test]
	fn json_uses_table_field_names() {
		let records = [CooccurrenceRecord::new(1, 2, 0.6, 0.02)];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		let value: serde_json::Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();
		assert_eq!(value["edges"][0]["from"], 1);
		assert_eq!(value["edges"][0]["color"], "#3C3F51");
		assert_eq!(value["nodes"][2]["label"], "item 3");
	}

	#[test]
	fn exported_json_reads_back() {
		let records = [
			CooccurrenceRecord::new(1, 2, 0.6, 0.02),
			CooccurrenceRecord::new(1, 3, 0.01, 0.8),
		];
		let model = build_graph_model(&worked_example(), &records, SIGNIFICANCE_THRESHOLD).unwrap();
		let back: GraphModel = serde_json::from_str(&model.to_json().unwrap()).unwrap();
		assert_eq!(back, model);
	}
}
