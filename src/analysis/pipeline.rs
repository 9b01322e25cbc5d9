//! Loader, engine and builder chained into one pass.

use log::{error, info};

use super::datasets::{DatasetSource, load_matrix};
use super::engine::{CooccurrenceRecord, HypergeometricEngine};
use super::error::Result;
use super::graph_model::{GraphModel, build_graph_model};
use super::matrix::PresenceMatrix;
use super::settings::AnalysisSettings;
use super::summary::Summary;

/// Everything one run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
	/// The loaded matrix.
	pub matrix: PresenceMatrix,
	/// Notable pairs only.
	pub records: Vec<CooccurrenceRecord>,
	/// Node and edge tables built from `records`.
	pub model: GraphModel,
	/// Classification totals over every analysed pair.
	pub summary: Summary,
}

/// Runs every stage in order; the first failure is returned as-is.
pub fn run_pipeline(source: &DatasetSource, settings: &AnalysisSettings) -> Result<PipelineOutput> {
	run(source, settings).inspect_err(|e| error!("analysis of {} failed: {e}", source.describe()))
}

fn run(source: &DatasetSource, settings: &AnalysisSettings) -> Result<PipelineOutput> {
	let matrix = load_matrix(source)?;
	let engine = HypergeometricEngine::new(settings.thresh);
	let analyzed = engine.analyze_pairs(&matrix)?;
	let records = engine.select_significant(&analyzed, settings.alpha)?;
	let model = build_graph_model(&matrix, &records, settings.alpha)?;

	let summary = Summary::tally(
		matrix.item_count(),
		matrix.sample_count(),
		engine.excluded_pairs(&matrix),
		&analyzed,
		settings.alpha,
		settings.random_classifier,
	);
	info!(
		"{} positive, {} negative of {} pairs",
		summary.positive, summary.negative, summary.pairs_analyzed
	);

	Ok(PipelineOutput {
		matrix,
		records,
		model,
		summary,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::analysis::engine::CooccurrenceEngine;
	use crate::analysis::error::AnalysisError;
	use crate::analysis::graph_model::{EDGE_DARK_COLOR, EDGE_LIGHT_COLOR};

	const CONTRASTING: &str = "x,1,2,3,4,5,6,7,8,9,10\n\
		a,1,1,1,1,1,0,0,0,0,0\n\
		b,1,1,1,1,1,0,0,0,0,0\n\
		c,0,0,0,0,0,1,1,1,1,1\n\
		d,1,0,1,0,1,0,1,0,1,0\n";

	#[test]
	fn end_to_end_styles_follow_direction() {
		let out = run_pipeline(
			&DatasetSource::Inline(CONTRASTING.into()),
			&AnalysisSettings::default(),
		)
		.unwrap();
		assert_eq!(out.model.nodes.len(), 4);
		assert_eq!(out.records.len(), out.model.edges.len());

		let ab = out.model.edges.iter().find(|e| e.connects(1, 2)).unwrap();
		assert_eq!(ab.color, EDGE_DARK_COLOR);
		assert!(!ab.dashed);
		let ac = out.model.edges.iter().find(|e| e.connects(1, 3)).unwrap();
		assert_eq!(ac.color, EDGE_LIGHT_COLOR);
		assert!(ac.dashed);
		// d is spread evenly and links to nothing, but still has a node
		assert!(out.model.edges.iter().all(|e| e.other(4).is_none()));
		assert_eq!(out.model.nodes[3].label, "d");

		assert_eq!(out.summary.items, 4);
		assert_eq!(out.summary.samples, 10);
		assert_eq!(out.summary.pairs_analyzed, 6);
		assert_eq!(out.summary.positive, 1);
		assert_eq!(out.summary.negative, 2);
	}

	#[test]
	fn finches_run_is_consistent() {
		let out = run_pipeline(
			&DatasetSource::Builtin("finches".into()),
			&AnalysisSettings::default(),
		)
		.unwrap();
		assert_eq!(out.model.nodes.len(), 13);
		assert_eq!(out.model.edges.len(), out.summary.positive + out.summary.negative);
		assert_eq!(
			out.summary.pairs_analyzed + out.summary.pairs_excluded,
			13 * 12 / 2
		);
		for (edge, record) in out.model.edges.iter().zip(&out.records) {
			assert_eq!(edge.dashed, record.p_low <= 0.05);
		}
	}

	#[test]
	fn records_match_the_engine_entry_point() {
		for thresh in [true, false] {
			let settings = AnalysisSettings {
				thresh,
				alpha: 0.1,
				..AnalysisSettings::default()
			};
			let out = run_pipeline(&DatasetSource::Builtin("finches".into()), &settings).unwrap();
			let expected = HypergeometricEngine::new(thresh)
				.compute(&out.matrix, settings.alpha)
				.unwrap();
			assert_eq!(out.records, expected);
			assert_eq!(
				out.records.len(),
				out.summary.positive + out.summary.negative
			);
		}
	}

	#[test]
	fn loader_errors_pass_through() {
		let err = run_pipeline(
			&DatasetSource::Inline("x,s1\na,7\n".into()),
			&AnalysisSettings::default(),
		)
		.unwrap_err();
		assert!(matches!(err, AnalysisError::DataFormat(_)));
	}

	#[test]
	fn engine_errors_pass_through() {
		let settings = AnalysisSettings {
			alpha: 2.0,
			..AnalysisSettings::default()
		};
		let err = run_pipeline(&DatasetSource::Builtin("demo".into()), &settings).unwrap_err();
		assert!(matches!(err, AnalysisError::Engine(_)));
	}
}
