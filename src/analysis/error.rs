//! Error taxonomy shared by every pipeline stage.

use thiserror::Error;

/// Failures raised while loading, analysing, modelling or rendering.
///
/// Every stage surfaces its error immediately; nothing is retried and no
/// partial result is handed back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
	/// The presence/absence matrix is malformed.
	#[error("malformed presence matrix: {0}")]
	DataFormat(String),

	/// An engine record points at a row the matrix does not have.
	#[error("co-occurrence record references item {index}, but the matrix has {item_count} items")]
	UnknownNodeReference {
		/// Position the record used.
		index: usize,
		/// Rows in the matrix.
		item_count: usize,
	},

	/// An engine record names an item that does not sit at the position it claims.
	#[error("co-occurrence record places `{name}` at position {index}, which does not match the matrix")]
	MisplacedNodeReference {
		/// Label carried by the record.
		name: String,
		/// Position the record used.
		index: usize,
	},

	/// The statistical computation failed.
	#[error("co-occurrence engine failed: {0}")]
	Engine(String),

	/// The visualization layer failed.
	#[error("network renderer failed: {0}")]
	Render(String),

	/// The node and edge tables could not be serialised.
	#[error("graph export failed: {0}")]
	Export(String),

	/// A configuration value could not be understood.
	#[error("invalid setting `{key}`: {value:?}")]
	InvalidSetting {
		/// Setting name.
		key: String,
		/// Rejected raw value.
		value: String,
	},
}

/// Convenience alias used across the analysis modules.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_failing_stage() {
		let export = AnalysisError::Export("key must be a string".into());
		assert_eq!(export.to_string(), "graph export failed: key must be a string");
		assert_ne!(export, AnalysisError::Render("key must be a string".into()));

		let setting = AnalysisError::InvalidSetting {
			key: "alpha".into(),
			value: "2".into(),
		};
		assert_eq!(setting.to_string(), "invalid setting `alpha`: \"2\"");
	}
}
