//! Analysis configuration, read from `key=value` lookups such as a URL query.

use serde::Serialize;

use super::datasets::DatasetSource;
use super::engine::SIGNIFICANCE_THRESHOLD;
use super::error::{AnalysisError, Result};

/// Dataset name that selects the user-supplied matrix text.
pub const CUSTOM_DATASET: &str = "custom";
/// Dataset used when none is given.
pub const DEFAULT_DATASET: &str = "finches";
/// Layout used when none is given.
pub const DEFAULT_LAYOUT: &str = "kamada-kawai";
/// Largest absolute effect size a non-significant pair may have and still count as random.
pub const DEFAULT_RANDOM_CLASSIFIER: f64 = 0.1;

/// What to analyse and how to draw it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisSettings {
	/// Built-in dataset name or [`CUSTOM_DATASET`].
	pub dataset: String,
	/// Significance threshold.
	pub alpha: f64,
	/// Renderer layout name.
	pub layout: String,
	/// Skip pairs expected to co-occur in fewer than one sample.
	pub thresh: bool,
	/// See [`DEFAULT_RANDOM_CLASSIFIER`].
	pub random_classifier: f64,
}

impl Default for AnalysisSettings {
	fn default() -> Self {
		Self {
			dataset: DEFAULT_DATASET.to_string(),
			alpha: SIGNIFICANCE_THRESHOLD,
			layout: DEFAULT_LAYOUT.to_string(),
			thresh: true,
			random_classifier: DEFAULT_RANDOM_CLASSIFIER,
		}
	}
}

impl AnalysisSettings {
	/// Overlays any keys `lookup` knows onto the defaults.
	///
	/// Recognised keys: `dataset`, `alpha`, `layout`, `thresh`, `classifier`.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let mut settings = Self::default();
		if let Some(dataset) = lookup("dataset").filter(|v| !v.is_empty()) {
			settings.dataset = dataset;
		}
		if let Some(layout) = lookup("layout").filter(|v| !v.is_empty()) {
			settings.layout = layout;
		}
		if let Some(alpha) = lookup("alpha") {
			settings.alpha = parse_alpha(&alpha)?;
		}
		if let Some(thresh) = lookup("thresh") {
			settings.thresh = match thresh.as_str() {
				"true" | "1" | "yes" => true,
				"false" | "0" | "no" => false,
				_ => return Err(invalid("thresh", &thresh)),
			};
		}
		if let Some(classifier) = lookup("classifier") {
			settings.random_classifier = classifier
				.parse::<f64>()
				.ok()
				.filter(|c| c.is_finite() && *c >= 0.0)
				.ok_or_else(|| invalid("classifier", &classifier))?;
		}
		Ok(settings)
	}

	/// Query string that reproduces these settings, values percent-encoded.
	pub fn to_query(&self) -> String {
		format!(
			"dataset={}&alpha={}&layout={}&thresh={}&classifier={}",
			urlencoding::encode(&self.dataset),
			self.alpha,
			urlencoding::encode(&self.layout),
			self.thresh,
			self.random_classifier
		)
	}

	/// The dataset to load; `custom_text` is used for [`CUSTOM_DATASET`].
	pub fn source(&self, custom_text: &str) -> DatasetSource {
		if self.dataset == CUSTOM_DATASET {
			DatasetSource::Inline(custom_text.to_string())
		} else {
			DatasetSource::Builtin(self.dataset.clone())
		}
	}
}

/// Parses a significance threshold in `(0, 1]`.
pub fn parse_alpha(value: &str) -> Result<f64> {
	value
		.trim()
		.parse::<f64>()
		.ok()
		.filter(|a| *a > 0.0 && *a <= 1.0)
		.ok_or_else(|| invalid("alpha", value))
}

fn invalid(key: &str, value: &str) -> AnalysisError {
	AnalysisError::InvalidSetting {
		key: key.to_string(),
		value: value.to_string(),
	}
}
