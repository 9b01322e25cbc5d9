//! Pair classification totals for one analysis.

use serde::Serialize;

use super::engine::CooccurrenceRecord;

/// How a tested pair relates to independence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Association {
	/// Co-occur more often than expected.
	Positive,
	/// Co-occur less often than expected.
	Negative,
	/// Close to the expected count.
	Random,
	/// Neither significant nor close to expected.
	Unclassifiable,
}

impl Association {
	/// Classifies a pair; the low side is checked first.
	///
	/// Non-significant pairs whose effect size stays within `classifier` are
	/// random, the rest cannot be told apart from either direction.
	pub fn of(record: &CooccurrenceRecord, threshold: f64, classifier: f64) -> Self {
		if record.p_low <= threshold {
			Association::Negative
		} else if record.p_high <= threshold {
			Association::Positive
		} else if record.effect_size().abs() <= classifier {
			Association::Random
		} else {
			Association::Unclassifiable
		}
	}

	/// Lower-case display name.
	pub fn label(self) -> &'static str {
		match self {
			Association::Positive => "positive",
			Association::Negative => "negative",
			Association::Random => "random",
			Association::Unclassifiable => "unclassifiable",
		}
	}
}

/// Counts over one analysis run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
	/// Items in the matrix.
	pub items: usize,
	/// Samples in the matrix.
	pub samples: usize,
	/// Pairs tested.
	pub pairs_analyzed: usize,
	/// Pairs skipped as expected to co-occur less than once.
	pub pairs_excluded: usize,
	/// Pairs classed [`Association::Positive`].
	pub positive: usize,
	/// Pairs classed [`Association::Negative`].
	pub negative: usize,
	/// Pairs classed [`Association::Random`].
	pub random: usize,
	/// Pairs classed [`Association::Unclassifiable`].
	pub unclassifiable: usize,
}

impl Summary {
	/// Classifies every analysed record at `threshold`.
	pub fn tally(
		items: usize,
		samples: usize,
		pairs_excluded: usize,
		analyzed: &[CooccurrenceRecord],
		threshold: f64,
		classifier: f64,
	) -> Self {
		let mut summary = Summary {
			items,
			samples,
			pairs_analyzed: analyzed.len(),
			pairs_excluded,
			..Default::default()
		};
		for record in analyzed {
			match Association::of(record, threshold, classifier) {
				Association::Positive => summary.positive += 1,
				Association::Negative => summary.negative += 1,
				Association::Random => summary.random += 1,
				Association::Unclassifiable => summary.unclassifiable += 1,
			}
		}
		summary
	}

	/// Share of analysed pairs that are positive or negative, in percent.
	pub fn non_random_percent(&self) -> f64 {
		if self.pairs_analyzed == 0 {
			return 0.0;
		}
		100.0 * (self.positive + self.negative) as f64 / self.pairs_analyzed as f64
	}
}
