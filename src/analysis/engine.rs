//! Pairwise co-occurrence probabilities.
//!
//! The joint occurrence count of two independent items across `N` samples,
//! given their incidences `n1` and `n2`, is hypergeometric: `n2` draws from
//! `N` samples of which `n1` hold the first item.

use log::{debug, info};
use serde::Serialize;
use statrs::distribution::{Discrete, Hypergeometric};

use super::error::{AnalysisError, Result};
use super::matrix::PresenceMatrix;

/// Default cutoff for treating a p-value as notable.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Outcome of testing one unordered item pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CooccurrenceRecord {
	/// 1-based position of the first item, `first < second`.
	pub first: usize,
	/// 1-based position of the second item.
	pub second: usize,
	/// Label of the first item, when known.
	pub first_name: Option<String>,
	/// Label of the second item, when known.
	pub second_name: Option<String>,
	/// Samples holding the first item.
	pub first_incidence: usize,
	/// Samples holding the second item.
	pub second_incidence: usize,
	/// Samples holding both items.
	pub observed: usize,
	/// Probability that a sample holds both items under independence.
	pub probability: f64,
	/// Expected joint count under independence.
	pub expected: f64,
	/// `P(X <= observed)`: co-occurrence this low or lower.
	pub p_low: f64,
	/// `P(X >= observed)`: co-occurrence this high or higher.
	pub p_high: f64,
	/// Total sample count of the matrix.
	pub samples: usize,
}

impl CooccurrenceRecord {
	/// A record carrying only positions and p-values.
	pub fn new(first: usize, second: usize, p_low: f64, p_high: f64) -> Self {
		Self {
			first,
			second,
			first_name: None,
			second_name: None,
			first_incidence: 0,
			second_incidence: 0,
			observed: 0,
			probability: 0.0,
			expected: 0.0,
			p_low,
			p_high,
			samples: 0,
		}
	}

	/// True when either tail reaches `threshold`.
	pub fn is_significant(&self, threshold: f64) -> bool {
		self.p_low <= threshold || self.p_high <= threshold
	}

	/// Standardized effect: `(observed - expected) / samples`.
	pub fn effect_size(&self) -> f64 {
		if self.samples == 0 {
			return 0.0;
		}
		(self.observed as f64 - self.expected) / self.samples as f64
	}
}

/// Produces the notable pairs of a presence matrix.
pub trait CooccurrenceEngine {
	/// Returns every pair with `p_low <= threshold` or `p_high <= threshold`.
	fn compute(&self, matrix: &PresenceMatrix, threshold: f64) -> Result<Vec<CooccurrenceRecord>>;
}

/// Exact hypergeometric co-occurrence model.
#[derive(Clone, Debug)]
pub struct HypergeometricEngine {
	/// Skip pairs expected to co-occur in fewer than one sample.
	pub thresh: bool,
}

impl Default for HypergeometricEngine {
	fn default() -> Self {
		Self { thresh: true }
	}
}

impl HypergeometricEngine {
	/// Engine with the given [`thresh`](Self::thresh) rule.
	pub fn new(thresh: bool) -> Self {
		Self { thresh }
	}

	/// Tests every unordered pair, significant or not.
	///
	/// Pairs removed by [`thresh`](Self::thresh) are not returned.
	pub fn analyze_pairs(&self, matrix: &PresenceMatrix) -> Result<Vec<CooccurrenceRecord>> {
		let n = matrix.item_count();
		let samples = matrix.sample_count();
		let incidences: Vec<usize> = (1..=n).map(|i| matrix.incidence(i)).collect();
		let mut records = Vec::with_capacity(n * n.saturating_sub(1) / 2);
		let mut skipped = 0usize;

		for first in 1..=n {
			for second in first + 1..=n {
				let (n1, n2) = (incidences[first - 1], incidences[second - 1]);
				if self.thresh && expected_below_one(samples, n1, n2) {
					skipped += 1;
					continue;
				}
				let expected = n1 as f64 * n2 as f64 / samples as f64;
				let probability = expected / samples as f64;

				let observed = matrix.joint_incidence(first, second);
				let (p_low, p_high) = tail_probabilities(samples, n1, n2, observed)?;
				records.push(CooccurrenceRecord {
					first,
					second,
					first_name: matrix.item_label(first).map(str::to_string),
					second_name: matrix.item_label(second).map(str::to_string),
					first_incidence: n1,
					second_incidence: n2,
					observed,
					probability,
					expected,
					p_low,
					p_high,
					samples,
				});
			}
		}

		debug!(
			"analysed {} pairs, {} skipped as expected co-occurrence < 1",
			records.len(),
			skipped
		);
		Ok(records)
	}

	/// Number of pairs the `thresh` rule removes from analysis.
	pub fn excluded_pairs(&self, matrix: &PresenceMatrix) -> usize {
		if !self.thresh {
			return 0;
		}
		let n = matrix.item_count();
		let samples = matrix.sample_count();
		let incidences: Vec<usize> = (1..=n).map(|i| matrix.incidence(i)).collect();
		(0..n)
			.flat_map(|i| (i + 1..n).map(move |j| (i, j)))
			.filter(|&(i, j)| expected_below_one(samples, incidences[i], incidences[j]))
			.count()
	}

	/// Keeps the records significant at `threshold`.
	///
	/// Fails with [`AnalysisError::Engine`] unless `threshold` lies in `(0, 1]`.
	pub fn select_significant(
		&self,
		analyzed: &[CooccurrenceRecord],
		threshold: f64,
	) -> Result<Vec<CooccurrenceRecord>> {
		if !(threshold > 0.0 && threshold <= 1.0) {
			return Err(AnalysisError::Engine(format!(
				"significance threshold must lie in (0, 1], got {threshold}"
			)));
		}
		let significant: Vec<_> = analyzed
			.iter()
			.filter(|r| r.is_significant(threshold))
			.cloned()
			.collect();
		info!(
			"{} significant pairs at threshold {threshold}",
			significant.len()
		);
		Ok(significant)
	}
}

/// `n1 * n2 / samples < 1`, decided in integers.
fn expected_below_one(samples: usize, n1: usize, n2: usize) -> bool {
	n1 * n2 < samples
}

impl CooccurrenceEngine for HypergeometricEngine {
	fn compute(&self, matrix: &PresenceMatrix, threshold: f64) -> Result<Vec<CooccurrenceRecord>> {
		self.select_significant(&self.analyze_pairs(matrix)?, threshold)
	}
}

/// Lower and upper tail probabilities of the observed joint count.
fn tail_probabilities(samples: usize, n1: usize, n2: usize, observed: usize) -> Result<(f64, f64)> {
	let lo = (n1 + n2).saturating_sub(samples);
	let hi = n1.min(n2);
	if lo >= hi {
		return Ok((1.0, 1.0));
	}

	let dist = Hypergeometric::new(samples as u64, n1 as u64, n2 as u64)
		.map_err(|e| AnalysisError::Engine(e.to_string()))?;
	let p_low: f64 = (lo..=observed.min(hi)).map(|k| dist.pmf(k as u64)).sum();
	let p_high: f64 = (observed.max(lo)..=hi).map(|k| dist.pmf(k as u64)).sum();
	Ok((p_low.min(1.0), p_high.min(1.0)))
}
