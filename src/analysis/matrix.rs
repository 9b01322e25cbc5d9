//! Presence/absence matrices: items (rows) observed across samples (columns).

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::error::{AnalysisError, Result};

/// A validated binary matrix with labelled rows and columns.
///
/// Items are addressed by their 1-based row position, which is also the id
/// the graph model gives their node.
#[derive(Clone, Debug, PartialEq)]
pub struct PresenceMatrix {
	items: Vec<String>,
	samples: Vec<String>,
	cells: Vec<u8>,
	positions: HashMap<String, usize>,
}

impl PresenceMatrix {
	/// Builds a matrix from labels and row-major cells.
	pub fn new(items: Vec<String>, samples: Vec<String>, rows: Vec<Vec<u8>>) -> Result<Self> {
		if items.is_empty() {
			return Err(AnalysisError::DataFormat("matrix has no items".into()));
		}
		if samples.is_empty() {
			return Err(AnalysisError::DataFormat("matrix has no samples".into()));
		}
		if rows.len() != items.len() {
			return Err(AnalysisError::DataFormat(format!(
				"{} item labels but {} rows",
				items.len(),
				rows.len()
			)));
		}

		let mut seen = HashSet::new();
		for sample in &samples {
			if sample.is_empty() {
				return Err(AnalysisError::DataFormat("empty sample label".into()));
			}
			if !seen.insert(sample.as_str()) {
				return Err(AnalysisError::DataFormat(format!(
					"duplicate sample label `{sample}`"
				)));
			}
		}

		let mut positions = HashMap::with_capacity(items.len());
		for (i, item) in items.iter().enumerate() {
			if item.is_empty() {
				return Err(AnalysisError::DataFormat(format!(
					"empty item label in row {}",
					i + 1
				)));
			}
			if positions.insert(item.clone(), i + 1).is_some() {
				return Err(AnalysisError::DataFormat(format!(
					"duplicate item label `{item}`"
				)));
			}
		}

		let mut cells = Vec::with_capacity(items.len() * samples.len());
		for (i, row) in rows.into_iter().enumerate() {
			if row.len() != samples.len() {
				return Err(AnalysisError::DataFormat(format!(
					"row `{}` has {} cells, expected {}",
					items[i],
					row.len(),
					samples.len()
				)));
			}
			if let Some(&bad) = row.iter().find(|&&v| v > 1) {
				return Err(AnalysisError::DataFormat(format!(
					"row `{}` holds non-binary value {bad}",
					items[i]
				)));
			}
			cells.extend(row);
		}

		Ok(Self {
			items,
			samples,
			cells,
			positions,
		})
	}

	/// Parses delimited text: a header of sample labels, then one labelled row per item.
	///
	/// The delimiter is a tab when the header contains one, a comma otherwise.
	/// Blank lines and lines starting with `#` are skipped.
	pub fn parse(text: &str) -> Result<Self> {
		let mut lines = text
			.lines()
			.enumerate()
			.map(|(n, line)| (n + 1, line.trim_end_matches('\r')))
			.filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'));

		let Some((_, header)) = lines.next() else {
			return Err(AnalysisError::DataFormat("input is empty".into()));
		};
		let delimiter = if header.contains('\t') { '\t' } else { ',' };
		debug!("parsing presence matrix with delimiter {delimiter:?}");

		let samples: Vec<String> = header
			.split(delimiter)
			.skip(1)
			.map(|s| s.trim().to_string())
			.collect();
		if samples.is_empty() {
			return Err(AnalysisError::DataFormat(
				"header line lists no samples".into(),
			));
		}

		let mut items = Vec::new();
		let mut rows = Vec::new();
		for (line_no, line) in lines {
			let mut fields = line.split(delimiter).map(str::trim);
			let label = fields.next().unwrap_or_default().to_string();
			let row = fields
				.map(|cell| match cell {
					"0" => Ok(0),
					"1" => Ok(1),
					other => {
						warn!("rejecting cell {other:?} on line {line_no}");
						Err(AnalysisError::DataFormat(format!(
							"line {line_no}: cell {other:?} is not 0 or 1"
						)))
					}
				})
				.collect::<Result<Vec<u8>>>()?;
			items.push(label);
			rows.push(row);
		}

		Self::new(items, samples, rows)
	}

	/// Number of items (rows).
	pub fn item_count(&self) -> usize {
		self.items.len()
	}

	/// Number of samples (columns).
	pub fn sample_count(&self) -> usize {
		self.samples.len()
	}

	/// Item labels in row order.
	pub fn items(&self) -> &[String] {
		&self.items
	}

	/// Sample labels in column order.
	pub fn samples(&self) -> &[String] {
		&self.samples
	}

	/// Label of the item at a 1-based position.
	pub fn item_label(&self, position: usize) -> Option<&str> {
		position
			.checked_sub(1)
			.and_then(|i| self.items.get(i))
			.map(String::as_str)
	}

	/// 1-based position of an item label.
	pub fn position_of(&self, label: &str) -> Option<usize> {
		self.positions.get(label).copied()
	}

	/// Whether the item at a 1-based position was observed in a 0-based sample column.
	pub fn is_present(&self, position: usize, sample: usize) -> bool {
		self.row(position)
			.and_then(|row| row.get(sample))
			.is_some_and(|&v| v == 1)
	}

	/// Cells of the item at a 1-based position.
	pub fn row(&self, position: usize) -> Option<&[u8]> {
		let i = position.checked_sub(1).filter(|&i| i < self.items.len())?;
		let width = self.samples.len();
		Some(&self.cells[i * width..(i + 1) * width])
	}

	/// Number of samples the item at a 1-based position occurs in.
	pub fn incidence(&self, position: usize) -> usize {
		self.row(position)
			.map(|row| row.iter().filter(|&&v| v == 1).count())
			.unwrap_or(0)
	}

	/// Number of samples in which both items occur.
	pub fn joint_incidence(&self, first: usize, second: usize) -> usize {
		match (self.row(first), self.row(second)) {
			(Some(a), Some(b)) => a.iter().zip(b).filter(|(x, y)| **x == 1 && **y == 1).count(),
			_ => 0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn labels(names: &[&str]) -> Vec<String> {
		names.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn parses_tab_separated_text() {
		let m = PresenceMatrix::parse("species\ts1\ts2\na\t1\t0\nb\t0\t1\n").unwrap();
		assert_eq!(m.item_count(), 2);
		assert_eq!(m.sample_count(), 2);
		assert_eq!(m.items(), ["a", "b"]);
		assert_eq!(m.samples(), ["s1", "s2"]);
		assert!(m.is_present(1, 0));
		assert!(!m.is_present(1, 1));
		assert!(m.is_present(2, 1));
	}

	#[test]
	fn parses_csv_with_comments_and_blank_lines() {
		let text = "# finches\n,north,south,east\n\nred, 1, 1, 0\r\nblue,0,1,1\n";
		let m = PresenceMatrix::parse(text).unwrap();
		assert_eq!(m.samples(), ["north", "south", "east"]);
		assert_eq!(m.incidence(1), 2);
		assert_eq!(m.joint_incidence(1, 2), 1);
	}

	#[test]
	fn position_mapping_is_one_based() {
		let m = PresenceMatrix::parse("x,s\nalpha,1\nbeta,0\n").unwrap();
		assert_eq!(m.position_of("alpha"), Some(1));
		assert_eq!(m.position_of("beta"), Some(2));
		assert_eq!(m.position_of("gamma"), None);
		assert_eq!(m.item_label(2), Some("beta"));
		assert_eq!(m.item_label(0), None);
		assert_eq!(m.item_label(3), None);
	}

	#[test]
	fn rejects_non_binary_cells() {
		let err = PresenceMatrix::parse("x,s1,s2\na,1,2\n").unwrap_err();
		assert!(matches!(err, AnalysisError::DataFormat(msg) if msg.contains("line 2")));

		let err = PresenceMatrix::parse("x,s1\na,yes\n").unwrap_err();
		assert!(matches!(err, AnalysisError::DataFormat(_)));

		let err = PresenceMatrix::new(labels(&["a"]), labels(&["s"]), vec![vec![3]]).unwrap_err();
		assert!(matches!(err, AnalysisError::DataFormat(_)));
	}

	#[test]
	fn rejects_duplicate_labels() {
		let err = PresenceMatrix::parse("x,s1,s2\na,1,0\na,0,1\n").unwrap_err();
		assert!(matches!(err, AnalysisError::DataFormat(msg) if msg.contains("duplicate item")));

		let err = PresenceMatrix::parse("x,s1,s1\na,1,0\n").unwrap_err();
		assert!(matches!(err, AnalysisError::DataFormat(msg) if msg.contains("duplicate sample")));
	}

	#[test]
	fn rejects_shape_problems() {
		assert!(PresenceMatrix::parse("").is_err());
		assert!(PresenceMatrix::parse("# only a comment\n").is_err());
		assert!(PresenceMatrix::parse("species\n").is_err());
		assert!(PresenceMatrix::parse("x,s1,s2\n").is_err());
		assert!(PresenceMatrix::parse("x,s1,s2\na,1\n").is_err());
		assert!(PresenceMatrix::parse("x,s1\n,1\n").is_err());
	}

	#[test]
	fn out_of_range_rows_are_absent() {
		let m = PresenceMatrix::parse("x,s\na,1\n").unwrap();
		assert!(m.row(0).is_none());
		assert!(m.row(2).is_none());
		assert_eq!(m.incidence(5), 0);
		assert_eq!(m.joint_incidence(1, 5), 0);
		assert!(!m.is_present(1, 4));
	}
}
