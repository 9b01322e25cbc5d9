//! Bundled datasets and dataset resolution.

use log::info;

use super::error::{AnalysisError, Result};
use super::matrix::PresenceMatrix;

/// Darwin's finches across the Galápagos islands (13 species, 17 islands).
const FINCHES: &str = "\
species\tSeymour\tBaltra\tIsabella\tFernandina\tSantiago\tRabida\tPinzon\tSanta Cruz\tSanta Fe\tSan Cristobal\tEspanola\tFloreana\tGenovesa\tMarchena\tPinta\tDarwin\tWolf
Geospiza magnirostris\t0\t0\t1\t1\t1\t1\t1\t1\t1\t1\t0\t1\t1\t1\t1\t1\t1
Geospiza fortis\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t0\t1\t0\t1\t1\t0\t0
Geospiza fuliginosa\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t0\t1\t0\t1\t1
Geospiza difficilis\t0\t0\t1\t1\t1\t0\t0\t1\t0\t1\t0\t1\t1\t0\t1\t1\t1
Geospiza scandens\t1\t1\t1\t0\t1\t1\t1\t1\t1\t1\t0\t1\t0\t1\t1\t0\t0
Geospiza conirostris\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t1\t0\t1\t0\t0\t0\t0
Camarhynchus psittacula\t0\t0\t1\t1\t1\t1\t1\t1\t1\t0\t0\t1\t0\t1\t1\t0\t0
Camarhynchus pauper\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t1\t0\t0\t0\t0\t0
Camarhynchus parvulus\t0\t0\t1\t1\t1\t1\t1\t1\t1\t1\t0\t1\t0\t0\t1\t0\t0
Platyspiza crassirostris\t0\t0\t1\t1\t1\t1\t1\t1\t1\t1\t0\t1\t0\t1\t1\t0\t0
Cactospiza pallida\t0\t0\t1\t1\t1\t0\t1\t1\t0\t1\t0\t0\t0\t0\t0\t0\t0
Cactospiza heliobates\t0\t0\t1\t1\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0
Certhidea olivacea\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1
";

/// Three items over four samples; items 1 and 2 share most samples.
const DEMO: &str = "\
item,s1,s2,s3,s4
item 1,1,1,0,0
item 2,1,1,0,1
item 3,0,0,1,1
";

/// Names of the bundled datasets, in display order.
pub const BUILTIN_DATASETS: &[&str] = &["finches", "demo"];

/// Where a presence matrix comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum DatasetSource {
	/// One of [`BUILTIN_DATASETS`].
	Builtin(String),
	/// Delimited text supplied by the user.
	Inline(String),
}

impl DatasetSource {
	/// Short human-readable description for logs and captions.
	pub fn describe(&self) -> String {
		match self {
			DatasetSource::Builtin(name) => format!("built-in dataset `{name}`"),
			DatasetSource::Inline(text) => format!("inline matrix ({} bytes)", text.len()),
		}
	}
}

/// Resolves a source into a validated matrix.
pub fn load_matrix(source: &DatasetSource) -> Result<PresenceMatrix> {
	let matrix = match source {
		DatasetSource::Builtin(name) => PresenceMatrix::parse(builtin_text(name)?)?,
		DatasetSource::Inline(text) => PresenceMatrix::parse(text)?,
	};
	info!(
		"loaded {}: {} items x {} samples",
		source.describe(),
		matrix.item_count(),
		matrix.sample_count()
	);
	Ok(matrix)
}

/// Raw text of a bundled dataset.
pub fn builtin_text(name: &str) -> Result<&'static str> {
	match name {
		"finches" => Ok(FINCHES),
		"demo" => Ok(DEMO),
		other => Err(AnalysisError::DataFormat(format!(
			"unknown dataset `{other}` (expected one of: {})",
			BUILTIN_DATASETS.join(", ")
		))),
	}
}
