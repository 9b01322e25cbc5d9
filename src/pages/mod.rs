use leptos::prelude::*;

use crate::analysis::{AnalysisError, AnalysisSettings};

pub mod home;
pub mod not_found;
pub mod tables;

/// Matrix text typed into the custom dataset box, shared across pages.
#[derive(Clone, Copy)]
pub struct CustomMatrix(pub RwSignal<String>);

/// Settings from query parameters, falling back to defaults on a bad value.
fn read_settings(lookup: impl Fn(&str) -> Option<String>) -> (AnalysisSettings, Option<AnalysisError>) {
	match AnalysisSettings::from_lookup(lookup) {
		Ok(settings) => (settings, None),
		Err(e) => {
			log::warn!("ignoring query settings: {e}");
			(AnalysisSettings::default(), Some(e))
		}
	}
}
