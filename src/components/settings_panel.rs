use leptos::prelude::*;

use crate::analysis::settings::parse_alpha;
use crate::analysis::{AnalysisError, AnalysisSettings, BUILTIN_DATASETS, CUSTOM_DATASET};
use crate::components::network_graph::LAYOUT_NAMES;

fn options(names: &'static [&'static str], current: Signal<String>) -> impl IntoView {
	names
		.iter()
		.map(move |&name| {
			view! {
				<option value=name selected=move || current.get() == name>
					{name}
				</option>
			}
		})
		.collect_view()
}

/// Controls for the dataset, significance threshold and layout.
///
/// Writes accepted values straight into `settings` and clears `input_error`;
/// a rejected threshold is reported there instead and changes nothing.
#[component]
pub fn SettingsPanel(
	settings: RwSignal<AnalysisSettings>,
	custom_text: RwSignal<String>,
	input_error: RwSignal<Option<AnalysisError>>,
) -> impl IntoView {
	let dataset = Signal::derive(move || settings.with(|s| s.dataset.clone()));
	let layout = Signal::derive(move || settings.with(|s| s.layout.clone()));

	let on_dataset = move |ev: web_sys::Event| {
		let value = event_target_value(&ev);
		input_error.set(None);
		settings.update(|s| s.dataset = value);
	};
	let on_layout = move |ev: web_sys::Event| {
		let value = event_target_value(&ev);
		input_error.set(None);
		settings.update(|s| s.layout = value);
	};
	let on_alpha = move |ev: web_sys::Event| match parse_alpha(&event_target_value(&ev)) {
		Ok(alpha) => {
			input_error.set(None);
			settings.update(|s| s.alpha = alpha);
		}
		Err(e) => {
			log::warn!("{e}");
			input_error.set(Some(e));
		}
	};
	let on_thresh = move |ev: web_sys::Event| {
		let checked = event_target_checked(&ev);
		input_error.set(None);
		settings.update(|s| s.thresh = checked);
	};

	view! {
		<form class="settings-panel" on:submit=|ev| ev.prevent_default()>
			<label>
				"Dataset "
				<select prop:value=move || dataset.get() on:change=on_dataset>
					{options(BUILTIN_DATASETS, dataset)}
					<option value=CUSTOM_DATASET selected=move || dataset.get() == CUSTOM_DATASET>
						"custom"
					</option>
				</select>
			</label>
			<label>
				"α "
				<input
					type="number"
					min="0.001"
					max="1"
					step="0.01"
					prop:value=move || settings.with(|s| s.alpha.to_string())
					on:change=on_alpha
				/>
			</label>
			<label>
				"Layout "
				<select prop:value=move || layout.get() on:change=on_layout>
					{options(LAYOUT_NAMES, layout)}
				</select>
			</label>
			<label>
				<input
					type="checkbox"
					prop:checked=move || settings.with(|s| s.thresh)
					on:change=on_thresh
				/>
				" skip pairs expected to co-occur less than once"
			</label>
			<Show when=move || settings.with(|s| s.dataset == CUSTOM_DATASET)>
				<textarea
					rows="8"
					placeholder="species,site 1,site 2\nfinch,1,0"
					prop:value=move || custom_text.get()
					on:input=move |ev| custom_text.set(event_target_value(&ev))
				/>
			</Show>
		</form>
	}
}
