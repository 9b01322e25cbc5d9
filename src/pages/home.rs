use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use super::{CustomMatrix, read_settings};
use crate::analysis::{AnalysisSettings, EDGE_DARK_COLOR, EDGE_LIGHT_COLOR, run_pipeline};
use crate::components::network_graph::{LayoutAlgorithm, NetworkCanvas};
use crate::components::settings_panel::SettingsPanel;

/// Network view of the current analysis
#[component]
pub fn Home() -> impl IntoView {
	let CustomMatrix(custom_text) = expect_context::<CustomMatrix>();
	let (initial, query_error) = use_query_map()
		.with_untracked(|query| read_settings(|key| query.get(key).map(|v| v.to_string())));
	let settings = RwSignal::new(initial);
	let input_error = RwSignal::new(query_error);

	let output = Memo::new(move |_| {
		let settings = settings.get();
		run_pipeline(&settings.source(&custom_text.get()), &settings)
	});
	let layout = Memo::new(move |_| settings.with(|s| LayoutAlgorithm::from_name(&s.layout)));

	// The canvas stays mounted through failures and shows an empty graph meanwhile
	let model = Signal::derive(move || {
		output.with(|r| r.as_ref().map(|out| out.model.clone()).unwrap_or_default())
	});
	let layout_or_default = Signal::derive(move || layout.get().unwrap_or_default());
	let failure = Memo::new(move |_| {
		input_error
			.get()
			.or_else(|| output.with(|r| r.as_ref().err().cloned()))
			.or_else(|| layout.get().err())
	});

	let caption = move || {
		output.with(|r| {
			r.as_ref().ok().map(|out| {
				let s = &out.summary;
				format!(
					"{} species across {} sites: {} positive, {} negative, {} random and {} unclassifiable pairs ({:.1}% non-random)",
					s.items,
					s.samples,
					s.positive,
					s.negative,
					s.random,
					s.unclassifiable,
					s.non_random_percent()
				)
			})
		})
	};
	let tables_href = move || format!("/tables?{}", settings.with(AnalysisSettings::to_query));

	view! {
		<div class="fullscreen-graph">
			<NetworkCanvas model=model layout=layout_or_default fullscreen=true />
			<div class="graph-overlay">
				<h1>"Species co-occurrence"</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Scroll to zoom. Drag background to pan. Hover a species to see its links."
				</p>
				<SettingsPanel settings=settings custom_text=custom_text input_error=input_error />
				<ErrorBoundary fallback=|errors| {
					view! {
						<div class="error-list">
							<h2>"Uh oh! Something went wrong!"</h2>
							<ul>
								{move || {
									errors
										.get()
										.into_iter()
										.map(|(_, e)| view! { <li>{e.to_string()}</li> })
										.collect_view()
								}}
							</ul>
						</div>
					}
				}>
					{move || failure.get().map_or(Ok(()), Err)}
				</ErrorBoundary>
				<p class="summary">{caption}</p>
				<ul class="legend">
					<li>
						<span class="swatch" style=format!("border-top: 2px solid {EDGE_DARK_COLOR}") />
						"co-occur more often than expected"
					</li>
					<li>
						<span class="swatch" style=format!("border-top: 2px dashed {EDGE_LIGHT_COLOR}") />
						"co-occur less often than expected"
					</li>
				</ul>
				<A href=tables_href>"Node and edge tables"</A>
			</div>
		</div>
	}
}
