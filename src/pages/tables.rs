use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use super::{CustomMatrix, read_settings};
use crate::analysis::{AnalysisSettings, PipelineOutput, run_pipeline};

/// Node table, edge table and summary for the settings in the query string.
#[component]
pub fn Tables() -> impl IntoView {
	let CustomMatrix(custom_text) = expect_context::<CustomMatrix>();
	let query = use_query_map();
	let settings = Memo::new(move |_| {
		query.with(|query| read_settings(|key| query.get(key).map(|v| v.to_string())))
	});

	let output = Memo::new(move |_| {
		let (settings, query_error) = settings.get();
		if let Some(e) = query_error {
			return Err(e);
		}
		run_pipeline(&settings.source(&custom_text.get()), &settings)
	});
	let home_href = move || format!("/?{}", settings.with(|(s, _)| s.to_query()));

	view! {
		<div class="tables-page">
			<A href=home_href>"Back to the network"</A>
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
				{move || output.get().map(|out| analysis_tables(settings.get().0, out))}
			</ErrorBoundary>
		</div>
	}
}

fn analysis_tables(settings: AnalysisSettings, out: PipelineOutput) -> impl IntoView {
	let PipelineOutput {
		model,
		records,
		summary,
		..
	} = out;
	let json = model.to_json().unwrap_or_else(|e| e.to_string());

	let summary_rows = [
		("Species", summary.items.to_string()),
		("Sites", summary.samples.to_string()),
		("Pairs analysed", summary.pairs_analyzed.to_string()),
		("Pairs expected to co-occur less than once", summary.pairs_excluded.to_string()),
		("Positive", summary.positive.to_string()),
		("Negative", summary.negative.to_string()),
		("Random", summary.random.to_string()),
		("Unclassifiable", summary.unclassifiable.to_string()),
		("Non-random", format!("{:.1}%", summary.non_random_percent())),
	]
	.into_iter()
	.map(|(name, value)| view! { <tr><th>{name}</th><td>{value}</td></tr> })
	.collect_view();

	let node_rows = model
		.nodes
		.iter()
		.map(|node| {
			view! {
				<tr>
					<td>{node.id}</td>
					<td>{node.label.clone()}</td>
					<td>{node.color.clone()}</td>
					<td>{node.shadow.to_string()}</td>
					<td>{model.degree(node.id)}</td>
				</tr>
			}
		})
		.collect_view();

	// Edges are built one per record, in record order
	let edge_rows = model
		.edges
		.iter()
		.zip(&records)
		.map(|(edge, record)| {
			view! {
				<tr>
					<td>{edge.from}</td>
					<td>{edge.to}</td>
					<td>{record.first_name.clone().unwrap_or_default()}</td>
					<td>{record.second_name.clone().unwrap_or_default()}</td>
					<td>{record.observed}</td>
					<td>{format!("{:.2}", record.expected)}</td>
					<td>{format!("{:.4}", record.p_low)}</td>
					<td>{format!("{:.4}", record.p_high)}</td>
					<td>{format!("{:+.3}", record.effect_size())}</td>
					<td>{edge.color.clone()}</td>
					<td>{edge.dashed.to_string()}</td>
				</tr>
			}
		})
		.collect_view();

	view! {
		<h1>"Co-occurrence tables"</h1>
		<p class="subtitle">{subtitle(&settings)}</p>

		<h2>"Summary"</h2>
		<table class="summary-table">{summary_rows}</table>

		<h2>"Nodes"</h2>
		<table>
			<thead>
				<tr><th>"id"</th><th>"label"</th><th>"color"</th><th>"shadow"</th><th>"links"</th></tr>
			</thead>
			<tbody>{node_rows}</tbody>
		</table>

		<h2>"Edges"</h2>
		<table>
			<thead>
				<tr>
					<th>"from"</th><th>"to"</th><th>"first"</th><th>"second"</th>
					<th>"observed"</th><th>"expected"</th><th>"p (low)"</th><th>"p (high)"</th>
					<th>"effect"</th><th>"color"</th><th>"dashed"</th>
				</tr>
			</thead>
			<tbody>{edge_rows}</tbody>
		</table>

		<h2>"JSON"</h2>
		<pre class="graph-json">{json}</pre>
	}
}

fn subtitle(settings: &AnalysisSettings) -> String {
	format!(
		"Dataset `{}`, significance threshold {}",
		settings.dataset, settings.alpha
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn subtitle_names_dataset_and_threshold() {
		let settings = AnalysisSettings {
			dataset: "demo".into(),
			alpha: 0.01,
			..AnalysisSettings::default()
		};
		assert_eq!(subtitle(&settings), "Dataset `demo`, significance threshold 0.01");
	}
}
