use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Uh oh!"</h1>
			<p>"We couldn't find that page."</p>
			<A href="/">"Back to the network"</A>
		</div>
	}
}
