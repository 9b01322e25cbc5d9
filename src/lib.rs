//! Leptos client-side app wiring and routes.
//!
//! The [`analysis`] module holds the co-occurrence pipeline and is usable on
//! its own; the rest of the crate draws its output in the browser.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod analysis;
mod components;
mod pages;

// Top-Level pages
use crate::pages::CustomMatrix;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::tables::Tables;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the network view, the tables and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	// The custom matrix outlives page switches
	let starter = analysis::datasets::builtin_text("demo").unwrap_or_default();
	provide_context(CustomMatrix(RwSignal::new(starter.to_string())));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Species co-occurrence network" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/tables") view=Tables />
			</Routes>
		</Router>
	}
}
