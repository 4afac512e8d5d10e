//! Leptos client-side mobility dashboard: app wiring, startup load and routes.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Modules
mod components;
pub mod config;
pub mod flows;
mod pages;

// Top-Level pages
use crate::flows::{CatalogError, Dashboard, FlowCache};
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

// Pulled in only for its `js` feature on wasm32.
#[cfg(target_arch = "wasm32")]
use getrandom as _;

/// Outcome of the startup load, shared with the pages through context.
pub type LoadedDashboard = Result<Arc<Dashboard>, Arc<CatalogError>>;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Load the embedded catalog and generate its flows.
pub fn load_dashboard() -> LoadedDashboard {
	let mut rng = ChaCha8Rng::from_entropy();
	let mut cache = FlowCache::default();
	match Dashboard::load(config::DATASET, config::NAME_FIELD, &mut cache, &mut rng) {
		Ok(dashboard) => {
			info!(
				"dashboard ready: {} areas, {} connections",
				dashboard.catalog.len(),
				dashboard.flows.edge_count()
			);
			Ok(Arc::new(dashboard))
		}
		Err(err) => {
			error!("could not load {}: {err}", config::DATASET_PATH);
			Err(Arc::new(err))
		}
	}
}

/// An app router which renders the dashboard and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(load_dashboard());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Mobility Dashboard" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
