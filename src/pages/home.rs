use std::sync::Arc;

use leptos::prelude::*;

use crate::LoadedDashboard;
use crate::components::area_map::AreaMap;
use crate::components::bar_chart::TopAreasChart;
use crate::components::flow_table::{AreaOverviewTable, FlowTable};
use crate::components::metrics::{Metric, format_signed, format_thousands};
use crate::components::sankey::SankeyCanvas;
use crate::config::{
	DATASET_PATH, MAX_SANKEY_OTHERS, NAME_FIELD, TOP_AREAS_CHART, dataset_file_name,
};
use crate::flows::{
	AreaTotals, CatalogError, Dashboard, Direction, FlowSummary, SankeyGraph, Selection,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
	Outbound,
	Inbound,
	AllAreas,
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	match use_context::<LoadedDashboard>() {
		Some(Ok(dashboard)) => view! { <DashboardView dashboard /> }.into_any(),
		Some(Err(err)) => view! { <LoadError err /> }.into_any(),
		None => view! {
			<div class="load-error">
				<h1>"Uh oh! Something went wrong!"</h1>
				<p class="error">"The dashboard was not initialised."</p>
			</div>
		}
		.into_any(),
	}
}

#[component]
fn LoadError(err: Arc<CatalogError>) -> impl IntoView {
	view! {
		<div class="load-error">
			<h1>"Mobility Dashboard"</h1>
			<p class="error">{format!("Could not load {DATASET_PATH}: {err}")}</p>
			<p class="info">{err.hint()}</p>
		</div>
	}
}

#[component]
fn DashboardView(dashboard: Arc<Dashboard>) -> impl IntoView {
	let selection = RwSignal::new(Selection::new(&dashboard.catalog));

	let d = dashboard.clone();
	let summary = Memo::new(move |_| selection.with(|s| d.summary(s)));
	let d = dashboard.clone();
	let graph = Memo::new(move |_| summary.with(|s| d.sankey(s, MAX_SANKEY_OTHERS)));

	let overview = AreaTotals::overview(&dashboard.flows);
	let top: Vec<AreaTotals> = overview.iter().take(TOP_AREAS_CHART).cloned().collect();
	let area_count = dashboard.catalog.len();
	let connections = format_thousands(dashboard.flows.edge_count() as u64);
	let crs = dashboard.catalog.source_crs().to_string();
	let names = dashboard.catalog.names().to_vec();

	let selected_name = move || selection.with(|s| s.name().to_string());
	let d = dashboard.clone();
	let on_select = move |ev: web_sys::Event| {
		let name = event_target_value(&ev);
		selection.update(|s| {
			s.select(&name, &d.catalog);
		});
	};

	let tab = RwSignal::new(Tab::Outbound);
	let tab_button = move |which: Tab, label: &'static str| {
		view! {
			<button class="tab" class:active=move || tab.get() == which on:click=move |_| tab.set(which)>
				{label}
			</button>
		}
	};

	// panels stay mounted so the canvases keep their listeners
	let panel_display = move |which: Tab| {
		move || if tab.get() == which { "block" } else { "none" }
	};

	let caption = move || {
		graph.with(|g| {
			let shown = g.nodes().len().saturating_sub(1);
			format!("Showing top {shown} of {} connections", shown + g.hidden_count())
		})
	};

	view! {
		<div class="dashboard">
			<aside class="sidebar">
				<h2>"Settings"</h2>
				<h3>"Data"</h3>
				<Metric label="Areas" value=area_count.to_string() />
				<Metric label="Connections" value=connections.clone() />
				<hr />
				<label for="area-select">"Select area"</label>
				<select id="area-select" on:change=on_select prop:value=selected_name>
					{names
						.into_iter()
						.map(|name| {
							let label = name.clone();
							view! { <option value=name>{label}</option> }
						})
						.collect_view()}
				</select>
				<hr />
				<h3>"Dataset"</h3>
				<p class="caption">"File: " {dataset_file_name()}</p>
				<p class="caption">"Name field: " {NAME_FIELD}</p>
				<p class="caption">"Source CRS: " {crs}</p>
				<hr />
				<h3>"About"</h3>
				<p class="info">
					"Trip flows between areas. Pick an area on the map or in the list to see where its trips go and where they come from. The numbers are randomly generated for demonstration."
				</p>
			</aside>

			<main class="content">
				<h1>"Mobility Dashboard"</h1>
				<p class="subtitle">{format!("Trip flows between {area_count} areas")}</p>

				<div class="columns">
					<section class="column">
						<h2>"Area map"</h2>
						<p class="caption">"Click an area to see its trip flows. Drag to pan, scroll to zoom."</p>
						<AreaMap dashboard=dashboard.clone() selection />
					</section>

					<section class="column">
						<h2>{move || format!("Trip flows: {}", selected_name())}</h2>
						<div class="metrics">
							<Metric
								label="Trips out"
								value=Signal::derive(move || format_thousands(summary.with(|s| s.outbound_total)))
							/>
							<Metric
								label="Trips in"
								value=Signal::derive(move || format_thousands(summary.with(|s| s.inbound_total)))
							/>
							<Metric
								label="Net"
								value=Signal::derive(move || format_signed(summary.with(FlowSummary::net)))
							/>
						</div>
						<SankeyCanvas graph />
						<Show when=move || graph.with(SankeyGraph::truncated)>
							<p class="caption">{caption}</p>
						</Show>
					</section>
				</div>

				<hr />
				<h2>"Detailed overview"</h2>
				<div class="tabs">
					{tab_button(Tab::Outbound, "Outbound trips")}
					{tab_button(Tab::Inbound, "Inbound trips")}
					{tab_button(Tab::AllAreas, "All areas")}
				</div>
				<div class="tab-panel" style:display=panel_display(Tab::Outbound)>
					<FlowTable direction=Direction::Outbound summary />
				</div>
				<div class="tab-panel" style:display=panel_display(Tab::Inbound)>
					<FlowTable direction=Direction::Inbound summary />
				</div>
				<div class="tab-panel" style:display=panel_display(Tab::AllAreas)>
					<p><b>"All areas in the dataset:"</b></p>
					<AreaOverviewTable rows=overview />
					<p><b>{format!("Top {TOP_AREAS_CHART} areas by total trips:")}</b></p>
					<TopAreasChart rows=top visible=Signal::derive(move || tab.get() == Tab::AllAreas) />
				</div>

				<hr />
				<footer class="caption">
					{format!(
						"{} | {area_count} areas | {connections} connections | Randomly generated data for demonstration",
						dataset_file_name(),
					)}
				</footer>
			</main>
		</div>
	}
}
