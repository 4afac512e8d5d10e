use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, MouseEvent, Url};

use super::metrics::{format_signed, format_thousands};
use crate::flows::export::{export_file_name, inbound_csv, outbound_csv, share_rows};
use crate::flows::{AreaTotals, Direction, FlowSummary};

/// Outbound or inbound flows of the selection with a CSV download button.
#[component]
pub fn FlowTable(
	direction: Direction,
	#[prop(into)] summary: Signal<FlowSummary>,
) -> impl IntoView {
	let heading = match direction {
		Direction::Outbound => "Destination",
		Direction::Inbound => "Origin",
	};
	let empty_message = match direction {
		Direction::Outbound => "No outbound trips",
		Direction::Inbound => "No inbound trips",
	};
	let entries = move || {
		summary.with(|s| match direction {
			Direction::Outbound => s.outbound.clone(),
			Direction::Inbound => s.inbound.clone(),
		})
	};

	let on_download = move |_: MouseEvent| {
		let (area, csv) = summary.with(|s| {
			let csv = match direction {
				Direction::Outbound => outbound_csv(s),
				Direction::Inbound => inbound_csv(s),
			};
			(s.selected.clone(), csv)
		});
		let result = csv.map_err(|err| err.to_string()).and_then(|bytes| {
			download(&export_file_name(direction, &area), "text/csv", &bytes)
				.map_err(|err| format!("{err:?}"))
		});
		if let Err(err) = result {
			error!("csv export for {area} failed: {err}");
		}
	};

	move || {
		let rows = share_rows(&entries());
		if rows.is_empty() {
			return view! { <p class="info">{empty_message}</p> }.into_any();
		}
		view! {
			<table class="flow-table">
				<thead>
					<tr>
						<th>{heading}</th>
						<th class="num">"Trips"</th>
						<th class="num">"Share (%)"</th>
					</tr>
				</thead>
				<tbody>
					{rows
						.into_iter()
						.map(|row| {
							view! {
								<tr>
									<td>{row.area}</td>
									<td class="num">{format_thousands(row.trips as u64)}</td>
									<td class="num">{format!("{:.1}", row.share_pct)}</td>
								</tr>
							}
						})
						.collect_view()}
				</tbody>
			</table>
			<button class="download" on:click=on_download>
				"Download data (CSV)"
			</button>
		}
		.into_any()
	}
}

/// Every area's totals, busiest first.
#[component]
pub fn AreaOverviewTable(rows: Vec<AreaTotals>) -> impl IntoView {
	view! {
		<table class="flow-table">
			<thead>
				<tr>
					<th>"Area"</th>
					<th class="num">"Trips out"</th>
					<th class="num">"Trips in"</th>
					<th class="num">"Total"</th>
					<th class="num">"Net"</th>
				</tr>
			</thead>
			<tbody>
				{rows
					.into_iter()
					.map(|row| {
						view! {
							<tr>
								<td>{row.area.clone()}</td>
								<td class="num">{format_thousands(row.outbound)}</td>
								<td class="num">{format_thousands(row.inbound)}</td>
								<td class="num">{format_thousands(row.total())}</td>
								<td class="num">{format_signed(row.net())}</td>
							</tr>
						}
					})
					.collect_view()}
			</tbody>
		</table>
	}
}

/// Offer `bytes` as a file download through a temporary object URL.
fn download(file_name: &str, mime: &str, bytes: &[u8]) -> Result<(), JsValue> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	Url::revoke_object_url(&url)
}
