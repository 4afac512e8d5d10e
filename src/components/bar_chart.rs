use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::canvas;
use super::metrics::format_thousands;
use crate::flows::AreaTotals;

const LABEL_WIDTH: f64 = 140.0;
const LEGEND_HEIGHT: f64 = 28.0;
const AXIS_HEIGHT: f64 = 44.0;
const OUT_COLOR: &str = "rgba(255, 99, 71, 0.6)";
const IN_COLOR: &str = "rgba(100, 149, 237, 0.6)";

/// Grouped horizontal bars of trips out and in, busiest area on top.
///
/// Hidden canvases have no width to fit, so drawing waits for `visible`.
#[component]
pub fn TopAreasChart(
	rows: Vec<AreaTotals>,
	#[prop(into)] visible: Signal<bool>,
	#[prop(default = 400.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let rows = Rc::new(rows);
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		if !visible.get() {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = canvas::context_2d(&canvas) else {
			return;
		};
		let (w, h) = canvas::fit_to_parent(&canvas, height);
		draw(&rows, &ctx, w, h);

		if resize_cb.borrow().is_some() {
			return;
		}
		let rows_resize = rows.clone();
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas::fit_to_parent(&canvas, height);
			draw(&rows_resize, &ctx, nw, nh);
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			canvas::on_window_resize(cb);
		}
	});

	view! { <canvas node_ref=canvas_ref class="bar-chart-canvas" style="display: block;" /> }
}

/// Round a raw axis step up to 1, 2 or 5 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
	if raw <= 0.0 || !raw.is_finite() {
		return 1.0;
	}
	let magnitude = 10f64.powi(raw.log10().floor() as i32);
	let fraction = raw / magnitude;
	let nice = if fraction <= 1.0 {
		1.0
	} else if fraction <= 2.0 {
		2.0
	} else if fraction <= 5.0 {
		5.0
	} else {
		10.0
	};
	nice * magnitude
}

fn draw(rows: &[AreaTotals], ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, width, height);
	if rows.is_empty() {
		return;
	}

	let max = rows
		.iter()
		.map(|r| r.outbound.max(r.inbound))
		.max()
		.unwrap_or(0) as f64;
	let step = nice_step(max / 5.0);
	let axis_max = (max / step).ceil().max(1.0) * step;
	let plot_w = (width - LABEL_WIDTH - 20.0).max(10.0);
	let plot_h = (height - LEGEND_HEIGHT - AXIS_HEIGHT).max(10.0);
	let x_of = |v: f64| LABEL_WIDTH + v / axis_max * plot_w;

	// grid and tick labels
	ctx.set_font("11px Arial, sans-serif");
	ctx.set_text_align("center");
	ctx.set_line_width(1.0);
	let mut tick = 0.0;
	while tick <= axis_max + 1e-9 {
		let x = x_of(tick);
		ctx.set_stroke_style_str("#e3e7ef");
		ctx.begin_path();
		ctx.move_to(x, LEGEND_HEIGHT);
		ctx.line_to(x, LEGEND_HEIGHT + plot_h);
		ctx.stroke();
		ctx.set_fill_style_str("#444");
		let _ = ctx.fill_text(&format_thousands(tick as u64), x, LEGEND_HEIGHT + plot_h + 14.0);
		tick += step;
	}
	let _ = ctx.fill_text("Trips", LABEL_WIDTH + plot_w / 2.0, height - 8.0);

	let slot = plot_h / rows.len() as f64;
	let bar = (slot * 0.8 / 2.0).max(1.0);
	for (i, row) in rows.iter().enumerate() {
		let top = LEGEND_HEIGHT + i as f64 * slot + slot * 0.1;
		ctx.set_fill_style_str(OUT_COLOR);
		ctx.fill_rect(LABEL_WIDTH, top, x_of(row.outbound as f64) - LABEL_WIDTH, bar);
		ctx.set_fill_style_str(IN_COLOR);
		ctx.fill_rect(LABEL_WIDTH, top + bar, x_of(row.inbound as f64) - LABEL_WIDTH, bar);

		ctx.set_fill_style_str("#222");
		ctx.set_text_align("end");
		let _ = ctx.fill_text(&row.area, LABEL_WIDTH - 8.0, top + bar + 4.0);
	}

	// legend
	ctx.set_text_align("start");
	for (i, (label, color)) in [("Trips out", OUT_COLOR), ("Trips in", IN_COLOR)]
		.into_iter()
		.enumerate()
	{
		let x = LABEL_WIDTH + i as f64 * 110.0;
		ctx.set_fill_style_str(color);
		ctx.fill_rect(x, 8.0, 14.0, 12.0);
		ctx.set_fill_style_str("#222");
		let _ = ctx.fill_text(label, x + 20.0, 18.0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn steps_are_round_numbers() {
		assert_eq!(nice_step(0.0), 1.0);
		assert_eq!(nice_step(7.0), 10.0);
		assert_eq!(nice_step(130.0), 200.0);
		assert_eq!(nice_step(4200.0), 5000.0);
		assert_eq!(nice_step(10000.0), 10000.0);
	}
}
