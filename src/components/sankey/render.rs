use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{Band, Column, NODE_THICKNESS};
use super::state::SankeyState;
use crate::components::metrics::format_thousands;
use crate::flows::Direction;

const SELECTED_COLOR: &str = "#FF6347";
const OTHER_COLOR: &str = "#6495ED";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn band_rgb(direction: Direction) -> &'static str {
	match direction {
		Direction::Outbound => "255, 99, 71",
		Direction::Inbound => "100, 149, 237",
	}
}

pub fn render(state: &SankeyState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	if state.layout.is_empty() {
		ctx.set_fill_style_str("#5b6b8c");
		ctx.set_font("14px Arial, sans-serif");
		ctx.set_text_align("center");
		let _ = ctx.fill_text("No flows to display", state.width / 2.0, state.height / 2.0);
		ctx.set_text_align("start");
		return;
	}

	draw_bands(state, ctx);
	draw_nodes(state, ctx);
}

fn ribbon(ctx: &CanvasRenderingContext2d, band: &Band) {
	let mid = (band.x0 + band.x1) / 2.0;
	ctx.begin_path();
	ctx.move_to(band.x0, band.y0);
	ctx.bezier_curve_to(mid, band.y0, mid, band.y1, band.x1, band.y1);
	ctx.line_to(band.x1, band.y1 + band.thickness);
	ctx.bezier_curve_to(
		mid,
		band.y1 + band.thickness,
		mid,
		band.y0 + band.thickness,
		band.x0,
		band.y0 + band.thickness,
	);
	ctx.close_path();
}

fn draw_bands(state: &SankeyState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let (dash, gap) = (10.0, 6.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for (idx, band) in state.layout.bands.iter().enumerate() {
		// t=0: every band at 0.4; t=1: highlighted 0.65, others 0.12
		let alpha = if !state.has_active_highlight() {
			0.4
		} else if state.is_band_highlighted(idx) {
			0.4 + 0.25 * t
		} else {
			0.4 - 0.28 * t
		};
		let rgb = band_rgb(band.direction);
		ribbon(ctx, band);
		ctx.set_fill_style_str(&format!("rgba({rgb}, {alpha})"));
		ctx.fill();

		// moving dashes along the centre line show the direction of travel
		let half = band.thickness / 2.0;
		let mid = (band.x0 + band.x1) / 2.0;
		ctx.set_stroke_style_str(&format!("rgba({rgb}, {})", (alpha + 0.3).min(1.0)));
		ctx.set_line_width((band.thickness * 0.15).clamp(0.5, 3.0));
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(band.x0, band.y0 + half);
		ctx.bezier_curve_to(mid, band.y0 + half, mid, band.y1 + half, band.x1, band.y1 + half);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &SankeyState, ctx: &CanvasRenderingContext2d) {
	let nodes = state.graph.nodes();
	ctx.set_font("14px Arial, sans-serif");
	for (idx, node_box) in state.layout.boxes.iter().enumerate() {
		let Some(label) = nodes.get(node_box.node) else {
			continue;
		};
		let color = if node_box.column == Column::Selected {
			SELECTED_COLOR
		} else {
			OTHER_COLOR
		};
		ctx.set_fill_style_str(color);
		ctx.fill_rect(node_box.x, node_box.y, NODE_THICKNESS, node_box.height.max(1.0));
		ctx.set_stroke_style_str("black");
		ctx.set_line_width(0.5);
		ctx.stroke_rect(node_box.x, node_box.y, NODE_THICKNESS, node_box.height.max(1.0));

		let text = if state.hover.node_box == Some(idx) {
			format!("{label}: {}", format_thousands(node_box.value))
		} else {
			label.clone()
		};
		let y = node_box.y + node_box.height / 2.0 + 5.0;
		ctx.set_fill_style_str("black");
		match node_box.column {
			Column::Origin => {
				ctx.set_text_align("start");
				let _ = ctx.fill_text(&text, node_box.x + NODE_THICKNESS + 6.0, y);
			}
			Column::Destination => {
				ctx.set_text_align("end");
				let _ = ctx.fill_text(&text, node_box.x - 6.0, y);
			}
			Column::Selected => {
				ctx.set_text_align("center");
				let _ = ctx.fill_text(
					&text,
					node_box.x + NODE_THICKNESS / 2.0,
					(node_box.y - 6.0).max(14.0),
				);
			}
		}
	}
	ctx.set_text_align("start");
}
