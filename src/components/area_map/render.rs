use web_sys::CanvasRenderingContext2d;

use super::state::MapState;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &MapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#f4f6fa");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let t = ease_out_cubic(state.highlight_t);
	let catalog = &state.dashboard.catalog;

	// selected area last so its outline sits on top
	let order = catalog
		.areas()
		.iter()
		.filter(|a| a.name != state.selected)
		.chain(catalog.get(&state.selected));
	for area in order {
		let is_selected = area.name == state.selected;
		let is_hovered = state.hovered.as_deref() == Some(area.name.as_str());

		let (fill, stroke, width) = if is_selected {
			(
				format!("rgba(255, 0, 0, {})", 0.15 + 0.25 * t),
				"red".to_string(),
				1.0 + 2.0 * t,
			)
		} else if is_hovered {
			(
				"rgba(100, 149, 237, 0.35)".to_string(),
				"blue".to_string(),
				1.5,
			)
		} else {
			(
				"rgba(100, 149, 237, 0.2)".to_string(),
				"blue".to_string(),
				1.0,
			)
		};

		for polygon in area.boundary.iter() {
			let mut coords = polygon.exterior().coords();
			let Some(first) = coords.next() else {
				continue;
			};
			ctx.begin_path();
			let (x, y) = state.to_screen(first.x, first.y);
			ctx.move_to(x, y);
			for c in coords {
				let (x, y) = state.to_screen(c.x, c.y);
				ctx.line_to(x, y);
			}
			ctx.close_path();
			ctx.set_fill_style_str(&fill);
			ctx.fill();
			ctx.set_stroke_style_str(&stroke);
			ctx.set_line_width(width);
			ctx.stroke();
		}
	}

	draw_labels(state, ctx);
}

fn draw_labels(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	ctx.set_text_align("center");
	ctx.set_font("11px sans-serif");
	for (area, anchor) in state.dashboard.catalog.areas().iter().zip(&state.labels) {
		let Some((x, y)) = anchor else {
			continue;
		};
		let (sx, sy) = (state.transform.x + x * k, state.transform.y + y * k);
		let color = if area.name == state.selected {
			"#7a0000"
		} else {
			"#1d2b4f"
		};
		ctx.set_fill_style_str(color);
		let _ = ctx.fill_text(&area.name, sx, sy + 4.0);
	}
	ctx.set_text_align("start");

	if let Some(name) = &state.hovered {
		ctx.set_font("bold 13px sans-serif");
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
		ctx.fill_rect(8.0, 8.0, 14.0 + 7.5 * name.chars().count() as f64, 24.0);
		ctx.set_fill_style_str("#1d2b4f");
		let _ = ctx.fill_text(name, 15.0, 25.0);
	}
}
