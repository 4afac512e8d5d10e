use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{CLICK_SLOP, MapState};
use crate::components::canvas;
use crate::flows::{Dashboard, Selection};

/// Clickable map of every catalog area; the selection is drawn in red.
#[component]
pub fn AreaMap(
	dashboard: Arc<Dashboard>,
	selection: RwSignal<Selection>,
	#[prop(default = 500.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<MapState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	let dashboard_click = dashboard.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = canvas::context_2d(&canvas) else {
			return;
		};
		let (w, h) = canvas::fit_to_parent(&canvas, height);
		let selected = selection.with_untracked(|s| s.name().to_string());
		*state_init.borrow_mut() = Some(MapState::new(dashboard.clone(), selected, w, h));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas::fit_to_parent(&canvas_resize, height);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			canvas::on_window_resize(cb);
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				canvas::request_frame(cb);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			canvas::request_frame(cb);
		}
	});

	// Selections made elsewhere (the sidebar list) restart the highlight.
	let state_sel = state.clone();
	Effect::new(move |_| {
		let name = selection.with(|s| s.name().to_string());
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.select(&name);
		}
	});

	let pointer = move |ev: &MouseEvent| {
		canvas_ref
			.get()
			.map(|c| canvas::pointer_position(&c, ev))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan = super::state::PanState {
				active: true,
				moved: false,
				start_x: x,
				start_y: y,
				transform_start_x: s.transform.x,
				transform_start_y: s.transform.y,
			};
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if dx.hypot(dy) > CLICK_SLOP {
					s.pan.moved = true;
				}
				if s.pan.moved {
					s.transform.x = s.pan.transform_start_x + dx;
					s.transform.y = s.pan.transform_start_y + dy;
				}
			} else {
				s.hovered = s.area_at_position(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		let clicked = match *state_mu.borrow_mut() {
			Some(ref mut s) => {
				let was_click = s.pan.active && !s.pan.moved;
				s.pan.active = false;
				if was_click { s.area_at_position(x, y) } else { None }
			}
			None => None,
		};
		// The borrow is released before the selection effect runs.
		if let Some(name) = clicked {
			selection.update(|sel| {
				sel.select(&name, &dashboard_click.catalog);
			});
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
			s.hovered = None;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let state_dbl = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dbl.borrow_mut() {
			s.fit();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="area-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="display: block; cursor: pointer;"
		/>
	}
}
