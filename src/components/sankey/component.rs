use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::SankeyState;
use crate::components::canvas;
use crate::flows::SankeyGraph;

/// Animated Sankey diagram of the selected area's flows.
#[component]
pub fn SankeyCanvas(
	#[prop(into)] graph: Signal<SankeyGraph>,
	#[prop(default = 450.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<SankeyState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = canvas::context_2d(&canvas) else {
			return;
		};
		let (w, h) = canvas::fit_to_parent(&canvas, height);
		*state_init.borrow_mut() = Some(SankeyState::new(graph.get_untracked(), w, h));

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

	let state_graph = state.clone();
	Effect::new(move |_| {
		let next = graph.get();
		if let Some(ref mut s) = *state_graph.borrow_mut() {
			s.set_graph(next);
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas::pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let hovered = s.layout.box_at(x, y);
			s.set_hover(hovered);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="sankey-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
