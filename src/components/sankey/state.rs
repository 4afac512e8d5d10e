use crate::flows::SankeyGraph;

use super::layout::{SankeyLayout, layout};

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node_box: Option<usize>,
	pub highlight_t: f64,
	pub prev_box: Option<usize>,
}

pub struct SankeyState {
	pub graph: SankeyGraph,
	pub layout: SankeyLayout,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl SankeyState {
	pub fn new(graph: SankeyGraph, width: f64, height: f64) -> Self {
		let layout = layout(&graph, width, height);
		Self {
			graph,
			layout,
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	pub fn set_graph(&mut self, graph: SankeyGraph) {
		self.layout = layout(&graph, self.width, self.height);
		self.graph = graph;
		self.hover = HoverState::default();
	}

	pub fn set_hover(&mut self, node_box: Option<usize>) {
		if self.hover.node_box == node_box {
			return;
		}
		if node_box.is_none() {
			self.hover.prev_box = self.hover.node_box;
		} else {
			self.hover.prev_box = None;
		}
		self.hover.node_box = node_box;
	}

	fn focus(&self) -> Option<usize> {
		self.hover.node_box.or(self.hover.prev_box)
	}

	/// Whether a band touches the hovered box.
	pub fn is_band_highlighted(&self, band: usize) -> bool {
		let Some(focus) = self.focus() else {
			return false;
		};
		let band = &self.layout.bands[band];
		// hovering the selected area lights up everything
		focus == 0 || band.from_box == focus || band.to_box == focus
	}

	pub fn has_active_highlight(&self) -> bool {
		self.focus().is_some()
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		let target = if self.hover.node_box.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * 1.8 * dt;
		if self.hover.node_box.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
			self.hover.prev_box = None;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.layout = layout(&self.graph, width, height);
	}
}
