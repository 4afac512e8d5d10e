//! Three-column placement: origins on the left, the selected area in the
//! middle, destinations on the right. An area with flows both ways gets a
//! box in each outer column.

use crate::flows::{Direction, SankeyGraph, SankeyLink};

pub const NODE_THICKNESS: f64 = 25.0;
pub const NODE_PAD: f64 = 15.0;
const MARGIN_X: f64 = 10.0;
const MARGIN_Y: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
	Origin,
	Selected,
	Destination,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeBox {
	/// Index into the graph's node list.
	pub node: usize,
	pub column: Column,
	pub x: f64,
	pub y: f64,
	pub height: f64,
	pub value: u64,
}

impl NodeBox {
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x && x <= self.x + NODE_THICKNESS && y >= self.y && y <= self.y + self.height
	}
}

/// A ribbon from the right edge of one box to the left edge of another.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
	pub direction: Direction,
	pub value: u32,
	pub from_box: usize,
	pub to_box: usize,
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	pub thickness: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SankeyLayout {
	pub boxes: Vec<NodeBox>,
	pub bands: Vec<Band>,
}

impl SankeyLayout {
	pub fn box_at(&self, x: f64, y: f64) -> Option<usize> {
		self.boxes.iter().position(|b| b.contains(x, y))
	}

	pub fn is_empty(&self) -> bool {
		self.bands.is_empty()
	}
}

pub fn layout(graph: &SankeyGraph, width: f64, height: f64) -> SankeyLayout {
	if graph.is_empty() {
		return SankeyLayout::default();
	}
	let links = graph.links();
	let inbound: Vec<_> = links.iter().filter(|l| l.direction == Direction::Inbound).collect();
	let outbound: Vec<_> = links.iter().filter(|l| l.direction == Direction::Outbound).collect();
	let in_total: u64 = inbound.iter().map(|l| l.value as u64).sum();
	let out_total: u64 = outbound.iter().map(|l| l.value as u64).sum();

	let avail = (height - 2.0 * MARGIN_Y).max(1.0);
	let longest = inbound.len().max(outbound.len());
	let pad = if longest > 1 {
		NODE_PAD.min(avail * 0.3 / (longest - 1) as f64)
	} else {
		0.0
	};
	let column_scale = |count: usize, total: u64| {
		if total == 0 {
			f64::INFINITY
		} else {
			(avail - pad * count.saturating_sub(1) as f64) / total as f64
		}
	};
	let scale = column_scale(inbound.len(), in_total)
		.min(column_scale(outbound.len(), out_total))
		.min(avail / in_total.max(out_total) as f64);
	let scale = if scale.is_finite() { scale } else { 0.0 };

	let center_x = (width - NODE_THICKNESS) / 2.0;
	let center_h = in_total.max(out_total) as f64 * scale;
	let mut boxes = vec![NodeBox {
		node: 0,
		column: Column::Selected,
		x: center_x,
		y: (height - center_h) / 2.0,
		height: center_h,
		value: in_total.max(out_total),
	}];
	let center_y = boxes[0].y;
	let mut bands = Vec::with_capacity(links.len());

	let mut stack_column = |column: Column, x: f64, side: &[&SankeyLink]| {
		let total: u64 = side.iter().map(|l| l.value as u64).sum();
		let column_h = total as f64 * scale + pad * side.len().saturating_sub(1) as f64;
		let mut y = (height - column_h) / 2.0;
		// stacked at the selected box, centred within it
		let mut port = center_y + (center_h - total as f64 * scale) / 2.0;
		for link in side {
			let thickness = link.value as f64 * scale;
			let (node, band) = match column {
				Column::Origin => (
					link.source,
					Band {
						direction: link.direction,
						value: link.value,
						from_box: boxes.len(),
						to_box: 0,
						x0: x + NODE_THICKNESS,
						y0: y,
						x1: center_x,
						y1: port,
						thickness,
					},
				),
				_ => (
					link.target,
					Band {
						direction: link.direction,
						value: link.value,
						from_box: 0,
						to_box: boxes.len(),
						x0: center_x + NODE_THICKNESS,
						y0: port,
						x1: x,
						y1: y,
						thickness,
					},
				),
			};
			boxes.push(NodeBox {
				node,
				column,
				x,
				y,
				height: thickness,
				value: link.value as u64,
			});
			bands.push(band);
			y += thickness + pad;
			port += thickness;
		}
	};
	stack_column(Column::Origin, MARGIN_X, &inbound);
	stack_column(
		Column::Destination,
		width - MARGIN_X - NODE_THICKNESS,
		&outbound,
	);

	SankeyLayout { boxes, bands }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flows::{FlowMatrix, FlowSummary};

	fn abc_graph() -> SankeyGraph {
		let areas: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
		let matrix = FlowMatrix::from_edges(
			&areas,
			[
				("A", "B", 1000),
				("A", "C", 500),
				("B", "A", 800),
				("B", "C", 600),
				("C", "A", 900),
				("C", "B", 400),
			],
		);
		SankeyGraph::build(&FlowSummary::for_area(&matrix, "A"), &areas, 10)
	}

	#[test]
	fn places_three_columns() {
		let layout = layout(&abc_graph(), 600.0, 450.0);
		assert_eq!(layout.boxes.len(), 5);
		assert_eq!(layout.bands.len(), 4);

		let selected = &layout.boxes[0];
		assert_eq!(selected.column, Column::Selected);
		assert_eq!(selected.value, 1700);
		let origins: Vec<usize> = layout
			.boxes
			.iter()
			.filter(|b| b.column == Column::Origin)
			.map(|b| b.node)
			.collect();
		assert_eq!(origins, [1, 2]);

		for b in &layout.boxes {
			assert!(b.y >= 0.0 && b.y + b.height <= 450.0, "{b:?}");
			assert!(b.x >= 0.0 && b.x + NODE_THICKNESS <= 600.0, "{b:?}");
		}
	}

	#[test]
	fn band_thickness_follows_value() {
		let layout = layout(&abc_graph(), 600.0, 450.0);
		let scale = layout.boxes[0].height / 1700.0;
		for band in &layout.bands {
			assert!((band.thickness - band.value as f64 * scale).abs() < 1e-9);
		}
		// inbound ribbons end inside the selected box
		let selected = &layout.boxes[0];
		for band in layout.bands.iter().filter(|b| b.direction == Direction::Inbound) {
			assert!(band.y1 >= selected.y - 1e-9);
			assert!(band.y1 + band.thickness <= selected.y + selected.height + 1e-9);
		}
	}

	#[test]
	fn hit_testing_and_empty_graphs() {
		let layout = layout(&abc_graph(), 600.0, 450.0);
		let b = &layout.boxes[3];
		assert_eq!(layout.box_at(b.x + 1.0, b.y + 1.0), Some(3));
		assert_eq!(layout.box_at(300.0, 1.0), None);

		assert!(super::layout(&SankeyGraph::default(), 600.0, 450.0).is_empty());
	}
}
