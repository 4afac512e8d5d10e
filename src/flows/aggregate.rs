//! Per-area views over the flow matrix.

use super::generator::FlowMatrix;

/// Trips between the selected area and one counterpart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowEntry {
	/// The counterpart area.
	pub area: String,
	/// Trips on this relation.
	pub trips: u32,
}

/// Outbound and inbound flows of one selected area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowSummary {
	/// The area the summary is for.
	pub selected: String,
	/// Destinations of trips leaving the selection, in area order.
	pub outbound: Vec<FlowEntry>,
	/// Origins of trips arriving at the selection, in area order.
	pub inbound: Vec<FlowEntry>,
	/// Sum of outbound trips.
	pub outbound_total: u64,
	/// Sum of inbound trips.
	pub inbound_total: u64,
}

impl FlowSummary {
	/// Scan the selection's row and column. Unknown names yield an empty summary.
	pub fn for_area(matrix: &FlowMatrix, selected: &str) -> Self {
		let Some(idx) = matrix.index_of(selected) else {
			return Self {
				selected: selected.to_string(),
				..Self::default()
			};
		};
		let entry = |(other, trips): (usize, u32)| FlowEntry {
			area: matrix.areas()[other].clone(),
			trips,
		};
		let outbound: Vec<FlowEntry> = matrix.outgoing(idx).map(entry).collect();
		let inbound: Vec<FlowEntry> = matrix.incoming(idx).map(entry).collect();
		Self {
			selected: selected.to_string(),
			outbound_total: total(&outbound),
			inbound_total: total(&inbound),
			outbound,
			inbound,
		}
	}

	/// Inbound minus outbound trips; negative for net exporters.
	pub fn net(&self) -> i64 {
		self.inbound_total as i64 - self.outbound_total as i64
	}

	/// No flows in either direction.
	pub fn is_empty(&self) -> bool {
		self.outbound.is_empty() && self.inbound.is_empty()
	}
}

fn total(entries: &[FlowEntry]) -> u64 {
	entries.iter().map(|e| e.trips as u64).sum()
}

/// Trip totals of one area, as listed in the all-areas table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaTotals {
	/// The area.
	pub area: String,
	/// Trips leaving the area.
	pub outbound: u64,
	/// Trips arriving in the area.
	pub inbound: u64,
}

impl AreaTotals {
	/// Outbound plus inbound.
	pub fn total(&self) -> u64 {
		self.outbound + self.inbound
	}

	/// Inbound minus outbound.
	pub fn net(&self) -> i64 {
		self.inbound as i64 - self.outbound as i64
	}

	/// Totals for every area, busiest first. Ties keep area order.
	pub fn overview(matrix: &FlowMatrix) -> Vec<AreaTotals> {
		let mut rows: Vec<AreaTotals> = matrix
			.areas()
			.iter()
			.enumerate()
			.map(|(idx, area)| AreaTotals {
				area: area.clone(),
				outbound: matrix.outgoing(idx).map(|(_, t)| t as u64).sum(),
				inbound: matrix.incoming(idx).map(|(_, t)| t as u64).sum(),
			})
			.collect();
		rows.sort_by(|a, b| b.total().cmp(&a.total()));
		rows
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;

	fn abc() -> FlowMatrix {
		let areas: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
		FlowMatrix::from_edges(
			&areas,
			[
				("A", "B", 1000),
				("A", "C", 500),
				("B", "A", 800),
				("B", "C", 600),
				("C", "A", 900),
				("C", "B", 400),
			],
		)
	}

	fn entries(list: &[(&str, u32)]) -> Vec<FlowEntry> {
		list.iter()
			.map(|(area, trips)| FlowEntry {
				area: area.to_string(),
				trips: *trips,
			})
			.collect()
	}

	#[test]
	fn scenario_a_has_positive_net() {
		let summary = FlowSummary::for_area(&abc(), "A");
		assert_eq!(summary.outbound, entries(&[("B", 1000), ("C", 500)]));
		assert_eq!(summary.inbound, entries(&[("B", 800), ("C", 900)]));
		assert_eq!(summary.outbound_total, 1500);
		assert_eq!(summary.inbound_total, 1700);
		assert_eq!(summary.net(), 200);
	}

	#[test]
	fn net_can_be_negative() {
		let summary = FlowSummary::for_area(&abc(), "B");
		assert_eq!(summary.outbound_total, 1400);
		assert_eq!(summary.inbound_total, 1400);
		assert_eq!(summary.net(), 0);
		let summary = FlowSummary::for_area(&abc(), "C");
		assert_eq!(summary.net(), 1100 - 1300);
	}

	#[test]
	fn totals_touch_each_edge_once() {
		let mut rng = ChaCha8Rng::seed_from_u64(42);
		let areas: Vec<String> = (0..9).map(|i| format!("zone {i}")).collect();
		let matrix = FlowMatrix::generate(&areas, &mut rng);
		for area in &areas {
			let summary = FlowSummary::for_area(&matrix, area);
			let touching: u64 = matrix
				.edges()
				.filter(|e| &e.origin == area || &e.destination == area)
				.map(|e| e.trips as u64)
				.sum();
			assert_eq!(summary.outbound_total + summary.inbound_total, touching);
			assert_eq!(summary.outbound.len(), areas.len() - 1);
			assert!(summary.outbound.iter().all(|e| &e.area != area));
		}
	}

	#[test]
	fn unknown_and_lonely_areas_are_empty() {
		let summary = FlowSummary::for_area(&abc(), "Z");
		assert!(summary.is_empty());
		assert_eq!(summary.net(), 0);

		let solo = FlowMatrix::from_edges(&["Solo".to_string()], std::iter::empty());
		let summary = FlowSummary::for_area(&solo, "Solo");
		assert!(summary.is_empty());
		assert_eq!(summary.selected, "Solo");
	}

	#[test]
	fn overview_sorts_by_total() {
		let rows = AreaTotals::overview(&abc());
		let order: Vec<&str> = rows.iter().map(|r| r.area.as_str()).collect();
		// A: 1500 + 1700, B: 1400 + 1400, C: 1300 + 1100
		assert_eq!(order, ["A", "B", "C"]);
		assert_eq!(rows[0].total(), 3200);
		assert_eq!(rows[2].net(), -200);
	}
}
