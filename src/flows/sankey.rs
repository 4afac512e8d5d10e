//! Node/link structure for the Sankey diagram of one selected area.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::aggregate::{FlowEntry, FlowSummary};

/// Other areas kept in the diagram unless told otherwise.
pub const DEFAULT_MAX_OTHERS: usize = 10;

/// Which way trips travel relative to the selected area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// Leaving the selected area.
	Outbound,
	/// Arriving at the selected area.
	Inbound,
}

/// How other areas compete for a place when the diagram is capped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeRanking {
	/// Largest single edge, outbound or inbound.
	#[default]
	PeakEdge,
	/// Outbound plus inbound trips.
	TotalFlow,
}

/// A weighted edge between two node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SankeyLink {
	/// Index of the origin node.
	pub source: usize,
	/// Index of the destination node.
	pub target: usize,
	/// Trips.
	pub value: u32,
	/// Outbound links start at node 0, inbound links end there.
	pub direction: Direction,
}

/// The selected area at index 0 followed by at most `max_others` other areas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SankeyGraph {
	nodes: Vec<String>,
	index: HashMap<String, usize>,
	links: Vec<SankeyLink>,
	hidden: usize,
}

impl SankeyGraph {
	/// Build with the default [`NodeRanking::PeakEdge`] cap.
	pub fn build(summary: &FlowSummary, areas: &[String], max_others: usize) -> Self {
		Self::build_ranked(summary, areas, max_others, NodeRanking::PeakEdge)
	}

	/// Build, keeping at most `max_others` other areas chosen by `ranking`.
	pub fn build_ranked(
		summary: &FlowSummary,
		areas: &[String],
		max_others: usize,
		ranking: NodeRanking,
	) -> Self {
		let selected = summary.selected.as_str();
		let mut others: Vec<&String> = areas.iter().filter(|a| *a != selected).collect();
		let candidates = others.len();

		if others.len() > max_others {
			let chosen = match ranking {
				NodeRanking::PeakEdge => by_peak_edge(summary, max_others),
				NodeRanking::TotalFlow => by_total_flow(summary, max_others),
			};
			others.retain(|a| chosen.contains(a.as_str()));
			others.truncate(max_others);
		}

		let mut nodes = Vec::with_capacity(others.len() + 1);
		nodes.push(selected.to_string());
		nodes.extend(others.into_iter().cloned());
		let index: HashMap<String, usize> = nodes
			.iter()
			.enumerate()
			.map(|(idx, name)| (name.clone(), idx))
			.collect();

		let mut links = Vec::new();
		for entry in &summary.outbound {
			if let Some(&target) = index.get(&entry.area) {
				links.push(SankeyLink {
					source: 0,
					target,
					value: entry.trips,
					direction: Direction::Outbound,
				});
			}
		}
		for entry in &summary.inbound {
			if let Some(&source) = index.get(&entry.area) {
				links.push(SankeyLink {
					source,
					target: 0,
					value: entry.trips,
					direction: Direction::Inbound,
				});
			}
		}

		let hidden = candidates - (nodes.len() - 1);
		debug!(
			"sankey for {selected}: {} nodes, {} links, {hidden} hidden",
			nodes.len(),
			links.len()
		);
		Self {
			nodes,
			index,
			links,
			hidden,
		}
	}

	/// Node labels; the selected area comes first.
	pub fn nodes(&self) -> &[String] {
		&self.nodes
	}

	/// Outbound links first, then inbound, each in catalog order.
	pub fn links(&self) -> &[SankeyLink] {
		&self.links
	}

	/// Name of the selected area; empty for a default graph.
	pub fn selected(&self) -> &str {
		self.nodes.first().map(String::as_str).unwrap_or_default()
	}

	/// Node index of `name`.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.index.get(name).copied()
	}

	/// No links means there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}

	/// Whether the cap left any area out.
	pub fn truncated(&self) -> bool {
		self.hidden > 0
	}

	/// Other areas left out by the cap.
	pub fn hidden_count(&self) -> usize {
		self.hidden
	}
}

/// Walk all edges by descending weight and keep distinct areas until `k` are
/// found. The sort is stable, so equal weights keep outbound-then-inbound order.
fn by_peak_edge(summary: &FlowSummary, k: usize) -> HashSet<&str> {
	let mut edges: Vec<&FlowEntry> = summary.outbound.iter().chain(&summary.inbound).collect();
	edges.sort_by(|a, b| b.trips.cmp(&a.trips));
	let mut chosen = HashSet::with_capacity(k);
	for edge in edges {
		if chosen.len() == k {
			break;
		}
		chosen.insert(edge.area.as_str());
	}
	chosen
}

fn by_total_flow(summary: &FlowSummary, k: usize) -> HashSet<&str> {
	let mut totals: Vec<(&str, u64)> = Vec::new();
	for edge in summary.outbound.iter().chain(&summary.inbound) {
		match totals.iter_mut().find(|(area, _)| *area == edge.area) {
			Some((_, total)) => *total += edge.trips as u64,
			None => totals.push((edge.area.as_str(), edge.trips as u64)),
		}
	}
	totals.sort_by(|a, b| b.1.cmp(&a.1));
	totals.into_iter().take(k).map(|(area, _)| area).collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::flows::generator::FlowMatrix;

	fn names(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	fn peak(summary: &FlowSummary, area: &str) -> u32 {
		summary
			.outbound
			.iter()
			.chain(&summary.inbound)
			.filter(|e| e.area == area)
			.map(|e| e.trips)
			.max()
			.unwrap_or(0)
	}

	#[test]
	fn scenario_keeps_every_area() {
		let areas = names(&["A", "B", "C"]);
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
		let summary = FlowSummary::for_area(&matrix, "A");
		let graph = SankeyGraph::build(&summary, &areas, DEFAULT_MAX_OTHERS);

		assert_eq!(graph.nodes(), ["A", "B", "C"]);
		assert_eq!(graph.selected(), "A");
		assert!(!graph.truncated());
		let links: Vec<(usize, usize, u32, Direction)> = graph
			.links()
			.iter()
			.map(|l| (l.source, l.target, l.value, l.direction))
			.collect();
		assert_eq!(
			links,
			[
				(0, 1, 1000, Direction::Outbound),
				(0, 2, 500, Direction::Outbound),
				(1, 0, 800, Direction::Inbound),
				(2, 0, 900, Direction::Inbound),
			]
		);
	}

	#[test]
	fn caps_to_exactly_k_by_peak_edge() {
		let mut rng = ChaCha8Rng::seed_from_u64(99);
		let areas: Vec<String> = (0..16).map(|i| format!("area {i:02}")).collect();
		let matrix = FlowMatrix::generate(&areas, &mut rng);
		for selected in &areas {
			let summary = FlowSummary::for_area(&matrix, selected);
			let graph = SankeyGraph::build(&summary, &areas, 10);

			assert_eq!(graph.nodes()[0], *selected);
			assert_eq!(graph.nodes().len(), 11);
			assert_eq!(graph.hidden_count(), 5);

			let kept: Vec<&String> = graph.nodes()[1..].iter().collect();
			let kept_order: Vec<usize> = kept
				.iter()
				.map(|k| areas.iter().position(|a| a == *k).unwrap())
				.collect();
			assert!(kept_order.windows(2).all(|w| w[0] < w[1]), "catalog order");

			let weakest_kept = kept.iter().map(|k| peak(&summary, k)).min().unwrap();
			for excluded in areas.iter().filter(|a| *a != selected && !kept.contains(a)) {
				assert!(peak(&summary, excluded) <= weakest_kept);
			}

			let count = |direction: Direction| {
				graph
					.links()
					.iter()
					.filter(|l| l.direction == direction)
					.count()
			};
			assert_eq!((count(Direction::Outbound), count(Direction::Inbound)), (10, 10));
		}
	}

	#[test]
	fn equal_peaks_favour_first_occurrence() {
		let areas = names(&["S", "P", "Q", "R"]);
		let matrix = FlowMatrix::from_edges(
			&areas,
			[("S", "P", 500), ("S", "Q", 500), ("S", "R", 500)],
		);
		let summary = FlowSummary::for_area(&matrix, "S");
		let graph = SankeyGraph::build(&summary, &areas, 2);
		assert_eq!(graph.nodes(), ["S", "P", "Q"]);
		assert_eq!(graph.index_of("R"), None);
		assert!(graph.truncated());
	}

	#[test]
	fn total_flow_ranking_sums_both_directions() {
		let areas = names(&["S", "P", "Q", "R"]);
		let matrix = FlowMatrix::from_edges(
			&areas,
			[
				("S", "P", 900),
				("S", "Q", 600),
				("Q", "S", 600),
				("S", "R", 650),
				("R", "S", 300),
			],
		);
		let summary = FlowSummary::for_area(&matrix, "S");

		let peak = SankeyGraph::build(&summary, &areas, 2);
		assert_eq!(peak.nodes(), ["S", "P", "R"]);

		let total = SankeyGraph::build_ranked(&summary, &areas, 2, NodeRanking::TotalFlow);
		assert_eq!(total.nodes(), ["S", "Q", "R"]);
	}

	#[test]
	fn single_area_is_an_empty_graph() {
		let areas = names(&["Solo"]);
		let matrix = FlowMatrix::from_edges(&areas, std::iter::empty());
		let summary = FlowSummary::for_area(&matrix, "Solo");
		let graph = SankeyGraph::build(&summary, &areas, DEFAULT_MAX_OTHERS);
		assert_eq!(graph.nodes(), ["Solo"]);
		assert!(graph.is_empty());
		assert!(!graph.truncated());
	}
}
