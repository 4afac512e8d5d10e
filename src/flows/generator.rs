//! Synthetic origin-destination trips between every pair of areas.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;

/// Smallest generated trip count.
pub const TRIPS_MIN: u32 = 300;
/// Largest generated trip count.
pub const TRIPS_MAX: u32 = 3000;

/// One directed OD relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowEdge {
	/// Area the trips start in.
	pub origin: String,
	/// Area the trips end in.
	pub destination: String,
	/// Trip count.
	pub trips: u32,
}

/// Directed trip counts over a fixed area list, stored densely by index.
///
/// The diagonal is always empty, so self-loops cannot exist.
#[derive(Clone, Debug)]
pub struct FlowMatrix {
	areas: Vec<String>,
	index: HashMap<String, usize>,
	trips: Vec<Option<u32>>,
}

impl FlowMatrix {
	fn empty(areas: &[String]) -> Self {
		let n = areas.len();
		Self {
			areas: areas.to_vec(),
			index: areas
				.iter()
				.enumerate()
				.map(|(idx, name)| (name.clone(), idx))
				.collect(),
			trips: vec![None; n * n],
		}
	}

	/// Draw a trip count for every ordered pair of distinct areas, visiting
	/// pairs in list order.
	pub fn generate<R: Rng + ?Sized>(areas: &[String], rng: &mut R) -> Self {
		let mut matrix = Self::empty(areas);
		let n = areas.len();
		for origin in 0..n {
			for destination in 0..n {
				if origin != destination {
					matrix.trips[origin * n + destination] =
						Some(rng.gen_range(TRIPS_MIN..=TRIPS_MAX));
				}
			}
		}
		info!("generated {} flows between {n} areas", matrix.edge_count());
		matrix
	}

	/// Build a matrix from explicit edges. Self-loops and unknown names are dropped.
	pub fn from_edges<'a>(
		areas: &[String],
		edges: impl IntoIterator<Item = (&'a str, &'a str, u32)>,
	) -> Self {
		let mut matrix = Self::empty(areas);
		let n = areas.len();
		for (origin, destination, trips) in edges {
			match (matrix.index_of(origin), matrix.index_of(destination)) {
				(Some(o), Some(d)) if o != d => matrix.trips[o * n + d] = Some(trips),
				_ => debug!("dropping flow {origin} -> {destination}"),
			}
		}
		matrix
	}

	/// Areas in the order the matrix was built for.
	pub fn areas(&self) -> &[String] {
		&self.areas
	}

	/// Matrix index of `name`.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.index.get(name).copied()
	}

	/// Trips from `origin` to `destination`; `None` on the diagonal or out of range.
	pub fn trips(&self, origin: usize, destination: usize) -> Option<u32> {
		let n = self.areas.len();
		if origin >= n || destination >= n {
			return None;
		}
		self.trips[origin * n + destination]
	}

	/// Flows leaving `origin`, as (destination index, trips) in area order.
	pub fn outgoing(&self, origin: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
		(0..self.areas.len()).filter_map(move |d| self.trips(origin, d).map(|t| (d, t)))
	}

	/// Flows arriving at `destination`, as (origin index, trips) in area order.
	pub fn incoming(&self, destination: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
		(0..self.areas.len()).filter_map(move |o| self.trips(o, destination).map(|t| (o, t)))
	}

	/// Every edge, origin-major in area order.
	pub fn edges(&self) -> impl Iterator<Item = FlowEdge> + '_ {
		(0..self.areas.len()).flat_map(move |o| {
			self.outgoing(o).map(move |(d, trips)| FlowEdge {
				origin: self.areas[o].clone(),
				destination: self.areas[d].clone(),
				trips,
			})
		})
	}

	/// Number of directed relations with trips.
	pub fn edge_count(&self) -> usize {
		self.trips.iter().filter(|t| t.is_some()).count()
	}
}

/// Generated matrices keyed by the exact area list they were drawn for.
///
/// Asking again for the same list returns the same values, so randomness is
/// fixed at first generation.
#[derive(Debug, Default)]
pub struct FlowCache {
	entries: HashMap<Vec<String>, Arc<FlowMatrix>>,
}

impl FlowCache {
	/// The cached matrix for `areas`, generating it on first request.
	pub fn get_or_generate<R: Rng + ?Sized>(
		&mut self,
		areas: &[String],
		rng: &mut R,
	) -> Arc<FlowMatrix> {
		if let Some(matrix) = self.entries.get(areas) {
			debug!("reusing flows for {} areas", areas.len());
			return matrix.clone();
		}
		let matrix = Arc::new(FlowMatrix::generate(areas, rng));
		self.entries.insert(areas.to_vec(), matrix.clone());
		matrix
	}

	/// Number of distinct area lists seen.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing has been generated yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;

	fn names(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn complete_graph_without_self_loops() {
		let mut rng = ChaCha8Rng::seed_from_u64(7);
		for n in 2..=12 {
			let areas: Vec<String> = (0..n).map(|i| format!("area-{i:02}")).collect();
			let matrix = FlowMatrix::generate(&areas, &mut rng);
			let edges: Vec<FlowEdge> = matrix.edges().collect();
			assert_eq!(edges.len(), n * (n - 1));
			assert_eq!(matrix.edge_count(), n * (n - 1));
			for edge in &edges {
				assert_ne!(edge.origin, edge.destination);
				assert!((TRIPS_MIN..=TRIPS_MAX).contains(&edge.trips));
				assert!(areas.contains(&edge.origin) && areas.contains(&edge.destination));
			}
		}
	}

	#[test]
	fn edges_follow_area_order() {
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		let matrix = FlowMatrix::generate(&names(&["A", "B", "C"]), &mut rng);
		let pairs: Vec<(String, String)> = matrix
			.edges()
			.map(|e| (e.origin, e.destination))
			.collect();
		let expected = [("A", "B"), ("A", "C"), ("B", "A"), ("B", "C"), ("C", "A"), ("C", "B")];
		assert_eq!(pairs.len(), expected.len());
		for ((o, d), (eo, ed)) in pairs.iter().zip(expected) {
			assert_eq!((o.as_str(), d.as_str()), (eo, ed));
		}
	}

	#[test]
	fn single_area_has_no_edges() {
		let mut rng = ChaCha8Rng::seed_from_u64(3);
		let matrix = FlowMatrix::generate(&names(&["Solo"]), &mut rng);
		assert_eq!(matrix.edge_count(), 0);
		assert_eq!(matrix.edges().count(), 0);
		assert_eq!(matrix.outgoing(0).count(), 0);
	}

	#[test]
	fn cache_reuses_values_for_same_areas() {
		let mut rng = ChaCha8Rng::seed_from_u64(11);
		let mut cache = FlowCache::default();
		let areas = names(&["A", "B", "C"]);
		let first = cache.get_or_generate(&areas, &mut rng);
		let again = cache.get_or_generate(&areas.clone(), &mut rng);
		assert!(Arc::ptr_eq(&first, &again));
		assert_eq!(cache.len(), 1);

		let other = cache.get_or_generate(&names(&["A", "B"]), &mut rng);
		assert!(!Arc::ptr_eq(&first, &other));
		assert_eq!(other.edge_count(), 2);
		assert_eq!(cache.len(), 2);
	}

	#[test]
	fn explicit_edges_drop_self_loops_and_strangers() {
		let areas = names(&["A", "B"]);
		let matrix = FlowMatrix::from_edges(
			&areas,
			[("A", "B", 10), ("A", "A", 5), ("B", "Z", 7), ("B", "A", 3)],
		);
		assert_eq!(matrix.edge_count(), 2);
		assert_eq!(matrix.trips(0, 1), Some(10));
		assert_eq!(matrix.trips(0, 0), None);
		assert_eq!(matrix.trips(1, 0), Some(3));
		assert_eq!(matrix.trips(5, 0), None);
	}
}
